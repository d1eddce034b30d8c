//! Blocking HTTP client shared by the RPC transports.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
