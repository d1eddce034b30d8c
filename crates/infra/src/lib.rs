//! # erplink Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The JSON-RPC transport over a blocking HTTP client
//! - Classification of HTTP client failures into transport errors
//! - Configuration loading from the environment or files
//! - Tracing subscriber bootstrap
//!
//! ## Architecture
//! - Implements traits defined in `erplink-core`
//! - Contains all "impure" code (network, filesystem, process environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod rpc;

// Re-export commonly used items
pub use config::{load, load_from_env, load_from_file, probe_config_paths};
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
pub use rpc::JsonRpcTransport;
