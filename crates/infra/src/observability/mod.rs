//! Observability infrastructure
//!
//! The client crates only emit `tracing` events. Installing a subscriber is
//! left to the embedding application, and [`init_tracing`] is the stock way
//! of doing it.
//!
//! Connection failures that are retried indefinitely are logged at `ERROR`
//! with a `critical = true` field, so a JSON sink can alert on them
//! separately from ordinary errors.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
