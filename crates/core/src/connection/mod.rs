//! Connection lifecycle: authentication, fault classification, and backoff

pub mod backoff;
pub mod classify;
pub mod manager;

pub use backoff::Backoff;
pub use manager::ConnectionManager;
