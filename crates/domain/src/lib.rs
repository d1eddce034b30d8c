//! # erplink Domain
//!
//! Data types shared by every erplink crate.
//!
//! This crate contains:
//! - Records, id batches, and search domains
//! - The session context and connection configuration
//! - Fault and transport error types, and the `Result` alias
//!
//! ## Architecture
//! - No dependencies on other erplink crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use types::*;
