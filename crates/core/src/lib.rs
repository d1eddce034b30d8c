//! # erplink Core
//!
//! Client logic for a remote ERP object store, free of any network code.
//!
//! This crate contains:
//! - Port interfaces (`Transport`, `Sleeper`)
//! - The connection manager: authentication, fault classification, backoff
//! - The execution dispatcher
//! - Field specs, relation descriptors, and the relation expander
//! - The `ErpClient` entry point and per-model handles
//!
//! ## Architecture Principles
//! - Only depends on `erplink-domain`
//! - All I/O goes through traits implemented in `erplink-infra`
//! - Fully synchronous; every call blocks until the backend answers

pub mod client;
pub mod connection;
pub mod dispatch;
pub mod fields;
pub mod model;
pub mod ports;

pub use client::ErpClient;
pub use connection::{Backoff, ConnectionManager};
pub use dispatch::Dispatcher;
pub use fields::{Cardinality, Field, FieldSpec, RelationDescriptor, RelationExpander};
pub use model::Model;
pub use ports::{Sleeper, ThreadSleeper, Transport};
