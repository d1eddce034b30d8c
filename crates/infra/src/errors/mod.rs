//! Error conversions owned by the infrastructure layer.

pub mod conversions;

pub use conversions::InfraError;
