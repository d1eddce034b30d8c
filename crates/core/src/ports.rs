//! Port interfaces implemented by infrastructure adapters
//!
//! The core never performs I/O itself: remote calls go through [`Transport`]
//! and connect backoff waits go through [`Sleeper`].

use std::sync::Arc;
use std::time::Duration;

use erplink_domain::{Endpoint, TransportError};
use serde_json::Value;

/// Performs one named remote call and returns its raw result
pub trait Transport: Send + Sync {
    /// Invoke `method` on the service behind `endpoint` with positional `args`
    ///
    /// # Errors
    /// Returns the classified [`TransportError`] for network failures and
    /// backend faults alike.
    fn call(
        &self,
        endpoint: &Endpoint,
        method: &str,
        args: &[Value],
    ) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn call(
        &self,
        endpoint: &Endpoint,
        method: &str,
        args: &[Value],
    ) -> Result<Value, TransportError> {
        (**self).call(endpoint, method, args)
    }
}

/// Blocks the current thread between connect attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by [`std::thread::sleep`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
