//! Connection manager
//!
//! Owns the authentication handshake. `connect` blocks until the backend
//! accepts the credentials or a non-retryable fault is classified; refused
//! and timed-out attempts are retried on a [`Backoff`] schedule with no
//! attempt limit.

use std::sync::Arc;

use erplink_domain::{
    BackoffConfig, Fault, FaultKind, RecordId, Result, Session, METHOD_AUTHENTICATE,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use super::backoff::Backoff;
use super::classify::classify_connect_error;
use crate::ports::{Sleeper, ThreadSleeper, Transport};

/// Authenticates sessions and recovers from transient connect failures
pub struct ConnectionManager {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    backoff: BackoffConfig,
}

impl ConnectionManager {
    pub fn new(transport: Arc<dyn Transport>, backoff: BackoffConfig) -> Self {
        Self::with_sleeper(transport, backoff, Arc::new(ThreadSleeper))
    }

    /// Create a manager with a custom sleeper (for testing)
    pub fn with_sleeper(
        transport: Arc<dyn Transport>,
        backoff: BackoffConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self { transport, sleeper, backoff }
    }

    /// Authenticate `session`, retrying refused and timed-out attempts
    ///
    /// On success the session's user id is set. On any raised fault it is
    /// left unset.
    ///
    /// # Errors
    /// Returns the first non-retryable fault: `DatabaseNotFound`,
    /// `BadEndpoint`, `TlsMismatch`, `ProtocolMismatch`,
    /// `AuthenticationFailed`, or a passthrough `Remote`/`Transport` fault.
    #[instrument(skip_all, fields(database = %session.database, url = %session.endpoint_auth.url))]
    pub fn connect(&self, session: &mut Session) -> Result<RecordId> {
        info!("Connecting to backend");

        session.clear_user_id();
        let mut backoff = Backoff::new(self.backoff);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.authenticate(session) {
                Ok(user_id) => {
                    session.set_user_id(user_id);
                    info!(user_id, attempt, "Connection successful");
                    return Ok(user_id);
                }
                Err(fault) if fault.is_retryable() => {
                    let delay = backoff.next_delay();
                    error!(
                        critical = true,
                        kind = %fault.kind(),
                        attempt,
                        delay_secs = delay.as_secs(),
                        "{} Trying again in {} seconds.",
                        fault.message(),
                        delay.as_secs()
                    );
                    self.sleeper.sleep(delay);
                }
                Err(fault) => {
                    error!(kind = %fault.kind(), attempt, error = %fault, "Connection failed");
                    return Err(fault);
                }
            }
        }
    }

    /// Single `authenticate` round-trip, without retry
    ///
    /// # Errors
    /// Returns the connect-time classification of the transport failure, or
    /// `AuthenticationFailed` when the backend answers with a falsy user id.
    pub fn authenticate(&self, session: &Session) -> Result<RecordId> {
        let args = vec![
            Value::from(session.database.as_str()),
            Value::from(session.username.as_str()),
            Value::from(session.password()),
            json!({}),
        ];

        let result = self
            .transport
            .call(&session.endpoint_auth, METHOD_AUTHENTICATE, &args)
            .map_err(|err| classify_connect_error(err, session))?;

        parse_user_id(result)
    }
}

fn parse_user_id(value: Value) -> Result<RecordId> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(id) if id > 0 => Ok(id),
            _ => Err(Fault::from_kind(FaultKind::AuthenticationFailed)),
        },
        Value::Bool(false) | Value::Null => Err(Fault::from_kind(FaultKind::AuthenticationFailed)),
        other => Err(Fault::malformed(format!("authenticate returned {other}"))),
    }
}
