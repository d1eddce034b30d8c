//! Execution dispatcher
//!
//! Issues one `execute_kw` call bound to an authenticated session. The
//! database, user id, and password are resent with every call; there is no
//! persistent token. Calls are never retried here.

use std::sync::Arc;

use erplink_domain::constants::METHOD_EXECUTE_KW;
use erplink_domain::{Fault, FaultKind, Ids, Record, Result, Session, TransportError};
use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};

use crate::connection::classify::is_credential_fault;
use crate::ports::Transport;

/// Forwards model method calls to the transport
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute `model.method(*args, **kwargs)` on the backend
    ///
    /// # Errors
    /// - `NotConnected` if the session has no user id
    /// - `AuthenticationFailed` (fixed message) if the backend rejects the
    ///   call-level credentials
    /// - any other fault with its original classification, logged at `error!`
    ///   with the call context
    pub fn execute(
        &self,
        session: &Session,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        self.dispatch(session, model, method, args, kwargs, true)
    }

    /// Same as [`Dispatcher::execute`], but passthrough faults are only
    /// logged at `debug!`; the caller reports the ones it cares about
    pub(crate) fn execute_unlogged(
        &self,
        session: &Session,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        self.dispatch(session, model, method, args, kwargs, false)
    }

    fn dispatch(
        &self,
        session: &Session,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
        log_failure: bool,
    ) -> Result<Value> {
        let user_id = session.user_id().ok_or_else(|| Fault::from_kind(FaultKind::NotConnected))?;

        debug!(%model, %method, "execute_kw");

        let call_args = [
            Value::from(session.database.as_str()),
            Value::from(user_id),
            Value::from(session.password()),
            Value::from(model),
            Value::from(method),
            Value::Array(args),
            Value::Object(kwargs),
        ];

        match self.transport.call(&session.endpoint_exec, METHOD_EXECUTE_KW, &call_args) {
            Ok(value) => Ok(value),
            Err(TransportError::Remote(remote)) if is_credential_fault(&remote) => {
                warn!(%model, %method, "Backend rejected call credentials");
                Err(Fault::from_kind(FaultKind::AuthenticationFailed))
            }
            Err(err) => {
                let (args, kwargs) = (&call_args[5], &call_args[6]);
                if log_failure {
                    error!(%model, %method, %args, %kwargs, error = %err, "Error in execute");
                } else {
                    debug!(%model, %method, %args, %kwargs, error = %err, "Error in execute");
                }
                Err(Fault::from(err))
            }
        }
    }

    /// `read(ids, fields)` returning decoded records
    ///
    /// # Errors
    /// Propagates [`Dispatcher::execute`] faults; `MalformedResponse` if the
    /// backend answers with something other than a list of records.
    pub fn read(
        &self,
        session: &Session,
        model: &str,
        ids: &Ids,
        fields: &[String],
    ) -> Result<Vec<Record>> {
        let mut kwargs = Map::new();
        kwargs.insert("fields".into(), json!(fields));
        let value = self.execute(session, model, "read", vec![ids.to_value()], kwargs)?;
        Record::many_from_value(value)
    }
}
