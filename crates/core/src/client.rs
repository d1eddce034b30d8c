//! Client entry point
//!
//! [`ErpClient`] owns the session for its lifetime. It authenticates on
//! construction and hands out [`Model`] handles for calls. It is meant for
//! single-threaded use: callers sharing one client across threads must
//! serialize access themselves.

use std::sync::Arc;

use erplink_domain::{ConnectionConfig, Result, Session};
use serde_json::{Map, Value};

use crate::connection::ConnectionManager;
use crate::dispatch::Dispatcher;
use crate::model::Model;
use crate::ports::{Sleeper, ThreadSleeper, Transport};

/// Authenticated client for the remote object store
pub struct ErpClient {
    session: Session,
    manager: ConnectionManager,
    dispatcher: Dispatcher,
}

impl ErpClient {
    /// Validate `config` and connect, blocking until authenticated
    ///
    /// # Errors
    /// `Config` for an invalid configuration, otherwise any non-retryable
    /// connect fault (see [`ConnectionManager::connect`]).
    pub fn connect(config: &ConnectionConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Self::connect_with_sleeper(config, transport, Arc::new(ThreadSleeper))
    }

    /// Connect with a custom sleeper (for testing)
    pub fn connect_with_sleeper(
        config: &ConnectionConfig,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self> {
        config.validate()?;

        let manager = ConnectionManager::with_sleeper(transport.clone(), config.backoff, sleeper);
        let mut session = config.session();
        manager.connect(&mut session)?;

        Ok(Self { session, manager, dispatcher: Dispatcher::new(transport) })
    }

    /// Re-run the authentication handshake on the existing session
    ///
    /// # Errors
    /// Same as [`ErpClient::connect`]; the session is left unauthenticated.
    pub fn reconnect(&mut self) -> Result<()> {
        self.manager.connect(&mut self.session).map(|_| ())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Handle for calls against `model`
    pub fn model(&self, model: impl Into<String>) -> Model<'_> {
        Model::new(self, model.into())
    }

    /// Raw `execute_kw` call
    ///
    /// # Errors
    /// See [`Dispatcher::execute`].
    pub fn execute(
        &self,
        model: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        self.dispatcher.execute(&self.session, model, method, args, kwargs)
    }
}
