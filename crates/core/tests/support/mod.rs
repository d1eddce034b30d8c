//! Shared test helpers for `erplink-core` integration tests.
//!
//! `MockTransport` plays the backend: authenticate answers and per
//! `(model, method)` execute answers are queued up front, and every call is
//! logged for later assertions.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::fmt;
use std::time::Duration;

use erplink_core::{ErpClient, Sleeper, Transport};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use erplink_domain::{
    ConnectionConfig, Endpoint, TransportError, METHOD_AUTHENTICATE, METHOD_EXECUTE_KW,
};
use serde_json::{json, Map, Value};

type Reply = Result<Value, TransportError>;

/// One `execute_kw` call as the backend saw it
#[derive(Debug, Clone, PartialEq)]
pub struct ExecCall {
    pub database: String,
    pub user_id: Value,
    pub password: String,
    pub model: String,
    pub method: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

#[derive(Default)]
pub struct MockTransport {
    auth_replies: Mutex<VecDeque<Reply>>,
    exec_replies: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    auth_calls: Mutex<Vec<(Endpoint, Vec<Value>)>>,
    exec_calls: Mutex<Vec<ExecCall>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue an `authenticate` reply; once drained, authenticate returns uid 2
    pub fn push_auth(&self, reply: Reply) {
        self.auth_replies.lock().unwrap().push_back(reply);
    }

    /// Queue an `execute_kw` reply for `model.method`
    pub fn on(&self, model: &str, method: &str, reply: Reply) {
        self.exec_replies
            .lock()
            .unwrap()
            .entry((model.to_string(), method.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn auth_calls(&self) -> Vec<(Endpoint, Vec<Value>)> {
        self.auth_calls.lock().unwrap().clone()
    }

    pub fn exec_calls(&self) -> Vec<ExecCall> {
        self.exec_calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn call(&self, endpoint: &Endpoint, method: &str, args: &[Value]) -> Reply {
        match method {
            METHOD_AUTHENTICATE => {
                self.auth_calls.lock().unwrap().push((endpoint.clone(), args.to_vec()));
                self.auth_replies.lock().unwrap().pop_front().unwrap_or(Ok(json!(2)))
            }
            METHOD_EXECUTE_KW => {
                let call = ExecCall {
                    database: args[0].as_str().unwrap().to_string(),
                    user_id: args[1].clone(),
                    password: args[2].as_str().unwrap().to_string(),
                    model: args[3].as_str().unwrap().to_string(),
                    method: args[4].as_str().unwrap().to_string(),
                    args: args[5].as_array().unwrap().clone(),
                    kwargs: args[6].as_object().unwrap().clone(),
                };
                let key = (call.model.clone(), call.method.clone());
                self.exec_calls.lock().unwrap().push(call);
                self.exec_replies
                    .lock()
                    .unwrap()
                    .get_mut(&key)
                    .and_then(VecDeque::pop_front)
                    .unwrap_or_else(|| {
                        Err(TransportError::Other(format!("no scripted reply for {key:?}")))
                    })
            }
            other => Err(TransportError::Other(format!("unexpected remote method {other}"))),
        }
    }
}

/// Sleeper that records requested delays instead of blocking
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn delays_secs(&self) -> Vec<u64> {
        self.delays.lock().unwrap().iter().map(Duration::as_secs).collect()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub fn config(database: &str) -> ConnectionConfig {
    ConnectionConfig::new("http://erp.local", 8069, database, "admin", "s3cret")
}

/// Client connected to `transport` with a non-blocking sleeper
pub fn connect(transport: &Arc<MockTransport>) -> ErpClient {
    ErpClient::connect_with_sleeper(&config("acme"), transport.clone(), RecordingSleeper::new())
        .expect("mock backend accepts credentials")
}

pub fn kwargs(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

/// Tracing layer keeping `(level, message)` of every event
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

impl LogCapture {
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push((*event.metadata().level(), visitor.0));
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Run `f` with a thread-local subscriber and return what it logged
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, LogCapture) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let output = tracing::subscriber::with_default(subscriber, f);
    (output, capture)
}
