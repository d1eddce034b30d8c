//! Scripted JSON-RPC backend mounted on a wiremock server.

use std::net::SocketAddr;

use erplink_domain::ConnectionConfig;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Backend-side exception: fully qualified class name and message.
pub type Exception = (&'static str, String);

/// Decoded `"call"` request as the backend sees it.
#[derive(Debug, Clone)]
pub struct Call {
    pub service: String,
    pub method: String,
    pub args: Vec<Value>,
}

impl Call {
    /// Model name of an `execute_kw` call.
    pub fn model(&self) -> &str {
        self.args.get(3).and_then(Value::as_str).unwrap_or_default()
    }

    /// Model method of an `execute_kw` call.
    pub fn model_method(&self) -> &str {
        self.args.get(4).and_then(Value::as_str).unwrap_or_default()
    }
}

pub fn decode(request: &Request) -> (Value, Call) {
    let body: Value = request.body_json().expect("request body should be JSON");
    let params = &body["params"];
    let call = Call {
        service: params["service"].as_str().unwrap_or_default().to_string(),
        method: params["method"].as_str().unwrap_or_default().to_string(),
        args: params["args"].as_array().cloned().unwrap_or_default(),
    };
    (body["id"].clone(), call)
}

pub fn rpc_result(id: Value, result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

pub fn rpc_error(id: Value, name: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": 200,
            "message": "Odoo Server Error",
            "data": {
                "name": name,
                "message": message,
                "debug": "Traceback (most recent call last): ..."
            }
        }
    }))
}

/// Mount a backend answering every `/jsonrpc` call through `handler`.
pub async fn mount_backend<F>(server: &MockServer, handler: F)
where
    F: Fn(&Call) -> Result<Value, Exception> + Send + Sync + 'static,
{
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(move |request: &Request| {
            let (id, call) = decode(request);
            match handler(&call) {
                Ok(result) => rpc_result(id, result),
                Err((name, message)) => rpc_error(id, name, &message),
            }
        })
        .mount(server)
        .await;
}

/// All decoded calls the server received, in arrival order.
pub async fn received_calls(server: &MockServer) -> Vec<Call> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| decode(request).1)
        .collect()
}

pub fn config_for(address: &SocketAddr, database: &str) -> ConnectionConfig {
    let url = format!("http://{}", address.ip());
    let mut config = ConnectionConfig::new(url, address.port(), database, "admin", "s3cret");
    config.timeout_secs = 5;
    config
}
