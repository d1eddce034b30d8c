//! JSON-RPC 2.0 envelope used by the backend's `/jsonrpc` endpoint
//!
//! Every call is a `"call"` method whose params name the target service,
//! the service method, and its positional arguments:
//!
//! ```json
//! {"jsonrpc": "2.0", "method": "call",
//!  "params": {"service": "object", "method": "execute_kw", "args": [...]},
//!  "id": "..."}
//! ```
//!
//! Failures come back as an `error` object whose `data.name` carries the
//! fully qualified exception class (e.g. `odoo.exceptions.AccessDenied`).

use erplink_domain::{
    RemoteFault, FAULT_CODE_ACCESS_DENIED, FAULT_CODE_ACCESS_ERROR, FAULT_CODE_APPLICATION,
    FAULT_CODE_WARNING,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const JSONRPC_METHOD_CALL: &str = "call";

/// JSON-RPC request, borrowing its arguments from the caller
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: RpcParams<'a>,
    pub id: Value,
}

impl<'a> RpcRequest<'a> {
    pub fn call(service: &'a str, method: &'a str, args: &'a [Value], id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: JSONRPC_METHOD_CALL,
            params: RpcParams { service, method, args },
            id,
        }
    }
}

/// Service dispatch parameters carried by every `"call"` request
#[derive(Debug, Clone, Serialize)]
pub struct RpcParams<'a> {
    pub service: &'a str,
    pub method: &'a str,
    pub args: &'a [Value],
}

/// JSON-RPC response
///
/// Exactly one of `result` and `error` is expected. A `null` result is a
/// legitimate answer for methods that return nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
    #[serde(default)]
    pub id: Value,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<RpcErrorData>,
}

/// Server-side exception details attached to an [`RpcError`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcErrorData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
}

impl RpcError {
    /// Translate into the backend's XML-RPC style fault.
    ///
    /// The fault code is derived from the exception class so that callers see
    /// the same codes regardless of the wire protocol.
    pub fn into_remote_fault(self) -> RemoteFault {
        let data = self.data.unwrap_or_default();

        let code = data.name.as_deref().map_or(FAULT_CODE_APPLICATION, fault_code_for);
        let message = [data.message, data.debug]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .unwrap_or(self.message);

        let fault = RemoteFault::new(code, message);
        match data.name {
            Some(name) => fault.with_name(name),
            None => fault,
        }
    }
}

/// Fault code for a backend exception class name.
pub fn fault_code_for(exception: &str) -> i64 {
    let short = exception.rsplit('.').next().unwrap_or(exception);
    match short {
        "AccessDenied" => FAULT_CODE_ACCESS_DENIED,
        "AccessError" => FAULT_CODE_ACCESS_ERROR,
        "UserError" | "ValidationError" | "MissingError" | "RedirectWarning" | "Warning"
        | "except_orm" => FAULT_CODE_WARNING,
        _ => FAULT_CODE_APPLICATION,
    }
}
