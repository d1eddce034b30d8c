//! Blocking JSON-RPC transport

use erplink_core::Transport;
use erplink_domain::{ConnectionConfig, Endpoint, TransportError};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::envelope::{RpcRequest, RpcResponse};
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Longest slice of an unexpected HTTP body kept in error messages
const MAX_BODY_EXCERPT: usize = 512;

/// [`Transport`] speaking the backend's JSON-RPC dialect over HTTP(S).
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    http: HttpClient,
}

impl JsonRpcTransport {
    /// Build a transport honoring the configured request timeout.
    pub fn new(config: &ConnectionConfig) -> Result<Self, TransportError> {
        let http = HttpClient::builder().timeout(config.timeout()).build()?;
        Ok(Self { http })
    }

    pub fn with_client(http: HttpClient) -> Self {
        Self { http }
    }
}

impl Transport for JsonRpcTransport {
    fn call(
        &self,
        endpoint: &Endpoint,
        method: &str,
        args: &[Value],
    ) -> Result<Value, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        let request = RpcRequest::call(&endpoint.service, method, args, Value::from(request_id));

        let response = self.http.post_json(&endpoint.url, &request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Protocol {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        let body: RpcResponse =
            response.json().map_err(|err| TransportError::from(InfraError::from(err)))?;

        if body.id != request.id {
            warn!(expected = %request.id, received = %body.id, "JSON-RPC response id mismatch");
        }

        if let Some(error) = body.error {
            let fault = error.into_remote_fault();
            debug!(service = %endpoint.service, method, code = fault.code, "remote fault");
            return Err(TransportError::Remote(fault));
        }

        Ok(body.result.unwrap_or(Value::Null))
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
