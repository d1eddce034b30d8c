//! Remote procedure call transports
//!
//! The backend exposes its services over JSON-RPC at `{url}:{port}/jsonrpc`.
//! [`JsonRpcTransport`] implements the core `Transport` port on top of it.

pub mod envelope;
pub mod jsonrpc;

pub use envelope::{RpcError, RpcErrorData, RpcParams, RpcRequest, RpcResponse};
pub use jsonrpc::JsonRpcTransport;
