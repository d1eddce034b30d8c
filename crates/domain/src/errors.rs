//! Error types used throughout the client
//!
//! Two layers of error exist:
//!
//! - [`TransportError`]: the raw classification a transport adapter returns
//!   (refused socket, DNS failure, backend fault, ...).
//! - [`Fault`]: the caller-facing error, categorized by [`FaultKind`] so the
//!   connection manager can decide between retrying and escalating.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend fault code for generic application errors.
pub const FAULT_CODE_APPLICATION: i64 = 1;
/// Backend fault code for warnings and missing records.
pub const FAULT_CODE_WARNING: i64 = 2;
/// Backend fault code for rejected credentials.
pub const FAULT_CODE_ACCESS_DENIED: i64 = 3;
/// Backend fault code for access-rule violations.
pub const FAULT_CODE_ACCESS_ERROR: i64 = 4;

/// Fault raised by the backend itself (as opposed to the network path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFault {
    /// Numeric fault code, following the backend's XML-RPC convention
    pub code: i64,
    /// Exception name reported by the backend, when available
    pub name: Option<String>,
    /// Diagnostic text (often a server-side traceback)
    pub message: String,
}

impl RemoteFault {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, name: None, message: message.into() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "fault {} ({}): {}", self.code, name, self.message),
            None => write!(f, "fault {}: {}", self.code, self.message),
        }
    }
}

/// Raw failure reported by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("connection timed out: {0}")]
    Timeout(String),

    #[error("name resolution failed: {0}")]
    NameResolution(String),

    #[error("TLS negotiation failed: {reason}")]
    Tls { reason: String },

    #[error("protocol error (HTTP {status}): {message}")]
    Protocol { status: u16, message: String },

    #[error("remote {0}")]
    Remote(RemoteFault),

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Fault category surfaced to callers
///
/// Classifies faults so that connect-time failures can be retried and all
/// other failures can be turned into a user-actionable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    /// The endpoint refused the TCP connection
    ConnectionRefused,

    /// The endpoint did not answer in time
    ConnectionTimeout,

    /// The configured database does not exist on the backend
    DatabaseNotFound,

    /// The endpoint host name could not be resolved
    BadEndpoint,

    /// Secure scheme used against a plaintext port
    TlsMismatch,

    /// Plaintext scheme used against a secure-only endpoint
    ProtocolMismatch,

    /// Credentials rejected by the backend
    AuthenticationFailed,

    /// Delete targeted ids that no longer exist
    RecordNotFound,

    /// Delete blocked because other records reference the target
    RecordLinked,

    /// Any other backend fault, passed through unchanged
    Remote,

    /// Any other transport failure
    Transport,

    /// The backend answered with data of an unexpected shape
    MalformedResponse,

    /// A call was attempted without an authenticated session
    NotConnected,

    /// Invalid or missing configuration
    Config,
}

impl FaultKind {
    /// Returns true if the connection manager should retry this cause
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionRefused | Self::ConnectionTimeout)
    }

    /// Returns the fixed human-readable message for this category
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ConnectionRefused => "Connection refused by the server.",
            Self::ConnectionTimeout => "Connection to the server timed out.",
            Self::DatabaseNotFound => "Database not found.",
            Self::BadEndpoint => "Bad url: the server host name could not be resolved.",
            Self::TlsMismatch => "Bad SSL (probably need http. Are you using https?)",
            Self::ProtocolMismatch => {
                "Protocol error (make sure you're using https on an https port)"
            }
            Self::AuthenticationFailed => "Wrong username or password!",
            Self::RecordNotFound => "Records do not exist.",
            Self::RecordLinked => "Other records rely on these records.",
            Self::Remote => "The server reported an error.",
            Self::Transport => "The request could not be delivered.",
            Self::MalformedResponse => "The server returned an unexpected response.",
            Self::NotConnected => "No authenticated session.",
            Self::Config => "Invalid configuration.",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ConnectionRefused => "Connection Refused",
            Self::ConnectionTimeout => "Connection Timeout",
            Self::DatabaseNotFound => "Database Not Found",
            Self::BadEndpoint => "Bad Endpoint",
            Self::TlsMismatch => "TLS Mismatch",
            Self::ProtocolMismatch => "Protocol Mismatch",
            Self::AuthenticationFailed => "Authentication Failed",
            Self::RecordNotFound => "Record Not Found",
            Self::RecordLinked => "Record Linked",
            Self::Remote => "Remote Fault",
            Self::Transport => "Transport Error",
            Self::MalformedResponse => "Malformed Response",
            Self::NotConnected => "Not Connected",
            Self::Config => "Configuration Error",
        };
        f.write_str(label)
    }
}

/// Classified error crossing the client boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    kind: FaultKind,
    message: String,
    diagnostic: Option<String>,
    remote: Option<RemoteFault>,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), diagnostic: None, remote: None }
    }

    /// Fault carrying only the category's fixed message
    pub fn from_kind(kind: FaultKind) -> Self {
        Self::new(kind, kind.user_message())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(FaultKind::Config, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FaultKind::MalformedResponse, message)
    }

    /// Attach backend-supplied diagnostic text
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// The original backend fault, for `Remote` passthrough faults
    pub fn remote(&self) -> Option<&RemoteFault> {
        self.remote.as_ref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(diagnostic) = &self.diagnostic {
            write!(f, " ({})", diagnostic)?;
        }
        Ok(())
    }
}

impl std::error::Error for Fault {}

/// Default translation of a raw transport failure, keeping its classification
impl From<TransportError> for Fault {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        match err {
            TransportError::ConnectionRefused(_) => {
                Self::new(FaultKind::ConnectionRefused, message)
            }
            TransportError::Timeout(_) => Self::new(FaultKind::ConnectionTimeout, message),
            TransportError::NameResolution(_) => Self::new(FaultKind::BadEndpoint, message),
            TransportError::Tls { .. }
            | TransportError::Protocol { .. }
            | TransportError::Other(_) => Self::new(FaultKind::Transport, message),
            TransportError::Decode(_) => Self::new(FaultKind::MalformedResponse, message),
            TransportError::Remote(remote) => Self {
                kind: FaultKind::Remote,
                message: remote.message.clone(),
                diagnostic: remote.name.clone(),
                remote: Some(remote),
            },
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Fault>;
