//! Client constants
//!
//! Wire-level names and defaults shared across the crates.

/// Backend service handling authentication
pub const SERVICE_COMMON: &str = "common";
/// Backend service handling model method execution
pub const SERVICE_OBJECT: &str = "object";
/// Path of the JSON-RPC endpoint, appended to `{url}:{port}`
pub const JSONRPC_PATH: &str = "/jsonrpc";

/// Remote method authenticating a user against a database
pub const METHOD_AUTHENTICATE: &str = "authenticate";
/// Remote method executing a model method with positional and keyword args
pub const METHOD_EXECUTE_KW: &str = "execute_kw";

// Request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// Connect backoff (seconds)
pub const DEFAULT_BACKOFF_INITIAL_SECS: u64 = 5;
pub const DEFAULT_BACKOFF_STEP_SECS: u64 = 5;
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 30;
