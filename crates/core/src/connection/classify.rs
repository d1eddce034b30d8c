//! Fault classification
//!
//! Turns raw [`TransportError`]s into caller-facing [`Fault`]s. Connect-time
//! classification recognizes configuration mistakes (wrong database, wrong
//! scheme, unresolvable host) so they escalate immediately instead of being
//! retried forever.

use erplink_domain::{
    Fault, FaultKind, RemoteFault, Session, TransportError, FAULT_CODE_ACCESS_DENIED,
    FAULT_CODE_APPLICATION, FAULT_CODE_WARNING,
};

/// Diagnostic the backend emits when the call-level credentials are rejected
const SECURITY_CHECK_MARKER: &str = "security.check(db,uid,passwd)";
const ACCESS_DENIED_NAME: &str = "odoo.exceptions.AccessDenied";
const MISSING_RECORD_MARKER: &str = "not exist";
const LINKED_RECORD_MARKER: &str = "If possible, archive it instead";

/// Classify a failed `authenticate` call
pub fn classify_connect_error(err: TransportError, session: &Session) -> Fault {
    let url = &session.endpoint_auth.url;
    match err {
        TransportError::ConnectionRefused(detail) => Fault::new(
            FaultKind::ConnectionRefused,
            format!("Connection refused! (cannot access server) {url}"),
        )
        .with_diagnostic(detail),
        TransportError::Timeout(detail) => {
            Fault::new(FaultKind::ConnectionTimeout, format!("Connection timed out! {url}"))
                .with_diagnostic(detail)
        }
        TransportError::NameResolution(detail) => {
            Fault::new(FaultKind::BadEndpoint, format!("Bad url: {url}")).with_diagnostic(detail)
        }
        TransportError::Tls { reason } if is_wrong_tls_version(&reason) => {
            Fault::from_kind(FaultKind::TlsMismatch).with_diagnostic(reason)
        }
        TransportError::Protocol { status, message } => {
            Fault::from_kind(FaultKind::ProtocolMismatch)
                .with_diagnostic(format!("HTTP {status}: {message}"))
        }
        TransportError::Remote(remote) if is_missing_database(&remote, &session.database) => {
            Fault::new(
                FaultKind::DatabaseNotFound,
                format!("Database not found: {}", session.database),
            )
            .with_diagnostic(remote.message)
        }
        TransportError::Remote(remote) if is_credential_fault(&remote) => {
            Fault::from_kind(FaultKind::AuthenticationFailed)
        }
        other => Fault::from(other),
    }
}

/// Whether a backend fault reports rejected call-level credentials
pub fn is_credential_fault(remote: &RemoteFault) -> bool {
    remote.message.contains(SECURITY_CHECK_MARKER)
        || remote.name.as_deref() == Some(ACCESS_DENIED_NAME)
        || remote.code == FAULT_CODE_ACCESS_DENIED
}

/// Whether a backend fault reports that `database` does not exist
pub fn is_missing_database(remote: &RemoteFault, database: &str) -> bool {
    remote.message.contains(&format!("database \"{database}\" does not exist"))
}

/// Whether an `unlink` fault reports ids that no longer exist
pub fn is_missing_record(remote: &RemoteFault) -> bool {
    remote.code == FAULT_CODE_WARNING && remote.message.contains(MISSING_RECORD_MARKER)
}

/// Whether an `unlink` fault reports that other records reference the target
///
/// Older backends raise this as a generic application fault (code 1), newer
/// ones as a `ValidationError`/`UserError` (code 2).
pub fn is_linked_record(remote: &RemoteFault) -> bool {
    matches!(remote.code, FAULT_CODE_APPLICATION | FAULT_CODE_WARNING)
        && remote.message.contains(LINKED_RECORD_MARKER)
}

// OpenSSL reports WRONG_VERSION_NUMBER; rustls reports a corrupt record of
// type InvalidContentType when a TLS client hits a plaintext port.
fn is_wrong_tls_version(reason: &str) -> bool {
    let lower = reason.to_ascii_lowercase();
    lower.contains("wrong_version_number")
        || lower.contains("wrong version number")
        || lower.contains("invalidcontenttype")
        || lower.contains("corrupt message")
}
