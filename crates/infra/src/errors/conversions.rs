//! Conversions from external infrastructure errors into transport errors.

use erplink_domain::TransportError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TransportError);

impl From<InfraError> for TransportError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TransportError> for InfraError {
    fn from(value: TransportError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoTransportError {
    fn into_transport(self) -> TransportError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TransportError */
/* -------------------------------------------------------------------------- */

impl IntoTransportError for HttpError {
    fn into_transport(self) -> TransportError {
        let chain = error_chain(&self);

        if self.is_timeout() {
            return TransportError::Timeout(chain);
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return classify_connect_failure(&chain);
        }

        if let Some(status) = self.status() {
            return TransportError::Protocol { status: status.as_u16(), message: chain };
        }

        if looks_like_protocol_mismatch(&chain) {
            return TransportError::Protocol { status: 0, message: chain };
        }

        if self.is_decode() {
            return TransportError::Decode(chain);
        }

        TransportError::Other(chain)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_transport())
    }
}

/// Sort a failure that happened before any response arrived.
///
/// Name resolution and TLS handshake failures surface as connect errors in
/// reqwest, so the source chain text is the only way to tell them apart.
pub(crate) fn classify_connect_failure(chain: &str) -> TransportError {
    let lower = chain.to_ascii_lowercase();

    if ["dns error", "failed to lookup address", "name or service not known", "no such host"]
        .iter()
        .any(|marker| lower.contains(marker))
    {
        return TransportError::NameResolution(chain.to_string());
    }

    if [
        "tls",
        "ssl",
        "certificate",
        "invalidcontenttype",
        "corrupt message",
        "wrong version number",
        "handshake",
    ]
    .iter()
    .any(|marker| lower.contains(marker))
    {
        return TransportError::Tls { reason: chain.to_string() };
    }

    if lower.contains("timed out") {
        return TransportError::Timeout(chain.to_string());
    }

    TransportError::ConnectionRefused(chain.to_string())
}

/// A plain HTTP request answered by something that does not speak HTTP/1.x.
fn looks_like_protocol_mismatch(chain: &str) -> bool {
    let lower = chain.to_ascii_lowercase();
    lower.contains("invalid http version")
        || lower.contains("http/0.9")
        || lower.contains("invalid status")
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.iter().any(|part| part == &text) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
