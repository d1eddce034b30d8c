use std::time::Duration;

use erplink_domain::constants::DEFAULT_TIMEOUT_SECS;
use erplink_domain::TransportError;
use reqwest::blocking::{Client as ReqwestClient, Response};
use serde::Serialize;
use tracing::debug;

use crate::errors::InfraError;

/// HTTP client with a per-request timeout.
///
/// Retrying is left to the connection manager, so every call here is a
/// single attempt.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// POST `body` as JSON and hand back the raw response.
    pub fn post_json<T>(&self, url: &str, body: &T) -> Result<Response, TransportError>
    where
        T: Serialize + ?Sized,
    {
        debug!(%url, "sending HTTP request");

        let response = self.client.post(url).json(body).send().map_err(|err| {
            debug!(%url, error = %err, "HTTP request failed");
            TransportError::from(InfraError::from(err))
        })?;

        debug!(%url, status = %response.status(), "received HTTP response");
        Ok(response)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(concat!("erplink/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, TransportError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| TransportError::from(InfraError::from(err)))?;

        Ok(HttpClient { client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_configured_timeout() {
        let builder = HttpClient::builder();
        assert_eq!(builder.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(builder.user_agent.as_deref().is_some_and(|agent| agent.starts_with("erplink/")));
    }

    #[test]
    fn builder_overrides_apply() {
        let builder = HttpClient::builder()
            .timeout(Duration::from_secs(3))
            .user_agent("erplink-tests");

        assert_eq!(builder.timeout, Duration::from_secs(3));
        assert_eq!(builder.user_agent.as_deref(), Some("erplink-tests"));
    }
}
