//! Authenticated session context

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::RecordId;

/// A remote endpoint: the URL to post to and the backend service behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub url: String,
    pub service: String,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, service: impl Into<String>) -> Self {
        Self { url: url.into(), service: service.into() }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.url, self.service)
    }
}

/// Credentials and resolved user id, resent with every call
///
/// The user id is only ever set by the connection manager after a successful
/// authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub database: String,
    pub username: String,
    password: String,
    pub endpoint_auth: Endpoint,
    pub endpoint_exec: Endpoint,
    user_id: Option<RecordId>,
}

impl Session {
    pub fn new(
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        endpoint_auth: Endpoint,
        endpoint_exec: Endpoint,
    ) -> Self {
        Self {
            database: database.into(),
            username: username.into(),
            password: password.into(),
            endpoint_auth,
            endpoint_exec,
            user_id: None,
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user_id(&self) -> Option<RecordId> {
        self.user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Record the user id returned by a successful authentication
    pub fn set_user_id(&mut self, user_id: RecordId) {
        self.user_id = Some(user_id);
    }

    /// Forget the user id ahead of a (re)authentication
    pub fn clear_user_id(&mut self) {
        self.user_id = None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint_auth", &self.endpoint_auth)
            .field("endpoint_exec", &self.endpoint_exec)
            .field("user_id", &self.user_id)
            .finish()
    }
}
