use std::fmt;

/// Transport facts about an inbound request that validation and authentication need.
#[derive(Debug, Clone, Default)]
pub struct RequestEnvelope {
    pub has_query: bool,
    pub has_body: bool,
    /// An `Authorization` header was sent, whatever its scheme.
    pub has_authorization: bool,
    /// Decoded HTTP Basic credentials, when the header carried a well-formed pair.
    pub credentials: Option<Credentials>,
}

impl RequestEnvelope {
    pub fn anonymous() -> Self { Self::default() }

    pub fn basic(username: &str, password: &str) -> Self {
        Self {
            has_authorization: true,
            credentials: Some(Credentials { username: username.to_string(), password: password.to_string() }),
            ..Self::default()
        }
    }

    pub fn with_body(mut self) -> Self {
        self.has_body = true;
        self
    }

    pub fn with_query(mut self) -> Self {
        self.has_query = true;
        self
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
