//! Error type shared by all client variants.

/// Fault codes that indicate a temporary condition on the remote side.
const TRANSIENT_FAULT_CODES: &[&str] = &["UNABLE_TO_LOCK_ROW", "SERVER_UNAVAILABLE"];

/// Fault codes raised when a payload does not match the remote schema.
const SCHEMA_FAULT_CODES: &[&str] = &["INVALID_FIELD", "INVALID_TYPE"];

/// Error returned by [`CrmClient`](crate::CrmClient) implementations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Credentials were rejected or the login response was unusable.
    #[error("login failed: {detail}")]
    Auth { detail: String },

    /// The remote side answered with a structured fault.
    #[error("{code}: {message}")]
    Fault { code: String, message: String },

    /// The remote side answered with a status the client cannot interpret.
    #[error("unexpected HTTP status {status}: {body}")]
    Http { status: u16, body: String },

    /// A response body did not have the expected shape.
    #[error("malformed {what} response: {detail}")]
    Decode { what: &'static str, detail: String },

    /// The client was constructed with unusable settings.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn transport(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport {
            source: source.into(),
        }
    }

    pub fn decode(what: &'static str, detail: impl ToString) -> Self {
        Self::Decode {
            what,
            detail: detail.to_string(),
        }
    }

    /// Fault code without any namespace prefix (`sf:INVALID_FIELD` → `INVALID_FIELD`).
    pub fn fault_code(&self) -> Option<&str> {
        match self {
            Self::Fault { code, .. } => Some(code.rsplit(':').next().unwrap_or(code)),
            _ => None,
        }
    }

    /// Whether repeating the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::Fault { .. } => self
                .fault_code()
                .is_some_and(|code| TRANSIENT_FAULT_CODES.contains(&code)),
            Self::Auth { .. } | Self::Decode { .. } | Self::Config(_) => false,
        }
    }

    /// Whether the remote side rejected a field name or object type.
    pub fn is_schema_fault(&self) -> bool {
        self.fault_code()
            .is_some_and(|code| SCHEMA_FAULT_CODES.contains(&code))
    }
}
