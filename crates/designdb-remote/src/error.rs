use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response (HTTP {status}): {reason}")]
    Malformed { status: u16, reason: String },

    /// The service answered with an `{ "error": ... }` payload.
    #[error("remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    #[error("circuit open: {0}")]
    CircuitOpen(String),
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Malformed { status, .. } | Self::Remote { status, .. } => Some(*status),
            Self::Network(_) | Self::CircuitOpen(_) => None,
        }
    }

    /// Transient failures: no status, 5xx, or 429. An open circuit is never retried.
    pub fn is_retryable(&self) -> bool {
        if matches!(self, Self::CircuitOpen(_)) { return false; }
        match self.status() {
            None => true,
            Some(s) => s >= 500 || s == 429,
        }
    }

    pub fn is_circuit_open(&self) -> bool { matches!(self, Self::CircuitOpen(_)) }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Status { status: status.as_u16(), body: e.to_string() },
            None => Self::Network(e.to_string()),
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
