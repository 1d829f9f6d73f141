use lostfound_core::UploadRejected;

/// Errors returned by [`LostFoundClient`](crate::LostFoundClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server could not be reached or the request did not complete.
    #[error("connection error: {0}")]
    Connection(String),

    /// The server answered with an error status and no readable envelope.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered with an error envelope.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Field-level details, e.g. validation messages.
        errors: Vec<String>,
    },

    /// A response body could not be decoded.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The client itself is misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The file failed the upload policy and was never sent.
    #[error(transparent)]
    UploadRejected(#[from] UploadRejected),

    /// A local file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether repeating the request might succeed: connection failures and
    /// server-side (5xx) errors.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Http { status, .. } | Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The HTTP status the server answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(Error::Connection("refused".into()).is_retryable());
        assert!(
            Error::Http {
                status: 503,
                message: "unavailable".into()
            }
            .is_retryable()
        );
        assert!(
            !Error::Api {
                status: 400,
                message: "Validation error".into(),
                errors: vec![]
            }
            .is_retryable()
        );
        assert!(!Error::Deserialization("bad".into()).is_retryable());
        assert!(
            !Error::UploadRejected(UploadRejected::NotAnImage("text/plain".into())).is_retryable()
        );
    }

    #[test]
    fn not_found_detection() {
        let err = Error::Api {
            status: 404,
            message: "Item not found".into(),
            errors: vec![],
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "API error (404): Item not found");
        assert!(!Error::Connection("x".into()).is_not_found());
    }
}
