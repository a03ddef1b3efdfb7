use std::time::Duration;

use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;

/// Failure of a single catalog request.
///
/// Cloneable so a failed state can be published to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("catalog API returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("catalog API rate limit exceeded")]
    RateLimited { retry_after: Option<Duration> },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected response shape at `{path}`: {message}")]
    Decode { path: String, message: String },

    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    Unknown(String),
}

/// Coarse classification used by views to pick an error presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    Network,
    NotFound,
    RateLimited,
    Http,
    Decode,
    Cancelled,
    Unknown,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::Http { .. } => FetchErrorKind::Http,
            FetchError::RateLimited { .. } => FetchErrorKind::RateLimited,
            FetchError::NotFound(_) => FetchErrorKind::NotFound,
            FetchError::Decode { .. } => FetchErrorKind::Decode,
            FetchError::Cancelled => FetchErrorKind::Cancelled,
            FetchError::Unknown(_) => FetchErrorKind::Unknown,
        }
    }

    /// Whether offering a manual retry makes sense.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::NotFound(_) | FetchError::Cancelled => false,
            FetchError::Http { status, .. } => *status >= 500,
            _ => true,
        }
    }

    /// Short text suitable for an error banner with a retry button.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => {
                "Could not reach the catalog. Check your connection and try again."
                    .to_string()
            }
            FetchError::NotFound(_) => "This title could not be found.".to_string(),
            FetchError::RateLimited {
                retry_after: Some(wait),
            } => format!(
                "Too many requests. Try again in {} seconds.",
                wait.as_secs().max(1)
            ),
            FetchError::RateLimited { retry_after: None } => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            FetchError::Cancelled => "Request was cancelled.".to_string(),
            FetchError::Http { .. }
            | FetchError::Decode { .. }
            | FetchError::Unknown(_) => {
                "Failed to load content. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            FetchError::Network(err.to_string())
        } else if err.is_decode() || err.is_body() {
            FetchError::Decode {
                path: String::new(),
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            FetchError::Unknown(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_one_to_one() {
        assert_eq!(
            FetchError::Network("down".into()).kind(),
            FetchErrorKind::Network
        );
        assert_eq!(
            FetchError::RateLimited { retry_after: None }.kind(),
            FetchErrorKind::RateLimited
        );
        assert_eq!(FetchError::Cancelled.kind(), FetchErrorKind::Cancelled);
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = FetchError::Http {
            status: 401,
            message: "Invalid API key".into(),
        };
        assert!(!err.is_retryable());
        assert!(
            FetchError::Http {
                status: 503,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!FetchError::NotFound("/movie/1".into()).is_retryable());
    }

    #[test]
    fn rate_limit_message_mentions_wait() {
        let err = FetchError::RateLimited {
            retry_after: Some(Duration::from_secs(12)),
        };
        assert!(err.user_message().contains("12 seconds"));
    }
}
