use crate::error::{CoreError, RedditApiError};
use std::time::Duration;

/// Error classification consumed by the client's retry loop.
pub trait ErrorExt {
    /// Whether retrying the failed operation could plausibly succeed.
    fn is_retryable(&self) -> bool;
    /// Server-mandated wait before the next attempt, if any.
    fn retry_after(&self) -> Option<Duration>;
}

impl ErrorExt for CoreError {
    fn is_retryable(&self) -> bool {
        match self {
            CoreError::RedditApi(api_error) => matches!(
                api_error,
                RedditApiError::RateLimitExceeded { .. }
                    | RedditApiError::ServerError { .. }
                    | RedditApiError::RequestTimeout
            ),
            CoreError::Network(network_error) => {
                network_error.is_timeout() || network_error.is_connect()
            }
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after }) => {
                Some(Duration::from_secs(*retry_after))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn rate_limit_is_retryable_with_delay() {
        let error = CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 17 });
        assert!(error.is_retryable());
        assert_eq!(error.retry_after(), Some(Duration::from_secs(17)));
    }

    #[test]
    fn auth_and_config_errors_are_permanent() {
        let auth = CoreError::RedditApi(RedditApiError::AuthenticationFailed {
            reason: "bad credentials".to_string(),
        });
        assert!(!auth.is_retryable());
        assert_eq!(auth.retry_after(), None);

        let config = CoreError::Config(ConfigError::FileNotFound {
            path: "categories.toml".to_string(),
        });
        assert!(!config.is_retryable());
    }

    #[test]
    fn server_errors_are_retryable_without_delay() {
        let error = CoreError::RedditApi(RedditApiError::ServerError { status_code: 502 });
        assert!(error.is_retryable());
        assert_eq!(error.retry_after(), None);
    }
}
