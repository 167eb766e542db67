use sorter_core::{ConfigError, CoreError, ErrorExt, RedditApiError};
use std::time::Duration;

#[test]
fn test_error_display() {
    let auth_error = CoreError::RedditApi(RedditApiError::AuthenticationFailed {
        reason: "unsupported grant type".to_string(),
    });
    assert_eq!(
        auth_error.to_string(),
        "Reddit API error: Authentication failed: unsupported grant type"
    );

    let config_error = CoreError::Config(ConfigError::FileNotFound {
        path: "categories.toml".to_string(),
    });
    assert_eq!(
        config_error.to_string(),
        "Configuration error: Category file not found: categories.toml"
    );

    let malformed = CoreError::MalformedItem {
        details: "comment t1_x is missing link_url".to_string(),
    };
    assert!(malformed.to_string().contains("t1_x"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: CoreError = io_error.into();
    assert!(matches!(error, CoreError::Io(_)));
    assert!(!error.is_retryable());
}

#[test]
fn test_toml_error_conversion() {
    let parse_error = toml::from_str::<toml::Table>("not = = toml").unwrap_err();
    let error: CoreError = ConfigError::from(parse_error).into();
    assert!(matches!(error, CoreError::Config(ConfigError::Parse(_))));
}

#[test]
fn test_serde_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: CoreError = json_error.into();
    assert!(matches!(error, CoreError::Serialization(_)));
}

#[test]
fn test_retryable_classification() {
    let retryable = CoreError::RedditApi(RedditApiError::RateLimitExceeded { retry_after: 60 });
    assert!(retryable.is_retryable());
    assert_eq!(retryable.retry_after(), Some(Duration::from_secs(60)));

    let timeout = CoreError::RedditApi(RedditApiError::RequestTimeout);
    assert!(timeout.is_retryable());
    assert_eq!(timeout.retry_after(), None);

    let forbidden = CoreError::RedditApi(RedditApiError::Forbidden {
        resource: "/user/someone/saved".to_string(),
    });
    assert!(!forbidden.is_retryable());
}

#[test]
fn test_remote_action_error_carries_context() {
    let error = CoreError::RemoteAction {
        action: "unsave".to_string(),
        item: "t3_abc123".to_string(),
        reason: "Server error: 503".to_string(),
    };
    let rendered = error.to_string();
    assert!(rendered.contains("unsave"));
    assert!(rendered.contains("t3_abc123"));
    assert!(!error.is_retryable());
}
