use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit API error: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed saved item: {details}")]
    MalformedItem { details: String },

    #[error("Remote action '{action}' failed for {item}: {reason}")]
    RemoteAction {
        action: String,
        item: String,
        reason: String,
    },
}

#[derive(Error, Debug, Clone)]
pub enum RedditApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Invalid OAuth token")]
    InvalidToken,

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Category file not found: {path}")]
    FileNotFound { path: String },

    #[error("Permission denied accessing category file: {path}")]
    PermissionDenied { path: String },

    #[error("Failed to read category file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Invalid category '{category}': {reason}")]
    InvalidCategory { category: String, reason: String },

    #[error("Category file parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
