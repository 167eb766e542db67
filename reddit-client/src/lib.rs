pub mod api;
pub mod auth;
pub mod models;
pub mod rate_limiter;
pub mod retry;

use auth::Authenticator;
use futures::Stream;
use sorter_core::CoreError;
use std::collections::VecDeque;
use tracing::{info, warn};

pub use api::RedditApiClient;
pub use auth::{RedditAuthConfig, RedditToken};
pub use models::{RawSavedItem, SavedCommentData, SavedPostData};

pub struct RedditClient {
    api: RedditApiClient,
    auth: Authenticator,
}

impl RedditClient {
    pub fn new(config: RedditAuthConfig) -> Result<Self, CoreError> {
        let api = RedditApiClient::new(config.user_agent.clone())?;
        let auth = Authenticator::new(config, api.http_client().clone());
        Ok(Self { api, auth })
    }

    /// Exchanges the configured credentials for an OAuth2 token.
    pub async fn authenticate(&self) -> Result<RedditSession, CoreError> {
        let token = self.auth.password_grant().await?;
        info!("Authenticated as /u/{}", self.auth.username());

        Ok(RedditSession {
            api: self.api.clone(),
            token,
            username: self.auth.username().to_string(),
        })
    }
}

/// An authenticated view of one account's saved listing.
pub struct RedditSession {
    api: RedditApiClient,
    token: RedditToken,
    username: String,
}

struct SavedCursor {
    after: Option<String>,
    buffered: VecDeque<serde_json::Value>,
    exhausted: bool,
}

impl RedditSession {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &RedditToken {
        &self.token
    }

    /// Lazy, finite sequence over the account's saved items.
    ///
    /// Pages are fetched on demand as the stream is polled. Listing children
    /// that do not decode into a known item shape are logged and skipped;
    /// fetch failures terminate the stream with the error.
    pub fn saved_items(&self) -> impl Stream<Item = Result<RawSavedItem, CoreError>> + '_ {
        let cursor = SavedCursor {
            after: None,
            buffered: VecDeque::new(),
            exhausted: false,
        };

        futures::stream::try_unfold(cursor, move |mut cursor| async move {
            loop {
                if let Some(child) = cursor.buffered.pop_front() {
                    match serde_json::from_value::<RawSavedItem>(child) {
                        Ok(item) => return Ok(Some((item, cursor))),
                        Err(err) => {
                            warn!("Skipping saved item with unexpected shape: {}", err);
                            continue;
                        }
                    }
                }

                if cursor.exhausted {
                    return Ok(None);
                }

                let page = self
                    .api
                    .saved_page(&self.token, &self.username, cursor.after.as_deref())
                    .await?;
                cursor.exhausted = page.after.is_none() || page.children.is_empty();
                cursor.after = page.after;
                cursor.buffered.extend(page.children);
            }
        })
    }

    /// Removes the item from the saved listing.
    ///
    /// Failures are reported as `RemoteAction` errors; the caller decides
    /// whether they abort anything (they should not).
    pub async fn unsave(&self, item: &RawSavedItem) -> Result<(), CoreError> {
        let fullname = item.fullname();
        self.api
            .unsave(&self.token, fullname)
            .await
            .map_err(|err| CoreError::RemoteAction {
                action: "unsave".to_string(),
                item: fullname.to_string(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> RedditAuthConfig {
        RedditAuthConfig {
            client_id: "test_client_id".to_string(),
            client_secret: "test_client_secret".to_string(),
            username: "test_user".to_string(),
            password: "hunter2".to_string(),
            user_agent: "saved-sorter/0.1 by /u/test_user".to_string(),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = RedditClient::new(test_config());
        assert!(client.is_ok());
    }
}
