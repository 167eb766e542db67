use crate::auth::RedditToken;
use crate::models::{Listing, ListingData};
use crate::rate_limiter::{RateLimitConfig, RateLimiter};
use crate::retry::{RetryConfig, RetryExecutor};
use reqwest::header::{HeaderMap, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use sorter_core::{CoreError, RedditApiError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const SAVED_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct RedditApiClient {
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
    retry: Arc<RetryExecutor>,
    user_agent: String,
}

impl RedditApiClient {
    pub fn new(user_agent: String) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RateLimitConfig::reddit_oauth())),
            retry: Arc::new(RetryExecutor::new(RetryConfig::reddit())),
            user_agent,
        })
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        token: &RedditToken,
        query_params: Option<&[(&str, &str)]>,
        form_params: Option<&[(&str, &str)]>,
    ) -> Result<Response, CoreError> {
        let url = format!("{REDDIT_API_BASE}{endpoint}");

        self.rate_limiter.throttle().await;
        debug!("{} {}", method, endpoint);

        let mut request_builder = self
            .http_client
            .request(method.clone(), &url)
            .bearer_auth(&token.access_token)
            .header(USER_AGENT, &self.user_agent);

        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }
        if let Some(params) = form_params {
            request_builder = request_builder.form(params);
        }

        let response = request_builder.send().await.map_err(|err| {
            error!("Network error for {} {}: {}", method, endpoint, err);
            if err.is_timeout() {
                CoreError::RedditApi(RedditApiError::RequestTimeout)
            } else {
                CoreError::Network(err)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        error!("Request failed with status {} for {}", status, endpoint);
        Err(error_for_status(status, endpoint, response.headers()))
    }

    /// Fetches one page of the saved listing, following the `after` cursor.
    ///
    /// Children stay raw JSON values; the caller decodes them item by item so
    /// one unexpected shape cannot poison a whole page.
    pub async fn saved_page(
        &self,
        token: &RedditToken,
        username: &str,
        after: Option<&str>,
    ) -> Result<ListingData<serde_json::Value>, CoreError> {
        let endpoint = format!("/user/{username}/saved");
        let limit = SAVED_PAGE_LIMIT.to_string();

        self.retry
            .execute("fetch saved listing page", || async {
                let mut params: Vec<(&str, &str)> =
                    vec![("limit", limit.as_str()), ("raw_json", "1")];
                if let Some(after) = after {
                    params.push(("after", after));
                }

                let response = self
                    .make_request(Method::GET, &endpoint, token, Some(&params), None)
                    .await?;

                let listing: Listing<serde_json::Value> =
                    response.json().await.map_err(|err| {
                        error!("Failed to parse saved listing: {}", err);
                        CoreError::RedditApi(RedditApiError::InvalidResponse {
                            details: format!("failed to parse saved listing for u/{username}"),
                        })
                    })?;

                info!(
                    "Retrieved {} saved items (after: {:?})",
                    listing.data.children.len(),
                    listing.data.after
                );
                Ok(listing.data)
            })
            .await
    }

    /// Removes an item from the saved listing by fullname.
    pub async fn unsave(&self, token: &RedditToken, fullname: &str) -> Result<(), CoreError> {
        self.retry
            .execute("unsave item", || async {
                self.make_request(
                    Method::POST,
                    "/api/unsave",
                    token,
                    None,
                    Some(&[("id", fullname)]),
                )
                .await?;
                debug!("Unsaved {}", fullname);
                Ok(())
            })
            .await
    }
}

fn error_for_status(status: StatusCode, endpoint: &str, headers: &HeaderMap) -> CoreError {
    let api_error = match status.as_u16() {
        429 => {
            let retry_after = headers
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse().ok())
                .unwrap_or(60);
            warn!("Rate limited on {}, retry after {}s", endpoint, retry_after);
            RedditApiError::RateLimitExceeded { retry_after }
        }
        401 => RedditApiError::InvalidToken,
        403 => RedditApiError::Forbidden {
            resource: endpoint.to_string(),
        },
        code if status.is_server_error() => RedditApiError::ServerError { status_code: code },
        code => RedditApiError::InvalidResponse {
            details: format!("unexpected status {code} for {endpoint}"),
        },
    };

    CoreError::RedditApi(api_error)
}
