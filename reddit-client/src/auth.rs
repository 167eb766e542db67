use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, ResourceOwnerPassword, ResourceOwnerUsername, Scope,
    TokenResponse, TokenUrl,
};
use sorter_core::{CoreError, RedditApiError};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

const REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/authorize";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Scopes a script app needs to read and prune the saved listing.
const REQUIRED_SCOPES: [&str; 3] = ["identity", "history", "save"];

#[derive(Debug, Clone)]
pub struct RedditAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct RedditToken {
    pub access_token: String,
    pub expires_at: SystemTime,
    pub scope: Vec<String>,
}

impl RedditToken {
    pub fn is_expired(&self) -> bool {
        SystemTime::now() >= self.expires_at
    }
}

/// Resource-owner password grant, the flow Reddit prescribes for script apps.
#[derive(Debug)]
pub(crate) struct Authenticator {
    config: RedditAuthConfig,
    http_client: reqwest::Client,
}

impl Authenticator {
    pub fn new(config: RedditAuthConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    pub async fn password_grant(&self) -> Result<RedditToken, CoreError> {
        let oauth = BasicClient::new(
            ClientId::new(self.config.client_id.clone()),
            Some(ClientSecret::new(self.config.client_secret.clone())),
            AuthUrl::new(REDDIT_AUTH_URL.to_string()).map_err(|err| {
                RedditApiError::AuthenticationFailed {
                    reason: format!("invalid authorization URL: {err}"),
                }
            })?,
            Some(TokenUrl::new(REDDIT_TOKEN_URL.to_string()).map_err(|err| {
                RedditApiError::AuthenticationFailed {
                    reason: format!("invalid token URL: {err}"),
                }
            })?),
        );

        info!("Requesting OAuth2 token for /u/{}", self.config.username);
        let username = ResourceOwnerUsername::new(self.config.username.clone());
        let password = ResourceOwnerPassword::new(self.config.password.clone());
        let mut request = oauth.exchange_password(&username, &password);
        for scope in REQUIRED_SCOPES {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        let response = request
            .request_async(|http_request| self.send_token_request(http_request))
            .await
            .map_err(|err| RedditApiError::AuthenticationFailed {
                reason: err.to_string(),
            })?;

        let expires_in = response
            .expires_in()
            .unwrap_or(Duration::from_secs(3600));
        let scope = response
            .scopes()
            .map(|scopes| scopes.iter().map(|scope| scope.to_string()).collect())
            .unwrap_or_default();
        debug!("Token granted, expires in {:?}", expires_in);

        Ok(RedditToken {
            access_token: response.access_token().secret().clone(),
            expires_at: SystemTime::now() + expires_in,
            scope,
        })
    }

    /// Routes the token request through the shared client so Reddit's
    /// required User-Agent header rides along.
    async fn send_token_request(
        &self,
        request: oauth2::HttpRequest,
    ) -> Result<oauth2::HttpResponse, reqwest::Error> {
        let mut builder = self
            .http_client
            .request(request.method, request.url.as_str())
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status_code = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(oauth2::HttpResponse {
            status_code,
            headers,
            body,
        })
    }
}
