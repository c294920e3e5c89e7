//! GitHub REST API client
//!
//! A thin typed wrapper over the handful of endpoints the repository tools
//! need. All operations verify a token is configured before touching the
//! network, and non-success responses are mapped to [`ApiError`] variants
//! by status code and response body.
//!
//! See: https://docs.github.com/en/rest

use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::error::{ApiError, ApiResult};
use super::types::{NewRepository, Owner, Repository};
use crate::config::Config;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";
const HTTP_TIMEOUT_SECS: u64 = 30;

/// GitHub REST API client bound to one token and base URL
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("github-repo-mcp/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            api_url: config.github.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// The configured token, or [`ApiError::MissingToken`] before any
    /// request goes out
    fn token(&self) -> ApiResult<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingToken)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// The account the token belongs to (`GET /user`)
    pub async fn authenticated_user(&self) -> ApiResult<Owner> {
        let token = self.token()?;
        debug!("GET /user");

        let response = self
            .http
            .get(self.endpoint("/user"))
            .bearer_auth(token)
            .header("Accept", ACCEPT_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        parse_response(response, "authenticated user").await
    }

    /// Create a repository for the authenticated user (`POST /user/repos`)
    pub async fn create_repository(&self, new_repo: &NewRepository) -> ApiResult<Repository> {
        let token = self.token()?;
        debug!("POST /user/repos name={}", new_repo.name);

        let response = self
            .http
            .post(self.endpoint("/user/repos"))
            .bearer_auth(token)
            .header("Accept", ACCEPT_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(new_repo)
            .send()
            .await?;

        parse_response(response, &format!("repository '{}'", new_repo.name)).await
    }

    /// Look up one of the authenticated user's repositories by name
    pub async fn get_repository(&self, name: &str) -> ApiResult<Repository> {
        let owner = self.authenticated_user().await?;
        let token = self.token()?;
        debug!("GET /repos/{}/{}", owner.login, name);

        let response = self
            .http
            .get(self.endpoint(&format!("/repos/{}/{}", owner.login, name)))
            .bearer_auth(token)
            .header("Accept", ACCEPT_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()
            .await?;

        parse_response(response, &format!("repository '{}'", name)).await
    }
}

// GitHub error payload: { "message": "...", "errors": [{ "message": "..." }] }
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl ErrorBody {
    fn mentions_existing_name(&self) -> bool {
        self.errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .any(|m| m.contains("name already exists"))
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response, resource: &str) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let rate_exhausted = response
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        == Some("0");
    let body: ErrorBody = response.json().await.unwrap_or_default();

    Err(map_status(status, rate_exhausted, body, resource))
}

fn map_status(
    status: StatusCode,
    rate_exhausted: bool,
    body: ErrorBody,
    resource: &str,
) -> ApiError {
    let message = body.message.clone().unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    });

    match status.as_u16() {
        401 => ApiError::BadCredentials(message),
        403 | 429 if rate_exhausted || message.to_lowercase().contains("rate limit") => {
            ApiError::RateLimited(message)
        }
        404 => ApiError::NotFound(resource.to_string()),
        422 if body.mentions_existing_name() => ApiError::Duplicate(resource.to_string()),
        code => ApiError::Status {
            status: code,
            message,
        },
    }
}
