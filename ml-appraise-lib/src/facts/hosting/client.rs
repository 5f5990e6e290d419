//! GitHub REST API client
//!
//! Minimal client for the handful of repository endpoints the metrics need.

use crate::facts::resilient_http::resilient_get_accepting;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

const USER_AGENT: &str = "ml-appraise";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// One entry of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Deserialize)]
pub struct Commit {
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetail {
    pub author: Option<Signature>,
}

#[derive(Debug, Deserialize)]
pub struct Signature {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Commit {
    /// The commit author's name, or their e-mail when the name is blank or belongs to automation.
    ///
    /// Automation accounts yield `None`.
    #[must_use]
    pub fn author_identity(&self) -> Option<&str> {
        let signature = self.commit.author.as_ref()?;
        [signature.name.as_deref(), signature.email.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty() && !is_automation(s))
    }
}

fn is_automation(identity: &str) -> bool {
    let lower = identity.to_ascii_lowercase();
    lower == "github" || lower.contains("[bot]") || lower.contains("noreply@github.com")
}

/// Response of `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`
#[derive(Debug, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub tree: Vec<TreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub struct TreeItem {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Response of `GET /repos/{owner}/{repo}/license`
#[derive(Debug, Deserialize)]
pub struct LicenseResponse {
    pub license: Option<LicenseInfo>,
}

#[derive(Debug, Deserialize)]
pub struct LicenseInfo {
    pub spdx_id: Option<String>,
    pub key: Option<String>,
}

impl LicenseResponse {
    /// The SPDX id, falling back to GitHub's license key. `NOASSERTION` counts as absent.
    #[must_use]
    pub fn identifier(&self) -> Option<&str> {
        let license = self.license.as_ref()?;
        license
            .spdx_id
            .as_deref()
            .filter(|id| !id.eq_ignore_ascii_case("noassertion"))
            .or(license.key.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Rate limit information from response headers
#[derive(Debug, Clone, Copy)]
pub struct RateLimitInfo {
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Result of a GitHub API call
#[derive(Debug)]
pub enum HostingApiResult<T> {
    /// Request succeeded
    Success(T),

    /// Rate limited until the given reset time
    RateLimited(RateLimitInfo),

    /// The requested resource does not exist (404)
    NotFound,

    /// Request failed for any other reason
    Failed(ohno::AppError),
}

/// GitHub API client
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client authenticating with `token` against the API rooted at `base_url`.
    pub fn new(token: &str, base_url: impl Into<String>) -> crate::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {token}"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        let _ = headers.insert(AUTHORIZATION, auth);
        let _ = headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .default_headers(headers)
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute URL for an API path such as `repos/o/r/license`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check that the token is accepted, returning the HTTP status of `GET /rate_limit`.
    pub async fn probe_token(&self) -> crate::Result<StatusCode> {
        let url = self.endpoint("rate_limit");
        let resp = resilient_get_accepting(&self.http, &url, JSON_MEDIA_TYPE).await?;
        Ok(resp.status())
    }

    /// Make a JSON API call and classify the result.
    pub async fn api_call(&self, url: &str) -> HostingApiResult<reqwest::Response> {
        self.call(url, JSON_MEDIA_TYPE).await
    }

    /// Fetch raw file content, such as a README, and classify the result.
    pub async fn raw_call(&self, url: &str) -> HostingApiResult<reqwest::Response> {
        self.call(url, RAW_MEDIA_TYPE).await
    }

    async fn call(&self, url: &str, accept: &'static str) -> HostingApiResult<reqwest::Response> {
        let resp = match resilient_get_accepting(&self.http, url, accept).await {
            Ok(r) => r,
            Err(e) => return HostingApiResult::Failed(e),
        };

        let status = resp.status();
        if status.is_success() {
            return HostingApiResult::Success(resp);
        }

        let rate_limit = extract_rate_limit_from_headers(resp.headers());
        match status {
            StatusCode::TOO_MANY_REQUESTS => HostingApiResult::RateLimited(rate_limit.unwrap_or_else(default_reset)),
            StatusCode::FORBIDDEN if rate_limit.is_some_and(|r| r.remaining == 0) => {
                HostingApiResult::RateLimited(rate_limit.unwrap_or_else(default_reset))
            }
            StatusCode::NOT_FOUND => HostingApiResult::NotFound,
            _ => HostingApiResult::Failed(ohno::app_err!("HTTP {} from {url}", status.as_u16())),
        }
    }
}

fn default_reset() -> RateLimitInfo {
    RateLimitInfo {
        remaining: 0,
        reset_at: Utc::now() + chrono::Duration::minutes(1),
    }
}

/// Extract rate limit information from API response headers
fn extract_rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let remaining = headers.get("x-ratelimit-remaining")?.to_str().ok()?.parse::<usize>().ok()?;
    let reset = headers.get("x-ratelimit-reset")?.to_str().ok()?.parse::<i64>().ok()?;

    Some(RateLimitInfo {
        remaining,
        reset_at: DateTime::from_timestamp(reset, 0)?,
    })
}
