use super::client::{Client, Commit, HostingApiResult, LicenseResponse, Tree};
use crate::Result;
use crate::facts::ProviderResult;
use crate::facts::RepoSpec;
use crate::facts::throttler::Throttler;
use chrono::Utc;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::sync::Arc;

const LOG_TARGET: &str = "    hosting";
const MAX_CONCURRENT_REQUESTS: usize = 5;
const MAX_RATE_LIMIT_WAIT: Duration = Duration::from_secs(15 * 60);
const COMMIT_PAGE_SIZE: usize = 100;

/// Unwrap a `Found` result or return any other variant unchanged.
macro_rules! found_or_return {
    ($expr:expr) => {
        match $expr {
            ProviderResult::Found(data) => data,
            ProviderResult::NotFound(reason) => return ProviderResult::NotFound(reason),
            ProviderResult::Unavailable(reason) => return ProviderResult::Unavailable(reason),
            ProviderResult::Error(e) => return ProviderResult::Error(e),
        }
    };
}

/// Fetches repository facts from GitHub.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    throttler: Arc<Throttler>,
}

impl Provider {
    pub fn new(token: &str, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(token, base_url)?,
            throttler: Throttler::new(MAX_CONCURRENT_REQUESTS),
        })
    }

    /// Confirm that the API accepts the configured token.
    pub async fn validate_token(&self) -> Result<()> {
        let status = self
            .client
            .probe_token()
            .await
            .into_app_err_with(|| format!("contacting GitHub at '{}' to validate GITHUB_TOKEN", self.client.base_url()))?;

        if !status.is_success() {
            bail!("GITHUB_TOKEN is invalid (HTTP {})", status.as_u16());
        }

        log::debug!(target: LOG_TARGET, "GitHub token validated");
        Ok(())
    }

    /// Distinct commit authors from the most recent page of commits, newest first.
    pub async fn commit_authors(&self, repo: &RepoSpec) -> ProviderResult<Vec<String>> {
        let url = self
            .client
            .endpoint(&format!("repos/{}/{}/commits?per_page={COMMIT_PAGE_SIZE}", repo.owner(), repo.repo()));

        let commits: Vec<Commit> = found_or_return!(self.fetch_json(&url, repo, "commits").await);

        let mut seen = HashSet::new();
        let authors: Vec<String> = commits
            .iter()
            .filter_map(Commit::author_identity)
            .filter(|identity| seen.insert(*identity))
            .map(str::to_string)
            .collect();

        log::debug!(target: LOG_TARGET, "Found {} commit author(s) for '{repo}'", authors.len());
        ProviderResult::Found(authors)
    }

    /// Every path in the default branch, directories included.
    pub async fn repo_tree(&self, repo: &RepoSpec) -> ProviderResult<Vec<String>> {
        let url = self
            .client
            .endpoint(&format!("repos/{}/{}/git/trees/HEAD?recursive=1", repo.owner(), repo.repo()));

        self.fetch_json::<Tree>(&url, repo, "file tree").await.map(|tree| {
            if tree.truncated {
                log::debug!(target: LOG_TARGET, "File tree for '{repo}' was truncated by the API");
            }
            tree.tree.into_iter().map(|item| item.path).collect()
        })
    }

    /// The repository's detected license identifier.
    pub async fn license(&self, repo: &RepoSpec) -> ProviderResult<String> {
        let url = self.client.endpoint(&format!("repos/{}/{}/license", repo.owner(), repo.repo()));
        match self.fetch_json::<LicenseResponse>(&url, repo, "license").await {
            ProviderResult::Found(resp) => match resp.identifier() {
                Some(id) => ProviderResult::Found(id.to_string()),
                None => ProviderResult::not_found(format!("no recognized license in '{repo}'")),
            },
            other => other.map(|_| String::new()),
        }
    }

    /// The repository's README as raw text.
    pub async fn readme(&self, repo: &RepoSpec) -> ProviderResult<String> {
        let url = self.client.endpoint(&format!("repos/{}/{}/readme", repo.owner(), repo.repo()));
        let resp = found_or_return!(self.fetch(&url, repo, "README", true).await);
        match resp.text().await.into_app_err_with(|| format!("reading README of '{repo}'")) {
            Ok(text) => ProviderResult::Found(text),
            Err(e) => ProviderResult::error(e),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str, repo: &RepoSpec, what: &str) -> ProviderResult<T> {
        let resp = found_or_return!(self.fetch(url, repo, what, false).await);
        match resp.json::<T>().await.into_app_err_with(|| format!("decoding {what} of '{repo}'")) {
            Ok(data) => ProviderResult::Found(data),
            Err(e) => ProviderResult::error(e),
        }
    }

    /// Issue one request, waiting out a single rate-limit window if GitHub reports one.
    async fn fetch(&self, url: &str, repo: &RepoSpec, what: &str, raw: bool) -> ProviderResult<reqwest::Response> {
        let mut waited = false;
        loop {
            if self.throttler.is_paused() {
                log::debug!(target: LOG_TARGET, "Waiting out the GitHub rate limit before fetching {what} for '{repo}'");
            }

            let result = {
                let _slot = self.throttler.acquire().await;
                if raw {
                    self.client.raw_call(url).await
                } else {
                    self.client.api_call(url).await
                }
            };

            match result {
                HostingApiResult::Success(resp) => return ProviderResult::Found(resp),
                HostingApiResult::NotFound => {
                    return ProviderResult::not_found(format!("HTTP 404: no {what} for repository '{repo}'"));
                }
                HostingApiResult::Failed(e) => {
                    log::warn!(target: LOG_TARGET, "Could not fetch {what} for '{repo}': {e:#}");
                    return ProviderResult::error(e);
                }
                HostingApiResult::RateLimited(info) if !waited => {
                    let wait = (info.reset_at - Utc::now()).to_std().unwrap_or_default().min(MAX_RATE_LIMIT_WAIT);
                    log::warn!(target: LOG_TARGET, "GitHub rate limit reached, pausing for {}s", wait.as_secs());
                    let _ = self.throttler.pause_for(wait);
                    waited = true;
                }
                HostingApiResult::RateLimited(info) => {
                    return ProviderResult::error(ohno::app_err!(
                        "GitHub rate limit still exhausted fetching {what} for '{repo}' (resets at {})",
                        info.reset_at
                    ));
                }
            }
        }
    }
}
