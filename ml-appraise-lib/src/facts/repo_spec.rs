use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use std::sync::Arc;
use url::Url;

/// A source-control repository, reduced to its host, owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSpec {
    url: Arc<Url>,
    owner: Arc<str>,
    repo: Arc<str>,
}

impl RepoSpec {
    /// Parse a repository URL such as `https://github.com/owner/repo/tree/main`.
    ///
    /// The scheme may be omitted. Anything past the repository name is dropped, as is a `.git` suffix.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let url = if text.contains("://") {
            Url::parse(text)
        } else {
            Url::parse(&format!("https://{text}"))
        }
        .into_app_err_with(|| format!("parsing repository URL '{text}'"))?;

        let Some(host) = url.host_str() else {
            bail!("repository URL '{text}' has no host");
        };

        let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());
        let (Some(owner), Some(repo)) = (segments.next(), segments.next()) else {
            bail!("repository URL '{text}' must name an owner and a repository");
        };

        let repo = repo.trim_end_matches(".git");
        if repo.is_empty() {
            bail!("repository URL '{text}' has an empty repository name");
        }

        let clean = Url::parse(&format!("{}://{host}/{owner}/{repo}", url.scheme()))
            .into_app_err("reconstructing repository URL")?;

        Ok(Self {
            url: Arc::new(clean),
            owner: Arc::from(owner),
            repo: Arc::from(repo),
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl Display for RepoSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
