use super::attributes::{LicenseHints, normalize};
use super::readme_links::first_repository_link;
use super::{ArtifactFacts, ProviderResult, RepoSpec, hosting, hub};
use crate::intake::{Category, Entry};
use std::collections::HashSet;

const LOG_TARGET: &str = "  collector";

/// Gathers facts about entries from the model hub and the source-control host.
#[derive(Debug, Clone)]
pub struct Collector {
    hub: hub::Provider,
    hosting: hosting::Provider,
}

impl Collector {
    #[must_use]
    pub const fn new(hub: hub::Provider, hosting: hosting::Provider) -> Self {
        Self { hub, hosting }
    }

    /// Collect facts for one entry. Fetch failures are recorded in the facts, never returned.
    pub async fn collect(&self, entry: Entry) -> ArtifactFacts {
        log::debug!(target: LOG_TARGET, "Collecting facts for '{}'", entry.url());

        let needs_hub_readme = entry.category() == Category::Model && entry.code_url().is_none();
        let (metadata, hub_readme, linked_dataset) = tokio::join!(
            self.hub.fetch_document(&entry),
            async {
                if needs_hub_readme {
                    self.hub.fetch_readme(&entry).await
                } else {
                    None
                }
            },
            self.linked_dataset_document(&entry),
        );

        let code_repo = resolve_code_repo(&entry, hub_readme.as_deref());
        let is_code = entry.category() == Category::Code;

        let (commit_authors, repo_files, repo_license, repo_readme) = match &code_repo {
            Some(repo) => {
                tokio::join!(
                    self.commit_authors(&entry, Some(repo)),
                    self.hosting.repo_tree(repo),
                    async {
                        if is_code {
                            self.hosting.license(repo).await
                        } else {
                            ProviderResult::unavailable("only consulted for code entries")
                        }
                    },
                    async {
                        if is_code {
                            self.hosting.readme(repo).await
                        } else {
                            ProviderResult::unavailable("only consulted for code entries")
                        }
                    },
                )
            }
            None => (
                self.commit_authors(&entry, None).await,
                ProviderResult::unavailable("no code repository"),
                ProviderResult::unavailable("no code repository"),
                ProviderResult::unavailable("no code repository"),
            ),
        };

        let hints = LicenseHints {
            repository_license: repo_license.as_ref().map(String::as_str),
            readme: repo_readme.as_ref().map(String::as_str),
        };

        let attributes = normalize(entry.category(), &metadata, hints);
        if let Some(marker) = &attributes.metadata_error {
            log::info!(target: LOG_TARGET, "No metadata for '{}': {marker}", entry.url());
        }

        ArtifactFacts {
            attributes,
            linked_dataset: linked_dataset.map(|doc| normalize(Category::Dataset, &doc, LicenseHints::default())),
            metadata,
            code_repo,
            commit_authors,
            repo_files,
            entry,
        }
    }

    async fn linked_dataset_document(&self, entry: &Entry) -> Option<ProviderResult<serde_json::Value>> {
        let url = entry.dataset_url().filter(|_| entry.category() == Category::Model)?;
        Some(self.hub.fetch_document(&Entry::new(Category::Dataset, url)).await)
    }

    async fn commit_authors(&self, entry: &Entry, repo: Option<&RepoSpec>) -> ProviderResult<Vec<String>> {
        if let Some(known) = entry.commit_authors() {
            return ProviderResult::Found(dedup_authors(known));
        }

        match repo {
            Some(repo) => self.hosting.commit_authors(repo).await,
            None => ProviderResult::unavailable("no code repository"),
        }
    }
}

/// The entry's own code URL, the entry itself for code entries, or the first repository linked from its README.
fn resolve_code_repo(entry: &Entry, hub_readme: Option<&str>) -> Option<RepoSpec> {
    let url = entry
        .code_url()
        .map(str::to_string)
        .or_else(|| (entry.category() == Category::Code).then(|| entry.url().to_string()))
        .or_else(|| hub_readme.and_then(first_repository_link))?;

    match RepoSpec::parse(&url) {
        Ok(repo) => Some(repo),
        Err(e) => {
            log::debug!(target: LOG_TARGET, "Ignoring code URL '{url}': {e:#}");
            None
        }
    }
}

fn dedup_authors(authors: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty() && seen.insert(*a))
        .map(str::to_string)
        .collect()
}
