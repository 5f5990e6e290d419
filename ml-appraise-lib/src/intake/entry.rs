use super::{Category, extract_name};

/// One classified artifact reference, with the dataset and code repository it was listed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    category: Category,
    url: String,
    name: String,
    dataset_url: Option<String>,
    code_url: Option<String>,
    commit_authors: Option<Vec<String>>,
}

impl Entry {
    /// Create an entry for `url`, deriving its name from the URL.
    #[must_use]
    pub fn new(category: Category, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            category,
            name: extract_name(&url),
            url,
            dataset_url: None,
            code_url: None,
            commit_authors: None,
        }
    }

    /// Attach the dataset this entry was trained or evaluated on. Blank URLs are ignored.
    #[must_use]
    pub fn with_dataset_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.dataset_url = non_blank(url);
        self
    }

    /// Attach the code repository associated with this entry. Blank URLs are ignored.
    #[must_use]
    pub fn with_code_url(mut self, url: Option<impl Into<String>>) -> Self {
        self.code_url = non_blank(url);
        self
    }

    /// Supply commit authors gathered elsewhere so they need not be fetched again.
    #[must_use]
    pub fn with_commit_authors(mut self, authors: Vec<String>) -> Self {
        self.commit_authors = Some(authors);
        self
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dataset_url(&self) -> Option<&str> {
        self.dataset_url.as_deref()
    }

    #[must_use]
    pub fn code_url(&self) -> Option<&str> {
        self.code_url.as_deref()
    }

    #[must_use]
    pub fn commit_authors(&self) -> Option<&[String]> {
        self.commit_authors.as_deref()
    }
}

fn non_blank(url: Option<impl Into<String>>) -> Option<String> {
    url.map(Into::into).filter(|u| !u.trim().is_empty())
}
