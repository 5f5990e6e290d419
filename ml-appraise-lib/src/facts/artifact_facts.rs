use super::attributes::{Attributes, LicenseHints, normalize};
use super::{ProviderResult, RepoSpec};
use crate::intake::{Category, Entry};
use serde_json::Value;

/// Everything known about one entry once collection is complete. Read-only from here on.
#[derive(Debug, Clone)]
pub struct ArtifactFacts {
    pub entry: Entry,

    /// The raw hub document.
    pub metadata: ProviderResult<Value>,

    /// The normalized view of [`Self::metadata`].
    pub attributes: Attributes,

    /// Normalized attributes of the dataset a model is linked to.
    pub linked_dataset: Option<Attributes>,

    /// The code repository associated with the entry, if one could be determined.
    pub code_repo: Option<RepoSpec>,

    pub commit_authors: ProviderResult<Vec<String>>,

    /// Every path in the code repository.
    pub repo_files: ProviderResult<Vec<String>>,
}

impl ArtifactFacts {
    /// Facts for an entry known only through its hub document.
    #[must_use]
    pub fn from_document(entry: Entry, document: Value) -> Self {
        let metadata = ProviderResult::Found(document);
        let attributes = normalize(entry.category(), &metadata, LicenseHints::default());
        Self {
            entry,
            metadata,
            attributes,
            linked_dataset: None,
            code_repo: None,
            commit_authors: ProviderResult::unavailable("no code repository"),
            repo_files: ProviderResult::unavailable("no code repository"),
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.entry.category()
    }

    /// Attributes describing the dataset side of the entry: its own for datasets, the linked dataset's for models.
    #[must_use]
    pub fn dataset_attributes(&self) -> Option<&Attributes> {
        match self.entry.category() {
            Category::Dataset => Some(&self.attributes),
            _ => self.linked_dataset.as_ref(),
        }
    }

    /// Why the hub document is missing, when it is.
    #[must_use]
    pub fn metadata_error(&self) -> Option<&str> {
        self.attributes.metadata_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document_normalizes() {
        let entry = Entry::new(Category::Model, "https://huggingface.co/o/m");
        let facts = ArtifactFacts::from_document(entry, json!({"likes": 3, "license": "MIT"}));
        assert_eq!(facts.attributes.likes, 3);
        assert_eq!(facts.attributes.license, "mit");
        assert_eq!(facts.metadata_error(), None);
        assert!(!facts.repo_files.is_found());
    }

    #[test]
    fn test_dataset_attributes() {
        let dataset = Entry::new(Category::Dataset, "https://huggingface.co/datasets/o/d");
        let facts = ArtifactFacts::from_document(dataset, json!({"description": "rows"}));
        assert_eq!(facts.dataset_attributes().map(|a| a.description.as_str()), Some("rows"));

        let model = Entry::new(Category::Model, "https://huggingface.co/o/m");
        let mut facts = ArtifactFacts::from_document(model, json!({"description": "weights"}));
        assert_eq!(facts.dataset_attributes(), None);

        facts.linked_dataset = Some(Attributes {
            description: "linked".into(),
            ..Attributes::default()
        });
        assert_eq!(facts.dataset_attributes().map(|a| a.description.as_str()), Some("linked"));
    }
}
