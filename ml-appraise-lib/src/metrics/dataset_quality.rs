use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::{ArtifactFacts, Attributes};
use serde_json::Value;

const CARD_FIELDS: &[&str] = &[
    "task_categories",
    "language",
    "size_categories",
    "source_datasets",
    "annotations_creators",
    "language_creators",
];

/// What a dataset card says about the dataset behind an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetCard {
    pub example_count: u64,
    pub description_len: usize,

    /// Fraction of the standard card fields that are filled in
    pub completeness: f64,
    pub has_features: bool,
    pub has_splits: bool,
    pub citation_len: usize,
    pub downloads: u64,
    pub likes: u64,
}

/// Rates the documentation of the dataset an entry is, or is linked to.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetQuality;

impl Metric for DatasetQuality {
    /// `None` when there is no dataset to judge.
    type Data = Option<DatasetCard>;

    fn name(&self) -> &'static str {
        "dataset_quality"
    }

    fn description(&self) -> &'static str {
        "Dataset size, card completeness and documentation"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Data
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(0.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<DatasetCard>> {
        let Some(attrs) = facts.dataset_attributes() else {
            return Ok(None);
        };

        if attrs.metadata_error.is_some() {
            return Ok(None);
        }

        let infos = dataset_infos(attrs);
        Ok(Some(DatasetCard {
            example_count: example_count(attrs),
            description_len: attrs.description.trim().chars().count(),
            completeness: card_completeness(attrs),
            has_features: infos.iter().any(|info| info.get("features").is_some_and(is_filled)),
            has_splits: infos.iter().any(|info| info.get("splits").is_some_and(is_filled)),
            citation_len: attrs.citation.trim().chars().count(),
            downloads: attrs.downloads,
            likes: attrs.likes,
        }))
    }

    fn score(&self, data: &Option<DatasetCard>) -> MetricValue {
        let Some(card) = data else {
            return self.sentinel();
        };

        let size = match card.example_count {
            n if n > 10_000_000 => 0.35,
            n if n > 1_000_000 => 0.30,
            n if n > 100_000 => 0.20,
            n if n > 10_000 => 0.12,
            n if n > 1000 => 0.08,
            n if n > 0 => 0.05,
            _ => 0.0,
        };

        let description = match card.description_len {
            len if len > 500 => 0.25,
            len if len > 300 => 0.20,
            len if len > 150 => 0.15,
            len if len > 75 => 0.10,
            len if len > 25 => 0.05,
            _ => 0.0,
        };

        let structure = match (card.has_features, card.has_splits) {
            (true, true) => 0.10,
            (true, false) | (false, true) => 0.05,
            (false, false) => 0.0,
        };

        let citation = if card.citation_len > 20 { 0.05 } else { 0.0 };

        let popularity = if card.downloads > 5000 || card.likes > 50 {
            0.05
        } else if card.downloads > 1000 || card.likes > 10 {
            0.03
        } else if card.downloads > 100 || card.likes > 5 {
            0.02
        } else {
            0.0
        };

        let score = card.completeness.mul_add(0.20, size + description + structure + citation + popularity);
        MetricValue::Score(score.min(1.0))
    }
}

/// Total number of examples across every split the dataset card declares.
pub(super) fn example_count(attrs: &Attributes) -> u64 {
    dataset_infos(attrs)
        .into_iter()
        .filter_map(|info| info.get("splits").and_then(Value::as_array))
        .flatten()
        .filter_map(|split| split.get("num_examples").and_then(Value::as_u64))
        .sum()
}

/// The card's `dataset_info`, which is either a single object or a list of per-config objects.
fn dataset_infos(attrs: &Attributes) -> Vec<&Value> {
    match attrs.card_data.get("dataset_info") {
        Some(Value::Array(items)) => items.iter().filter(|item| item.is_object()).collect(),
        Some(info @ Value::Object(_)) => vec![info],
        _ => Vec::new(),
    }
}

#[expect(clippy::cast_precision_loss, reason = "both counts are tiny")]
fn card_completeness(attrs: &Attributes) -> f64 {
    let present = CARD_FIELDS
        .iter()
        .filter(|field| attrs.card_data.get(**field).is_some_and(is_filled))
        .count();

    present as f64 / CARD_FIELDS.len() as f64
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{LicenseHints, ProviderResult, normalize};
    use crate::intake::{Category, Entry};
    use serde_json::json;

    fn dataset_facts(doc: Value) -> ArtifactFacts {
        ArtifactFacts::from_document(Entry::new(Category::Dataset, "https://huggingface.co/datasets/o/d"), doc)
    }

    fn evaluate(facts: &ArtifactFacts) -> f64 {
        let data = DatasetQuality.extract(facts).unwrap();
        DatasetQuality.score(&data).as_score().unwrap()
    }

    #[test]
    fn test_example_count_from_object_and_list() {
        let object = dataset_facts(json!({"cardData": {"dataset_info": {"splits": [
            {"name": "train", "num_examples": 1000},
            {"name": "test", "num_examples": 200}
        ]}}}));
        assert_eq!(example_count(&object.attributes), 1200);

        let list = dataset_facts(json!({"cardData": {"dataset_info": [
            {"config_name": "a", "splits": [{"num_examples": 5}]},
            {"config_name": "b", "splits": [{"num_examples": 7}, {"name": "no count"}]},
            "junk"
        ]}}));
        assert_eq!(example_count(&list.attributes), 12);
    }

    #[test]
    fn test_rich_dataset_card() {
        let facts = dataset_facts(json!({
            "description": "d".repeat(600),
            "citation": "@article{someone2024, title={A dataset}}",
            "downloads": 10_000,
            "cardData": {
                "task_categories": ["automatic-speech-recognition"],
                "language": ["en"],
                "size_categories": ["1M<n<10M"],
                "source_datasets": ["original"],
                "annotations_creators": ["crowdsourced"],
                "language_creators": ["crowdsourced"],
                "dataset_info": {
                    "features": [{"name": "audio"}],
                    "splits": [{"name": "train", "num_examples": 2_000_000}]
                }
            }
        }));

        // 0.30 + 0.25 + 0.20 + 0.10 + 0.05 + 0.05
        assert!((evaluate(&facts) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_partial_card() {
        let facts = dataset_facts(json!({
            "description": "A short description of this dataset here.",
            "likes": 6,
            "cardData": {"language": "en", "task_categories": [], "dataset_info": {"splits": [{"num_examples": 50}]}}
        }));

        // size 0.05 + description 0.05 + one field of six + splits only 0.05 + popularity 0.02
        let expected = 0.05 + 0.05 + 0.20 / 6.0 + 0.05 + 0.02;
        assert!((evaluate(&facts) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_model_uses_linked_dataset() {
        let mut facts = ArtifactFacts::from_document(Entry::new(Category::Model, "https://huggingface.co/o/m"), json!({}));
        assert_eq!(DatasetQuality.extract(&facts).unwrap(), None);

        let linked = ProviderResult::Found(json!({"cardData": {"dataset_info": {"splits": [{"num_examples": 20_000}]}}}));
        facts.linked_dataset = Some(normalize(Category::Dataset, &linked, LicenseHints::default()));

        // size 0.12 + splits only 0.05
        assert!((evaluate(&facts) - 0.17).abs() < 1e-9);
    }

    #[test]
    fn test_missing_dataset_document_is_sentinel() {
        let mut facts = dataset_facts(json!({}));
        facts.attributes.metadata_error = Some("HTTP 404".into());
        assert_eq!(DatasetQuality.extract(&facts).unwrap(), None);
        assert_eq!(DatasetQuality.score(&None), MetricValue::Score(0.0));
    }
}
