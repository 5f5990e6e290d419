use super::dataset_quality::example_count;
use super::signals::{any_file_mentions, any_tag_mentions, clamp_unit, mentions_any};
use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::ArtifactFacts;
use crate::intake::Category;
use serde_json::Value;

const EXAMPLE_FILES: &[&str] = &["example", "demo", "tutorial", ".py", ".ipynb"];
const ML_TAGS: &[&str] = &["transformers", "pytorch", "tensorflow", "tf", "jax", "task_categories:", "task_ids:", "pipeline_tag"];
const COMMON_LICENSES: &[&str] = &["apache", "mit", "bsd", "gpl", "cc", "mozilla"];

/// Signals describing how usable an artifact's data and code are together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub category: Category,

    /// Length of the description, when it is long enough to count as documentation
    pub documentation_len: Option<usize>,
    pub code_examples: bool,
    pub example_count: u64,
    pub ml_integration: bool,
    pub license: String,
    pub downloads: u64,
    pub likes: u64,
}

/// Rates whether an artifact comes with documentation, examples, data and a clear license.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetAndCode;

impl Metric for DatasetAndCode {
    type Data = Option<Availability>;

    fn name(&self) -> &'static str {
        "dataset_and_code_score"
    }

    fn description(&self) -> &'static str {
        "Availability of documentation, examples, data and licensing"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Data
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(-1.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<Availability>> {
        let category = facts.category();
        if facts.metadata_error().is_some() && category != Category::Code {
            return Ok(None);
        }

        let attrs = &facts.attributes;
        let description_len = attrs.description.trim().chars().count();

        Ok(Some(Availability {
            category,
            documentation_len: (description_len >= 50).then_some(description_len),
            code_examples: !attrs.widget_data.is_empty()
                || attrs.transformers_info.get("auto_model").is_some_and(|m| !m.is_null())
                || any_file_mentions(&attrs.siblings, EXAMPLE_FILES),
            example_count: if category == Category::Dataset { example_count(attrs) } else { 0 },
            ml_integration: any_tag_mentions(&attrs.tags, ML_TAGS)
                || attrs.pipeline_tag.as_deref().is_some_and(|t| !t.is_empty())
                || !attrs.transformers_info.is_empty(),
            license: attrs.license.clone(),
            downloads: attrs.downloads,
            likes: attrs.likes,
        }))
    }

    #[expect(clippy::cast_precision_loss, reason = "popularity counts only matter up to a few hundred")]
    fn score(&self, data: &Option<Availability>) -> MetricValue {
        let Some(signals) = data else {
            return self.sentinel();
        };

        let mut score = match signals.documentation_len {
            Some(len) if len > 200 => 0.30,
            Some(len) if len > 100 => 0.20,
            Some(_) => 0.10,
            None => 0.0,
        };

        if signals.code_examples {
            score += 0.25;
        }

        score += match signals.category {
            Category::Dataset => match signals.example_count {
                n if n > 1_000_000 => 0.20,
                n if n > 100_000 => 0.15,
                n if n > 10_000 => 0.10,
                n if n > 1000 => 0.05,
                _ => 0.0,
            },
            Category::Model | Category::Code if signals.ml_integration => 0.20,
            Category::Model | Category::Code => 0.0,
        };

        let license = signals.license.trim();
        if !matches!(license, "" | "unknown" | "none") {
            score += if mentions_any(license, COMMON_LICENSES) { 0.15 } else { 0.08 };
        }

        score += f64::min(signals.downloads as f64 / 1000.0, 0.10);
        score += f64::min(signals.likes as f64 / 100.0, 0.05);

        MetricValue::Score(clamp_unit(score))
    }
}
