use super::signals::{any_tag_mentions, mentions_any};
use super::{Metric, MetricCategory, MetricValue, round2};
use crate::Result;
use crate::facts::ArtifactFacts;
use crate::intake::Category;
use serde_json::Value;

/// Evidence a model offers for its claimed performance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceSignals {
    /// Number of evaluation results declared in the model index
    pub reported_results: usize,
    pub card_lists_metrics: bool,
    pub benchmark_tags: bool,
    pub benchmark_description: bool,
    pub state_of_the_art_claim: bool,
    pub downloads: u64,
    pub likes: u64,
}

/// Rates how well a model backs up its performance claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceClaims;

impl Metric for PerformanceClaims {
    /// `None` for anything that is not a model.
    type Data = Option<EvidenceSignals>;

    fn name(&self) -> &'static str {
        "performance_claims"
    }

    fn description(&self) -> &'static str {
        "Benchmark results and evaluation evidence"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Evidence
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(0.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<EvidenceSignals>> {
        if facts.category() != Category::Model {
            return Ok(None);
        }

        let attrs = &facts.attributes;
        Ok(Some(EvidenceSignals {
            reported_results: attrs
                .model_index
                .iter()
                .filter_map(|entry| entry.get("results").and_then(Value::as_array))
                .map(Vec::len)
                .sum(),
            card_lists_metrics: attrs.card_data.get("metrics").is_some_and(|m| !m.is_null()),
            benchmark_tags: any_tag_mentions(&attrs.tags, &["benchmark", "arxiv"]),
            benchmark_description: mentions_any(&attrs.description, &["benchmark"]),
            state_of_the_art_claim: mentions_any(&attrs.description, &["state-of-the-art", "sota"]),
            downloads: attrs.downloads,
            likes: attrs.likes,
        }))
    }

    fn score(&self, data: &Option<EvidenceSignals>) -> MetricValue {
        let Some(signals) = data else {
            return self.sentinel();
        };

        let mut score = match signals.reported_results {
            0 if signals.card_lists_metrics => 0.3,
            0 => 0.0,
            1 => 0.4,
            _ => 0.5,
        };

        if signals.benchmark_tags {
            score += 0.2;
        }

        // Prose claims only count when no structured results back them
        if signals.reported_results == 0 {
            if signals.benchmark_description {
                score += 0.2;
            }
            if signals.state_of_the_art_claim {
                score += 0.2;
            }
        }

        if signals.downloads > 1000 || signals.likes > 10 {
            score += 0.1;
        } else if signals.downloads > 100 || signals.likes > 5 {
            score += 0.05;
        }

        MetricValue::Score(round2(score).min(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::Entry;
    use serde_json::json;

    fn evaluate_model(doc: Value) -> f64 {
        let facts = ArtifactFacts::from_document(Entry::new(Category::Model, "https://huggingface.co/o/m"), doc);
        let data = PerformanceClaims.extract(&facts).unwrap();
        PerformanceClaims.score(&data).as_score().unwrap()
    }

    #[test]
    fn test_no_evidence() {
        assert!(evaluate_model(json!({})).abs() < 1e-9);
    }

    #[test]
    fn test_model_index_results() {
        let doc = json!({
            "model-index": [
                {"name": "m", "results": [{"metrics": []}, {"metrics": []}]}
            ],
            "description": "State-of-the-art on every benchmark"
        });

        // structured results suppress the prose bonuses
        assert!((evaluate_model(doc) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_result_with_popularity() {
        let doc = json!({
            "model-index": [{"results": [{}]}],
            "downloads": 5000
        });
        assert!((evaluate_model(doc) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_prose_claims_and_tags() {
        let doc = json!({
            "cardData": {"metrics": ["wer"]},
            "tags": ["arxiv:2212.04356"],
            "description": "SOTA results on a public benchmark",
            "likes": 6
        });

        // 0.3 + 0.2 + 0.2 + 0.2 + 0.05, capped
        assert!((evaluate_model(doc) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_capped() {
        let signals = EvidenceSignals {
            card_lists_metrics: true,
            benchmark_tags: true,
            benchmark_description: true,
            state_of_the_art_claim: true,
            downloads: 10_000,
            ..EvidenceSignals::default()
        };
        assert_eq!(PerformanceClaims.score(&Some(signals)), MetricValue::Score(1.0));
    }

    #[test]
    fn test_non_models_are_sentinel() {
        let facts = ArtifactFacts::from_document(
            Entry::new(Category::Dataset, "https://huggingface.co/datasets/o/d"),
            json!({"model-index": [{"results": [{}]}]}),
        );
        assert_eq!(PerformanceClaims.extract(&facts).unwrap(), None);
        assert_eq!(PerformanceClaims.score(&None), MetricValue::Score(0.0));
    }
}
