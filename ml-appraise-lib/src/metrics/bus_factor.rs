use super::{Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::ArtifactFacts;

/// Distinct authors at which the score saturates.
const SATURATION_AUTHORS: usize = 50;

/// Rates how many people keep an artifact's code alive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BusFactor;

impl Metric for BusFactor {
    /// Distinct commit authors, or `None` when the history could not be read.
    type Data = Option<usize>;

    fn name(&self) -> &'static str {
        "bus_factor"
    }

    fn description(&self) -> &'static str {
        "Number of distinct contributors in recent commit history"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Community
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Score(-1.0)
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<usize>> {
        Ok(facts.commit_authors.as_ref().map(Vec::len))
    }

    #[expect(clippy::cast_precision_loss, reason = "author counts are far below 2^52")]
    fn score(&self, data: &Option<usize>) -> MetricValue {
        match data {
            Some(authors) => MetricValue::Score((*authors as f64 / SATURATION_AUTHORS as f64).min(1.0)),
            None => self.sentinel(),
        }
    }
}
