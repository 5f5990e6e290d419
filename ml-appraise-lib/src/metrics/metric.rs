use super::{MetricCategory, MetricValue};
use crate::Result;
use crate::facts::ArtifactFacts;
use core::fmt::{Debug, Formatter};

/// A single heuristic judging one aspect of an artifact.
///
/// Evaluation has two steps. [`Metric::extract`] gathers the signals the metric cares about from
/// the collected facts, treating anything absent as a zero or false signal. [`Metric::score`] then
/// turns those signals into a value, and must be a pure function of them.
pub trait Metric: Send + Sync + 'static {
    /// Signals extracted from the facts.
    type Data;

    /// Stable name, used as the output key.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn category(&self) -> MetricCategory;

    /// The value reported when the metric cannot produce a meaningful result.
    fn sentinel(&self) -> MetricValue;

    fn extract(&self, facts: &ArtifactFacts) -> Result<Self::Data>;

    fn score(&self, data: &Self::Data) -> MetricValue;
}

/// Object-safe view of a [`Metric`], as stored in a registry.
pub trait MetricEvaluator: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn category(&self) -> MetricCategory;

    fn sentinel(&self) -> MetricValue;

    /// Extract and score in one step.
    fn evaluate(&self, facts: &ArtifactFacts) -> Result<MetricValue>;
}

impl<M: Metric> MetricEvaluator for M {
    fn name(&self) -> &'static str {
        Metric::name(self)
    }

    fn description(&self) -> &'static str {
        Metric::description(self)
    }

    fn category(&self) -> MetricCategory {
        Metric::category(self)
    }

    fn sentinel(&self) -> MetricValue {
        Metric::sentinel(self)
    }

    fn evaluate(&self, facts: &ArtifactFacts) -> Result<MetricValue> {
        let data = self.extract(facts)?;
        Ok(self.score(&data))
    }
}

impl Debug for dyn MetricEvaluator {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetricEvaluator").field("name", &self.name()).finish_non_exhaustive()
    }
}
