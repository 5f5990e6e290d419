use crate::metrics::{MetricCategory, MetricValue};
use core::time::Duration;
use std::sync::Arc;

/// How a single metric evaluation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricStatus {
    /// The metric produced a value
    Scored(MetricValue),

    /// The metric returned an error or panicked
    Failed(Arc<str>),

    /// The metric did not finish within the configured timeout
    TimedOut,
}

/// The result of running one registered metric against one artifact.
#[derive(Debug, Clone)]
pub struct MetricOutcome {
    pub name: &'static str,
    pub category: MetricCategory,
    pub weight: f64,
    pub status: MetricStatus,

    /// What the metric reports when it has no usable value
    pub sentinel: MetricValue,

    /// Time spent evaluating, summed over every attempt
    pub latency: Duration,
}

impl MetricOutcome {
    /// The value written to reports: the rounded score when there is one, the sentinel otherwise.
    #[must_use]
    pub fn reported_value(&self) -> MetricValue {
        match &self.status {
            MetricStatus::Scored(value) => value.rounded(),
            MetricStatus::Failed(_) | MetricStatus::TimedOut => self.sentinel,
        }
    }

    /// The scalar this outcome feeds into the net score, if any.
    #[must_use]
    pub fn contribution(&self) -> Option<f64> {
        match &self.status {
            MetricStatus::Scored(value) => value.contribution(),
            MetricStatus::Failed(_) | MetricStatus::TimedOut => None,
        }
    }

    #[must_use]
    pub fn latency_ms(&self) -> u64 {
        millis(self.latency)
    }
}

/// Whole milliseconds, saturating.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
