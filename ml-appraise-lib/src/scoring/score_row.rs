use super::MetricOutcome;
use super::outcome::millis;
use crate::intake::Category;
use core::time::Duration;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// The flattened scoring result for one artifact.
///
/// Serializes to a single JSON object with a fixed key order: `name`, `category`, `net_score`,
/// `net_score_latency`, then every registered metric followed by its `_latency` key. Metrics that
/// did not produce a value appear with their sentinel, so every row has every key.
#[derive(Debug, Clone)]
pub struct ScoreRow {
    name: String,
    category: Category,
    net_score: f64,
    latency: Duration,
    outcomes: Vec<MetricOutcome>,
}

impl ScoreRow {
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category, net_score: f64, latency: Duration, outcomes: Vec<MetricOutcome>) -> Self {
        Self {
            name: name.into(),
            category,
            net_score,
            latency,
            outcomes,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub const fn net_score(&self) -> f64 {
        self.net_score
    }

    /// Wall-clock time spent scoring, in whole milliseconds.
    #[must_use]
    pub fn net_score_latency_ms(&self) -> u64 {
        millis(self.latency)
    }

    /// One outcome per registered metric, in registration order.
    #[must_use]
    pub fn outcomes(&self) -> &[MetricOutcome] {
        &self.outcomes
    }
}

impl Serialize for ScoreRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + 2 * self.outcomes.len()))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("category", &self.category)?;
        map.serialize_entry("net_score", &self.net_score)?;
        map.serialize_entry("net_score_latency", &self.net_score_latency_ms())?;

        for outcome in &self.outcomes {
            map.serialize_entry(outcome.name, &outcome.reported_value())?;
            map.serialize_entry(&format!("{}_latency", outcome.name), &outcome.latency_ms())?;
        }

        map.end()
    }
}
