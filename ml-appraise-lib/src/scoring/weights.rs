use crate::Result;
use ohno::bail;
use serde::{Deserialize, Serialize};

const SUM_TOLERANCE: f64 = 1e-6;

/// How much each built-in metric counts towards the net score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Weights {
    pub ramp_up_time: f64,
    pub bus_factor: f64,
    pub performance_claims: f64,
    pub license: f64,
    pub size_score: f64,
    pub dataset_and_code_score: f64,
    pub dataset_quality: f64,
    pub code_quality: f64,
    pub security: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            ramp_up_time: 0.15,
            bus_factor: 0.10,
            performance_claims: 0.10,
            license: 0.15,
            size_score: 0.10,
            dataset_and_code_score: 0.10,
            dataset_quality: 0.10,
            code_quality: 0.10,
            security: 0.10,
        }
    }
}

impl Weights {
    /// Every weight, keyed by metric name, in report order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("ramp_up_time", self.ramp_up_time),
            ("bus_factor", self.bus_factor),
            ("performance_claims", self.performance_claims),
            ("license", self.license),
            ("size_score", self.size_score),
            ("dataset_and_code_score", self.dataset_and_code_score),
            ("dataset_quality", self.dataset_quality),
            ("code_quality", self.code_quality),
            ("security", self.security),
        ]
    }

    /// The weight of the named metric.
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.entries().into_iter().find(|(name, _)| *name == metric).map(|(_, weight)| weight)
    }

    /// Check that every weight is in `(0, 1]` and that the weights add up to 1.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending weight, or the actual sum.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.entries() {
            if !(weight > 0.0 && weight <= 1.0) {
                bail!("weight for '{name}' must be greater than 0 and at most 1, got {weight}");
            }
        }

        let sum: f64 = self.entries().iter().map(|(_, weight)| weight).sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            bail!("metric weights must add up to 1.0, got {sum}");
        }

        Ok(())
    }
}
