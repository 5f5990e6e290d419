use super::Weights;
use crate::Result;
use crate::metrics::{MetricEvaluator, builtin_metrics};
use ohno::{app_err, bail};
use std::sync::Arc;

/// A metric together with its weight in the net score.
#[derive(Debug, Clone)]
pub struct RegisteredMetric {
    pub evaluator: Arc<dyn MetricEvaluator>,
    pub weight: f64,
}

/// The metrics a [`Scorer`](super::Scorer) runs, in report order. Built once at startup.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    metrics: Vec<RegisteredMetric>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in metric with its configured weight.
    ///
    /// # Errors
    ///
    /// Returns an error if the weights are invalid or do not cover every built-in metric.
    pub fn builtin(weights: &Weights) -> Result<Self> {
        weights.validate()?;

        let mut registry = Self::new();
        for evaluator in builtin_metrics() {
            let weight = weights
                .get(evaluator.name())
                .ok_or_else(|| app_err!("no weight is configured for metric '{}'", evaluator.name()))?;
            registry.register(evaluator, weight)?;
        }

        Ok(registry)
    }

    /// Add a metric. Metrics are run and reported in registration order.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered or the weight is not positive.
    pub fn register(&mut self, evaluator: Arc<dyn MetricEvaluator>, weight: f64) -> Result<()> {
        if !(weight.is_finite() && weight > 0.0) {
            bail!("weight for metric '{}' must be a positive number, got {weight}", evaluator.name());
        }

        if self.metrics.iter().any(|m| m.evaluator.name() == evaluator.name()) {
            bail!("metric '{}' is registered twice", evaluator.name());
        }

        self.metrics.push(RegisteredMetric { evaluator, weight });
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredMetric> {
        self.metrics.iter()
    }

    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.metrics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BusFactor, License};

    #[test]
    fn test_builtin_registry() {
        let registry = Registry::builtin(&Weights::default()).unwrap();
        assert_eq!(registry.len(), 9);

        let total: f64 = registry.iter().map(|m| m.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(registry.iter().next().unwrap().evaluator.name(), "ramp_up_time");
    }

    #[test]
    fn test_builtin_rejects_invalid_weights() {
        let weights = Weights {
            license: 0.9,
            ..Weights::default()
        };
        assert!(Registry::builtin(&weights).is_err());
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut registry = Registry::new();
        registry.register(Arc::new(License), 0.5).unwrap();
        registry.register(Arc::new(BusFactor), 0.5).unwrap();
        let err = registry.register(Arc::new(License), 0.1).unwrap_err();
        assert!(err.to_string().contains("registered twice"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_rejects_bad_weight() {
        let mut registry = Registry::new();
        assert!(registry.register(Arc::new(License), 0.0).is_err());
        assert!(registry.register(Arc::new(License), f64::INFINITY).is_err());
        assert!(registry.iter().next().is_none());
    }
}
