use super::metric_value::round2;
use super::{Device, DeviceScores, Metric, MetricCategory, MetricValue};
use crate::Result;
use crate::facts::ArtifactFacts;

/// Rates how comfortably an artifact's weights fit on each device class.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeScore;

impl Metric for SizeScore {
    /// Size in MB, or `None` when the hub document is missing.
    type Data = Option<f64>;

    fn name(&self) -> &'static str {
        "size_score"
    }

    fn description(&self) -> &'static str {
        "Fit of the artifact's size on reference devices"
    }

    fn category(&self) -> MetricCategory {
        MetricCategory::Footprint
    }

    fn sentinel(&self) -> MetricValue {
        MetricValue::Devices(DeviceScores::uniform(-1.0))
    }

    fn extract(&self, facts: &ArtifactFacts) -> Result<Option<f64>> {
        Ok(facts.metadata.is_found().then_some(facts.attributes.size_mb))
    }

    fn score(&self, data: &Option<f64>) -> MetricValue {
        match data {
            None => self.sentinel(),
            Some(size) if !size.is_finite() => self.sentinel(),
            Some(size) => MetricValue::Devices(DeviceScores::from_fn(|device| device_score(*size, device))),
        }
    }
}

/// Linear from 1.0 down to 0.5 as the size approaches the device threshold, then down to 0.0 at three times the threshold.
fn device_score(size_mb: f64, device: Device) -> f64 {
    if size_mb <= 0.0 {
        return 0.0;
    }

    let threshold = device.threshold_mb();
    let score = if size_mb <= threshold {
        0.5f64.mul_add(1.0 - size_mb / threshold, 0.5)
    } else {
        (1.0 - (size_mb - threshold) / (2.0 * threshold)).max(0.0)
    };

    round2(score.clamp(0.0, 1.0))
}
