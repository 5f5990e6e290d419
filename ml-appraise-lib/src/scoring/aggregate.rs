use super::MetricOutcome;
use crate::metrics::round2;

/// Combine metric outcomes into a net score in `[0, 1]`.
///
/// Only outcomes with a usable value take part, and the result is divided by the total weight of
/// those outcomes rather than by the total configured weight. When nothing is usable the net score
/// is 0.
#[must_use]
pub fn net_score(outcomes: &[MetricOutcome]) -> f64 {
    let (weighted, total) = outcomes
        .iter()
        .filter_map(|outcome| outcome.contribution().map(|value| (value * outcome.weight, outcome.weight)))
        .fold((0.0, 0.0), |(weighted, total), (value, weight)| (weighted + value, total + weight));

    if total <= 0.0 {
        return 0.0;
    }

    round2((weighted / total).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{DeviceScores, MetricCategory, MetricValue};
    use crate::scoring::MetricStatus;
    use core::time::Duration;

    fn outcome(weight: f64, status: MetricStatus) -> MetricOutcome {
        MetricOutcome {
            name: "m",
            category: MetricCategory::Usability,
            weight,
            status,
            sentinel: MetricValue::Score(-1.0),
            latency: Duration::ZERO,
        }
    }

    fn scored(weight: f64, value: f64) -> MetricOutcome {
        outcome(weight, MetricStatus::Scored(MetricValue::Score(value)))
    }

    #[test]
    fn test_all_usable() {
        let outcomes = [scored(0.5, 1.0), scored(0.5, 0.5)];
        assert!((net_score(&outcomes) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_failed_weight_is_renormalized_away() {
        let outcomes = [
            scored(0.3, 0.8),
            scored(0.2, 0.3),
            outcome(0.5, MetricStatus::Failed("boom".into())),
        ];

        // (0.24 + 0.06) / 0.5, not / 1.0
        assert!((net_score(&outcomes) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_sentinel_values_do_not_count() {
        let outcomes = [scored(0.5, -1.0), scored(0.5, 0.4)];
        assert!((net_score(&outcomes) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_zero_scores_do_count() {
        let outcomes = [scored(0.5, 0.0), scored(0.5, 0.4)];
        assert!((net_score(&outcomes) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_device_scores_contribute_their_mean() {
        let devices = DeviceScores {
            raspberry_pi: 0.0,
            jetson_nano: 0.5,
            desktop_pc: 1.0,
            aws_server: 1.0,
        };
        let outcomes = [outcome(1.0, MetricStatus::Scored(MetricValue::Devices(devices)))];
        assert!((net_score(&outcomes) - 0.63).abs() < 1e-12);
    }

    #[test]
    fn test_nothing_usable_is_zero() {
        let outcomes = [
            outcome(0.5, MetricStatus::TimedOut),
            outcome(0.5, MetricStatus::Failed("boom".into())),
        ];
        assert!(net_score(&outcomes).abs() < f64::EPSILON);
        assert!(net_score(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_result_is_rounded() {
        let outcomes = [scored(1.0, 0.123_456)];
        assert!((net_score(&outcomes) - 0.12).abs() < 1e-12);
    }
}
