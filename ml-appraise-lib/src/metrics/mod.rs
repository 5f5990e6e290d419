//! Heuristic metrics over collected artifact facts
//!
//! Each metric judges one aspect of an artifact and produces a [`MetricValue`]: a score in
//! `[0, 1]`, or a per-device breakdown for [`SizeScore`]. Metrics never fail loudly for missing
//! data. Absent signals count as zero, and when a metric has nothing meaningful to say it
//! reports its sentinel, which the aggregation step ignores.
//!
//! # Implementation Model
//!
//! Metrics implement the typed [`Metric`] trait, which splits evaluation into signal extraction
//! and a pure scoring function over those signals. The object-safe [`MetricEvaluator`] view is
//! what the scoring engine stores and runs. [`builtin_metrics`] lists every metric in output
//! order.

mod bus_factor;
mod code_quality;
mod dataset_and_code;
mod dataset_quality;
mod license;
mod metric;
mod metric_category;
mod metric_value;
mod performance_claims;
mod ramp_up_time;
mod security;
mod signals;
mod size;

use std::sync::Arc;

pub use bus_factor::BusFactor;
pub use code_quality::{CodeQuality, RepoInventory};
pub use dataset_and_code::{Availability, DatasetAndCode};
pub use dataset_quality::{DatasetCard, DatasetQuality};
pub use license::{License, recognized_licenses};
pub use metric::{Metric, MetricEvaluator};
pub use metric_category::MetricCategory;
pub use metric_value::{Device, DeviceScores, MetricValue, round2};
pub use performance_claims::{EvidenceSignals, PerformanceClaims};
pub use ramp_up_time::{Complexity, RampUpSignals, RampUpTime};
pub use security::{Security, SecuritySignals};
pub use size::SizeScore;

/// Every built-in metric, in the order its columns appear in reports.
#[must_use]
pub fn builtin_metrics() -> Vec<Arc<dyn MetricEvaluator>> {
    vec![
        Arc::new(RampUpTime),
        Arc::new(BusFactor),
        Arc::new(PerformanceClaims),
        Arc::new(License),
        Arc::new(SizeScore),
        Arc::new(DatasetAndCode),
        Arc::new(DatasetQuality),
        Arc::new(CodeQuality),
        Arc::new(Security),
    ]
}
