//! Failure-isolated metric execution and weighted aggregation
//!
//! A [`Registry`] holds the metrics to run, each with its weight, in report order. A [`Scorer`]
//! runs every registered metric against one artifact's facts and folds the results into a
//! [`ScoreRow`].
//!
//! # Implementation Model
//!
//! Each metric evaluation ends in a [`MetricStatus`]: a value, a failure with a reason, or a
//! timeout. Failures are contained at the task boundary, so one faulty metric can never prevent
//! the others from running or the row from being produced. The net score is computed by
//! [`net_score`] over the usable values only, dividing by the weight that actually contributed.

mod aggregate;
mod outcome;
mod registry;
mod score_row;
mod scorer;
mod weights;

pub use aggregate::net_score;
pub use outcome::{MetricOutcome, MetricStatus};
pub use registry::{RegisteredMetric, Registry};
pub use score_row::ScoreRow;
pub use scorer::Scorer;
pub use weights::Weights;
