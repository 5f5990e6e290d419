use super::outcome::millis;
use super::{MetricOutcome, MetricStatus, Registry, ScoreRow, net_score};
use crate::facts::ArtifactFacts;
use crate::metrics::{MetricEvaluator, MetricValue};
use core::any::Any;
use core::time::Duration;
use futures_util::future::join_all;
use layered::{Execute, Service, Stack};
use seatbelt::retry::{Backoff, Retry};
use seatbelt::timeout::Timeout;
use seatbelt::{RecoveryInfo, ResilienceContext};
use std::sync::Arc;
use std::time::Instant;
use tick::Clock;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

const LOG_TARGET: &str = "   scoring";

const RETRY_BASE_DELAY: Duration = Duration::from_millis(10);

/// Runs every registered metric against an artifact and aggregates the results.
///
/// Metrics run as blocking tasks, at most `concurrency` at a time across every artifact being
/// scored. Each attempt is bounded by a timeout. A metric that errors, panics or times out is
/// retried up to `retries` times and then reported with its sentinel. It never affects the
/// other metrics, and a timed-out evaluation gives up its slot when the timeout fires.
#[derive(Debug, Clone)]
pub struct Scorer {
    registry: Arc<Registry>,
    permits: Arc<Semaphore>,
    timeout: Duration,
    retries: u32,
}

impl Scorer {
    #[must_use]
    pub fn new(registry: Registry, concurrency: usize, timeout: Duration, retries: u32) -> Self {
        Self {
            registry: Arc::new(registry),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            timeout,
            retries,
        }
    }

    /// Score one artifact. Never fails: every registered metric appears in the row.
    pub async fn score(&self, facts: Arc<ArtifactFacts>) -> ScoreRow {
        let start = Instant::now();

        let outcomes = join_all(self.registry.iter().map(|metric| {
            let evaluator = Arc::clone(&metric.evaluator);
            let facts = Arc::clone(&facts);
            async move {
                let (status, latency) = self.run_metric(&evaluator, &facts).await;
                MetricOutcome {
                    name: evaluator.name(),
                    category: evaluator.category(),
                    weight: metric.weight,
                    status,
                    sentinel: evaluator.sentinel(),
                    latency,
                }
            }
        }))
        .await;

        let net_score = net_score(&outcomes);
        let elapsed = start.elapsed();

        log::debug!(
            target: LOG_TARGET,
            "Scored '{}': net score {net_score:.2} in {}ms",
            facts.entry.name(),
            millis(elapsed)
        );

        ScoreRow::new(facts.entry.name(), facts.category(), net_score, elapsed, outcomes)
    }

    /// Run one metric under the retry and timeout policy.
    ///
    /// The pool slot is taken before the first attempt, so time spent queueing is never charged
    /// against the timeout. It is held by this future rather than by the blocking task: once the
    /// last attempt ends or times out the slot is free again, even if an abandoned evaluation is
    /// still running on its blocking thread.
    async fn run_metric(&self, evaluator: &Arc<dyn MetricEvaluator>, facts: &Arc<ArtifactFacts>) -> (MetricStatus, Duration) {
        let name = evaluator.name();
        let entry = facts.entry.name().to_string();
        let clock = Clock::new_tokio();
        let context = ResilienceContext::new(&clock).name("metric");

        let evaluator = Arc::clone(evaluator);
        let service = (
            Retry::layer("retry", &context)
                .clone_input()
                .recovery_with(|result: &Result<MetricValue, Failure>, _| match result {
                    Ok(_) => RecoveryInfo::never(),
                    Err(_) => RecoveryInfo::retry(),
                })
                .max_retry_attempts(self.retries)
                .base_delay(RETRY_BASE_DELAY)
                .backoff(Backoff::Exponential)
                .on_retry(move |_output, args| {
                    log::debug!(
                        target: LOG_TARGET,
                        "Retrying metric '{name}' for '{entry}' (attempt {})",
                        args.attempt().index() + 1
                    );
                }),
            Timeout::layer("timeout", &context)
                .timeout_error(|_| Failure::TimedOut)
                .timeout(self.timeout),
            Execute::new(move |facts: Arc<ArtifactFacts>| {
                let evaluator = Arc::clone(&evaluator);
                async move {
                    match tokio::task::spawn_blocking(move || evaluator.evaluate(&facts)).await {
                        Ok(Ok(value)) => Ok(value),
                        Ok(Err(e)) => Err(Failure::Error(format!("{e:#}").into())),
                        Err(join_error) => Err(Failure::Error(join_failure(join_error).into())),
                    }
                }
            }),
        )
            .into_service();

        let Ok(_permit) = Arc::clone(&self.permits).acquire_owned().await else {
            return (MetricStatus::Failed("metric pool is closed".into()), Duration::ZERO);
        };

        let start = Instant::now();
        let result = service.execute(Arc::clone(facts)).await;
        let latency = start.elapsed();

        let status = match result {
            Ok(value) => MetricStatus::Scored(value),
            Err(Failure::Error(reason)) => {
                log::warn!(target: LOG_TARGET, "Metric '{name}' failed for '{}': {reason}", facts.entry.name());
                MetricStatus::Failed(reason)
            }
            Err(Failure::TimedOut) => {
                log::warn!(
                    target: LOG_TARGET,
                    "Metric '{name}' timed out after {:?} for '{}'",
                    self.timeout,
                    facts.entry.name()
                );
                MetricStatus::TimedOut
            }
        };

        (status, latency)
    }
}

/// Why an attempt produced no value.
#[derive(Debug, Clone)]
enum Failure {
    Error(Arc<str>),
    TimedOut,
}

fn join_failure(error: JoinError) -> String {
    if !error.is_panic() {
        return "metric task was cancelled".to_string();
    }

    let payload = error.into_panic();
    format!("metric panicked: {}", panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown cause")
}
