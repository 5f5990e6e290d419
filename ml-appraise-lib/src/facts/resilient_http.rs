//! HTTP requests that retry transient failures.
//!
//! Requests run through [`seatbelt`] retry and timeout middleware. Network errors, timeouts,
//! server errors and short rate-limit waits are retried with exponential backoff. Everything
//! else is handed back to the caller on the first attempt.

use core::time::Duration;
use layered::{Execute, Service, Stack};
use ohno::app_err;
use reqwest::header::{ACCEPT, HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use seatbelt::retry::{Backoff, Retry};
use seatbelt::timeout::Timeout;
use seatbelt::{RecoveryInfo, ResilienceContext};
use tick::Clock;

const LOG_TARGET: &str = "       http";

/// Upper bound for one attempt, connection and headers included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Retries on top of the first attempt.
const MAX_RETRY_ATTEMPTS: u32 = 3;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Delay used for `429` responses without a usable `Retry-After` header.
const DEFAULT_RATE_LIMIT_DELAY: Duration = Duration::from_secs(5);

/// Longest `Retry-After` honored here. Longer waits are left to the caller.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Send an HTTP GET request, retrying transient failures.
///
/// # Errors
///
/// Returns the last error once all attempts are exhausted.
pub async fn resilient_get(client: &reqwest::Client, url: &str) -> crate::Result<Response> {
    send(client, url, None).await
}

/// Same as [`resilient_get`], asking for the `accept` media type.
///
/// # Errors
///
/// Returns the last error once all attempts are exhausted.
pub async fn resilient_get_accepting(client: &reqwest::Client, url: &str, accept: &'static str) -> crate::Result<Response> {
    send(client, url, Some(accept)).await
}

async fn send(client: &reqwest::Client, url: &str, accept: Option<&'static str>) -> crate::Result<Response> {
    let clock = Clock::new_tokio();
    let context = ResilienceContext::new(&clock).name("http_get");

    let client = client.clone();
    let service = (
        Retry::layer("retry", &context)
            .clone_input()
            .recovery_with(|result: &crate::Result<Response>, _| should_retry_response(result))
            .max_retry_attempts(MAX_RETRY_ATTEMPTS)
            .base_delay(RETRY_BASE_DELAY)
            .backoff(Backoff::Exponential)
            .on_retry(|_output, args| {
                log::debug!(
                    target: LOG_TARGET,
                    "Retrying HTTP GET (attempt {}, delay {}ms)",
                    args.attempt().index() + 1,
                    args.retry_delay().as_millis(),
                );
            }),
        Timeout::layer("timeout", &context)
            .timeout_error(|_| app_err!("HTTP request timed out after {}s", REQUEST_TIMEOUT.as_secs()))
            .timeout(REQUEST_TIMEOUT),
        Execute::new(move |url: String| {
            let client = client.clone();
            async move {
                let mut request = client.get(&url);
                if let Some(accept) = accept {
                    request = request.header(ACCEPT, accept);
                }
                request.send().await.map_err(ohno::AppError::from)
            }
        }),
    )
        .into_service();

    service.execute(url.to_string()).await
}

/// Classify an HTTP outcome for retry purposes.
fn should_retry_response(result: &crate::Result<Response>) -> RecoveryInfo {
    match result {
        Err(_) => RecoveryInfo::retry(),
        Ok(resp) if resp.status().is_server_error() => RecoveryInfo::retry(),
        Ok(resp) if resp.status() == StatusCode::TOO_MANY_REQUESTS => {
            rate_limit_recovery(parse_retry_after(resp.headers()).unwrap_or(DEFAULT_RATE_LIMIT_DELAY))
        }

        // Secondary rate limit: only a 403 that names a wait is worth another attempt
        Ok(resp) if resp.status() == StatusCode::FORBIDDEN => {
            parse_retry_after(resp.headers()).map_or_else(RecoveryInfo::never, rate_limit_recovery)
        }

        _ => RecoveryInfo::never(),
    }
}

fn rate_limit_recovery(delay: Duration) -> RecoveryInfo {
    if delay <= MAX_RETRY_AFTER {
        RecoveryInfo::retry().delay(delay)
    } else {
        RecoveryInfo::never()
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds))
}
