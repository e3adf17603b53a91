//! Bounded completion polling for submitted jobs.
//!
//! [`wait_for_job`] suspends the calling task only, re-fetching the job
//! on an exponential-backoff schedule until it reaches the target state,
//! a terminal failure state, or the configured deadline. Abandoning a
//! wait (deadline or [`CancellationToken`]) never affects the remote
//! job's execution.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use mediaq_core::job::{Job, JobState};

use crate::service::{MediaService, ServiceError};

/// Tunable parameters for the polling schedule.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the second fetch (the first happens immediately).
    pub initial_interval: Duration,
    /// Upper bound on the delay between fetches.
    pub max_interval: Duration,
    /// Factor by which the delay grows after each fetch.
    pub multiplier: f64,
    /// Hard deadline for the whole wait.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
            timeout: Duration::from_secs(600),
        }
    }
}

/// Calculate the next poll interval from the current one.
///
/// The result is clamped to [`PollConfig::max_interval`].
pub fn next_interval(current: Duration, config: &PollConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_interval)
}

/// Errors from waiting on a job.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The deadline elapsed before the job reached the target state.
    #[error("Timed out after {waited:?} waiting for job {job_id} to reach {target}")]
    Timeout {
        job_id: String,
        target: JobState,
        waited: Duration,
    },

    /// The job reached a terminal failure state while a different target
    /// was awaited.
    #[error("Job {job_id} ended in terminal state {state}")]
    JobFailed { job_id: String, state: JobState },

    /// The job disappeared between submission and polling.
    #[error("Job {0} not found on the service")]
    NotFound(String),

    /// The job reached the target state but the caller's verifier
    /// rejected the final snapshot.
    #[error("Verifier rejected the final snapshot of job {0}")]
    VerificationFailed(String),

    /// The wait was abandoned via its cancellation token. The remote job
    /// keeps running.
    #[error("Wait for job {0} was cancelled")]
    Cancelled(String),

    /// A service call failed while polling.
    #[error(transparent)]
    Service(ServiceError),
}

/// Wait until `job_id` reaches `target_state`, then run `verifier` on the
/// final snapshot.
///
/// See [`wait_for_job_cancellable`]; this variant cannot be abandoned
/// early except by the deadline.
pub async fn wait_for_job<V>(
    service: &dyn MediaService,
    job_id: &str,
    target_state: JobState,
    config: &PollConfig,
    verifier: V,
) -> Result<Job, PollError>
where
    V: Fn(&Job) -> bool,
{
    wait_for_job_cancellable(
        service,
        job_id,
        target_state,
        config,
        &CancellationToken::new(),
        verifier,
    )
    .await
}

/// Wait until `job_id` reaches `target_state`, with early abandonment.
///
/// Fetches immediately, then sleeps on an exponential-backoff schedule
/// bounded by [`PollConfig::max_interval`] — never a busy loop. The
/// verifier runs exactly once, on the final snapshot. Cancelling the
/// token abandons only this wait; other callers' polling and the remote
/// job are unaffected.
pub async fn wait_for_job_cancellable<V>(
    service: &dyn MediaService,
    job_id: &str,
    target_state: JobState,
    config: &PollConfig,
    cancel: &CancellationToken,
    verifier: V,
) -> Result<Job, PollError>
where
    V: Fn(&Job) -> bool,
{
    let start = tokio::time::Instant::now();
    let mut interval = config.initial_interval;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let job = match service.get_job(job_id).await {
            Ok(job) => job,
            Err(ServiceError::NotFound { id, .. }) => return Err(PollError::NotFound(id)),
            Err(e) => return Err(PollError::Service(e)),
        };

        tracing::debug!(
            job_id = %job.id,
            state = %job.state,
            attempt,
            "Polled job state",
        );

        if job.state == target_state {
            if verifier(&job) {
                tracing::info!(job_id = %job.id, state = %job.state, "Job reached target state");
                return Ok(job);
            }
            return Err(PollError::VerificationFailed(job.id));
        }

        if job.state.is_failure() {
            tracing::warn!(
                job_id = %job.id,
                state = %job.state,
                "Job ended in terminal failure while waiting",
            );
            return Err(PollError::JobFailed {
                job_id: job.id,
                state: job.state,
            });
        }

        let waited = start.elapsed();
        if waited >= config.timeout {
            return Err(PollError::Timeout {
                job_id: job_id.to_string(),
                target: target_state,
                waited,
            });
        }

        // Never sleep past the deadline.
        let sleep_for = interval.min(config.timeout.saturating_sub(waited));
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(job_id, "Wait abandoned by caller");
                return Err(PollError::Cancelled(job_id.to_string()));
            }
            _ = tokio::time::sleep(sleep_for) => {}
        }

        interval = next_interval(interval, config);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
