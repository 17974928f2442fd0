//! Bounded polling of job status with backoff.

use crate::defaults;
use crate::error::{Result, TurnscribeError};
use crate::job::service::{JobService, JobStatus};
use std::time::Duration;

/// Retry budget for waiting on a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Status checks allowed before giving up.
    pub max_attempts: u32,
    /// Delay after the first unfinished check.
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each unfinished check.
    pub backoff_factor: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_POLL_ATTEMPTS,
            initial_delay: defaults::POLL_DELAY,
            backoff_factor: defaults::POLL_BACKOFF_FACTOR,
        }
    }
}

impl PollPolicy {
    /// Fixed-interval policy (no backoff).
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay: delay,
            backoff_factor: 1,
        }
    }
}

/// Poll a job until it reaches a terminal state or the budget runs out.
///
/// Returns the transcript URI on completion. A failed job and an exhausted
/// budget surface as distinct errors; transient status-check failures are
/// retried within the same budget and the last one is reported if the budget
/// runs out on an error.
pub async fn wait_for_completion(
    service: &dyn JobService,
    job_name: &str,
    policy: &PollPolicy,
) -> Result<String> {
    let mut delay = policy.initial_delay;
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        match service.job_status(job_name).await {
            Ok(JobStatus::Completed { transcript_uri }) => return Ok(transcript_uri),
            Ok(JobStatus::Failed { reason }) => {
                return Err(TurnscribeError::JobFailed {
                    job: job_name.to_string(),
                    reason,
                });
            }
            Ok(JobStatus::Queued | JobStatus::InProgress) => {
                last_error = None;
            }
            Err(e) => {
                last_error = Some(e);
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(delay).await;
            delay *= policy.backoff_factor;
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Err(TurnscribeError::PollTimeout {
            job: job_name.to_string(),
            attempts: policy.max_attempts,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::service::MockJobService;

    fn instant_policy(max_attempts: u32) -> PollPolicy {
        PollPolicy::fixed(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn returns_uri_on_completion() {
        let service = MockJobService::new().with_statuses([
            JobStatus::Queued,
            JobStatus::InProgress,
            JobStatus::Completed {
                transcript_uri: "https://example.com/out.json".to_string(),
            },
        ]);

        let uri = wait_for_completion(&service, "job-1", &instant_policy(5))
            .await
            .expect("job completes within budget");
        assert_eq!(uri, "https://example.com/out.json");
        assert_eq!(service.status_checks(), 3);
    }

    #[tokio::test]
    async fn failed_job_is_terminal() {
        let service = MockJobService::new().with_statuses([
            JobStatus::InProgress,
            JobStatus::Failed {
                reason: "unsupported media format".to_string(),
            },
        ]);

        let err = wait_for_completion(&service, "job-1", &instant_policy(5))
            .await
            .unwrap_err();
        match err {
            TurnscribeError::JobFailed { job, reason } => {
                assert_eq!(job, "job-1");
                assert_eq!(reason, "unsupported media format");
            }
            other => panic!("expected JobFailed, got {other:?}"),
        }
        // No further checks after the terminal status.
        assert_eq!(service.status_checks(), 2);
    }

    #[tokio::test]
    async fn budget_exhaustion_is_poll_timeout() {
        // Mock reports InProgress forever once the (empty) script runs out.
        let service = MockJobService::new();

        let err = wait_for_completion(&service, "job-1", &instant_policy(3))
            .await
            .unwrap_err();
        match err {
            TurnscribeError::PollTimeout { job, attempts } => {
                assert_eq!(job, "job-1");
                assert_eq!(attempts, 3);
            }
            other => panic!("expected PollTimeout, got {other:?}"),
        }
        assert_eq!(service.status_checks(), 3);
    }

    #[tokio::test]
    async fn completion_on_last_attempt_still_succeeds() {
        let service = MockJobService::new().with_statuses([
            JobStatus::InProgress,
            JobStatus::Completed {
                transcript_uri: "https://example.com/out.json".to_string(),
            },
        ]);

        let uri = wait_for_completion(&service, "job-1", &instant_policy(2))
            .await
            .expect("completes on final check");
        assert_eq!(uri, "https://example.com/out.json");
    }

    /// Service whose status endpoint fails a fixed number of times before
    /// reporting completion.
    struct FlakyService {
        failures_left: std::sync::Mutex<u32>,
    }

    #[async_trait::async_trait]
    impl JobService for FlakyService {
        async fn start_job(&self, _request: &crate::job::service::JobRequest) -> Result<()> {
            Ok(())
        }

        async fn job_status(&self, job_name: &str) -> Result<JobStatus> {
            let mut failures = self.failures_left.lock().expect("test lock");
            if *failures > 0 {
                *failures -= 1;
                return Err(TurnscribeError::JobStatusCheck {
                    job: job_name.to_string(),
                    message: "connection reset".to_string(),
                });
            }
            Ok(JobStatus::Completed {
                transcript_uri: "https://example.com/out.json".to_string(),
            })
        }

        async fn fetch_document(&self, _transcript_uri: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn transient_status_errors_are_retried() {
        let service = FlakyService {
            failures_left: std::sync::Mutex::new(2),
        };

        let uri = wait_for_completion(&service, "job-1", &instant_policy(5))
            .await
            .expect("recovers within budget");
        assert_eq!(uri, "https://example.com/out.json");
    }

    #[tokio::test]
    async fn persistent_status_errors_surface_last_error() {
        let service = FlakyService {
            failures_left: std::sync::Mutex::new(10),
        };

        let err = wait_for_completion(&service, "job-1", &instant_policy(3))
            .await
            .unwrap_err();
        assert!(matches!(err, TurnscribeError::JobStatusCheck { .. }));
    }

    #[test]
    fn default_policy_uses_shared_constants() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, defaults::MAX_POLL_ATTEMPTS);
        assert_eq!(policy.initial_delay, defaults::POLL_DELAY);
        assert_eq!(policy.backoff_factor, defaults::POLL_BACKOFF_FACTOR);
    }

    #[test]
    fn fixed_policy_has_no_backoff() {
        let policy = PollPolicy::fixed(7, Duration::from_millis(50));
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.backoff_factor, 1);
    }
}
