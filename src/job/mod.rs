//! Transcription job orchestration.
//!
//! Drives the external job service through one full cycle: submit, poll to a
//! terminal state, download the result document, validate it, and hand it to
//! the segmenter. The service itself sits behind [`JobService`]; the pure
//! segmentation core never sees any of this.

pub mod poller;
#[cfg(feature = "remote")]
pub mod remote;
pub mod service;

pub use poller::{PollPolicy, wait_for_completion};
#[cfg(feature = "remote")]
pub use remote::HttpJobService;
pub use service::{JobRequest, JobService, JobStatus, MockJobService};

use crate::error::Result;
use crate::transcript::segmenter::{SegmentOptions, segment_with};
use crate::transcript::types::TranscriptResult;
use crate::transcript::wire::TranscriptDocument;
use std::time::{SystemTime, UNIX_EPOCH};

/// A segmented transcript together with the job that produced it.
///
/// Job identity stays out of [`TranscriptResult`] itself; it belongs to the
/// orchestration layer, not the segmentation core.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionTranscript {
    pub job_name: String,
    pub result: TranscriptResult,
}

/// Build a unique job name from a session identifier.
///
/// Format: `transcribe-{unix-seconds}-{sanitized-identifier}`. The
/// identifier is lowercased and reduced to `[a-z0-9-]`, capped at 24
/// characters, so object keys and file paths survive the round trip.
pub fn generate_job_name(identifier: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let sanitized: String = identifier
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() { c } else { '-' }
        })
        .take(24)
        .collect();
    let sanitized = sanitized.trim_matches('-');

    if sanitized.is_empty() {
        format!("transcribe-{timestamp}")
    } else {
        format!("transcribe-{timestamp}-{sanitized}")
    }
}

/// Run one transcription job end to end.
///
/// Submits the request, waits for a terminal state within the poll budget,
/// downloads and validates the result document, and segments it.
pub async fn run_job(
    service: &dyn JobService,
    request: &JobRequest,
    policy: &PollPolicy,
    options: &SegmentOptions,
) -> Result<SessionTranscript> {
    service.start_job(request).await?;
    let transcript_uri = wait_for_completion(service, &request.job_name, policy).await?;
    let document_json = service.fetch_document(&transcript_uri).await?;

    let raw = TranscriptDocument::from_json(&document_json)?.into_raw()?;
    Ok(SessionTranscript {
        job_name: request.job_name.clone(),
        result: segment_with(&raw, options),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TurnscribeError;
    use std::time::Duration;

    const DOCUMENT: &str = r#"{
        "results": {
            "items": [
                {"type": "pronunciation", "start_time": "0.0", "end_time": "0.4",
                 "alternatives": [{"content": "Hello", "confidence": "0.9"}]},
                {"type": "pronunciation", "start_time": "1.0", "end_time": "1.4",
                 "alternatives": [{"content": "world", "confidence": "0.8"}]}
            ],
            "language_code": "en-US",
            "audio_duration": 2.0
        }
    }"#;

    fn instant_policy() -> PollPolicy {
        PollPolicy::fixed(5, Duration::ZERO)
    }

    #[test]
    fn job_name_contains_sanitized_identifier() {
        let name = generate_job_name("Session 42 (Dr. Lee).mp3");
        assert!(name.starts_with("transcribe-"));
        assert!(name.ends_with("-session-42--dr--lee--mp3"));
        assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }

    #[test]
    fn job_name_without_usable_identifier() {
        let name = generate_job_name("***");
        assert!(name.starts_with("transcribe-"));
        // Just the timestamp: two segments.
        assert_eq!(name.matches('-').count(), 1);
    }

    #[tokio::test]
    async fn run_job_completes_end_to_end() {
        let service = MockJobService::new()
            .with_statuses([
                JobStatus::InProgress,
                JobStatus::Completed {
                    transcript_uri: "https://example.com/out.json".to_string(),
                },
            ])
            .with_document(DOCUMENT);
        let request = JobRequest::new("job-1", "s3://bucket/session.mp3");

        let session = run_job(
            &service,
            &request,
            &instant_policy(),
            &SegmentOptions::default(),
        )
        .await
        .expect("job completes");

        assert_eq!(session.job_name, "job-1");
        assert_eq!(session.result.transcript, "Hello world");
        assert!(session.result.conversation.is_none());
        assert!((session.result.metadata.average_confidence - 0.85).abs() < 1e-9);
        assert_eq!(service.started_jobs().len(), 1);
    }

    #[tokio::test]
    async fn run_job_propagates_start_failure() {
        let service = MockJobService::new().with_start_failure();
        let request = JobRequest::new("job-1", "s3://bucket/session.mp3");

        let err = run_job(
            &service,
            &request,
            &instant_policy(),
            &SegmentOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TurnscribeError::JobStart { .. }));
        assert_eq!(service.status_checks(), 0);
    }

    #[tokio::test]
    async fn run_job_propagates_job_failure() {
        let service = MockJobService::new().with_statuses([JobStatus::Failed {
            reason: "media corrupt".to_string(),
        }]);
        let request = JobRequest::new("job-1", "s3://bucket/session.mp3");

        let err = run_job(
            &service,
            &request,
            &instant_policy(),
            &SegmentOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TurnscribeError::JobFailed { .. }));
    }

    #[tokio::test]
    async fn run_job_rejects_malformed_document() {
        let service = MockJobService::new()
            .with_statuses([JobStatus::Completed {
                transcript_uri: "https://example.com/out.json".to_string(),
            }])
            .with_document("{not json");
        let request = JobRequest::new("job-1", "s3://bucket/session.mp3");

        let err = run_job(
            &service,
            &request,
            &instant_policy(),
            &SegmentOptions::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TurnscribeError::TranscriptJson { .. }));
    }
}
