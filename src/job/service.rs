//! The transcription job service seam.
//!
//! The real service is a remote, job-oriented speech-to-text API; this trait
//! keeps the orchestration code testable against a scripted mock.

use crate::defaults;
use crate::error::{Result, TurnscribeError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Parameters for one transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// Unique job identifier; see [`crate::job::generate_job_name`].
    pub job_name: String,
    /// Reference to the already-uploaded audio object.
    pub media_uri: String,
    pub media_format: String,
    pub language_code: String,
    pub show_speaker_labels: bool,
    pub max_speaker_labels: Option<u32>,
}

impl JobRequest {
    /// Build a request with the clinical-session defaults: diarization on,
    /// two expected speakers, US English, MP3 audio.
    pub fn new(job_name: &str, media_uri: &str) -> Self {
        Self {
            job_name: job_name.to_string(),
            media_uri: media_uri.to_string(),
            media_format: defaults::DEFAULT_MEDIA_FORMAT.to_string(),
            language_code: defaults::DEFAULT_LANGUAGE.to_string(),
            show_speaker_labels: true,
            max_speaker_labels: Some(defaults::MAX_SPEAKER_LABELS),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language_code = language.to_string();
        self
    }

    pub fn with_media_format(mut self, format: &str) -> Self {
        self.media_format = format.to_string();
        self
    }

    pub fn with_max_speakers(mut self, max: u32) -> Self {
        self.max_speaker_labels = Some(max);
        self
    }

    /// Request a plain transcript without speaker labels.
    pub fn without_diarization(mut self) -> Self {
        self.show_speaker_labels = false;
        self.max_speaker_labels = None;
        self
    }
}

/// Lifecycle state of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed { transcript_uri: String },
    Failed { reason: String },
}

/// A job-oriented transcription service.
///
/// Implementations submit a job, report its status, and download the result
/// document once the job reaches a terminal state.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit a new transcription job.
    async fn start_job(&self, request: &JobRequest) -> Result<()>;

    /// Check the current status of a job.
    async fn job_status(&self, job_name: &str) -> Result<JobStatus>;

    /// Download the raw result document from its URI.
    async fn fetch_document(&self, transcript_uri: &str) -> Result<String>;
}

/// Mock job service for testing.
///
/// Plays back a scripted sequence of statuses and serves a canned result
/// document.
pub struct MockJobService {
    statuses: Mutex<VecDeque<JobStatus>>,
    document: String,
    fail_start: bool,
    started: Mutex<Vec<JobRequest>>,
    status_checks: Mutex<u32>,
}

// A poisoned lock in the mock means a test already panicked.
#[allow(clippy::expect_used)]
impl MockJobService {
    pub fn new() -> Self {
        Self {
            statuses: Mutex::new(VecDeque::new()),
            document: r#"{"results": {}}"#.to_string(),
            fail_start: false,
            started: Mutex::new(Vec::new()),
            status_checks: Mutex::new(0),
        }
    }

    /// Script the sequence of statuses returned by successive checks.
    /// Once exhausted, further checks report `InProgress`.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = JobStatus>) -> Self {
        *self.statuses.lock().expect("mock lock") = statuses.into_iter().collect();
        self
    }

    /// Serve this document from `fetch_document`.
    pub fn with_document(mut self, document: &str) -> Self {
        self.document = document.to_string();
        self
    }

    /// Make `start_job` fail.
    pub fn with_start_failure(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Requests passed to `start_job` so far.
    pub fn started_jobs(&self) -> Vec<JobRequest> {
        self.started.lock().expect("mock lock").clone()
    }

    /// Number of `job_status` calls so far.
    pub fn status_checks(&self) -> u32 {
        *self.status_checks.lock().expect("mock lock")
    }
}

impl Default for MockJobService {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::expect_used)]
#[async_trait]
impl JobService for MockJobService {
    async fn start_job(&self, request: &JobRequest) -> Result<()> {
        if self.fail_start {
            return Err(TurnscribeError::JobStart {
                job: request.job_name.clone(),
                message: "mock start failure".to_string(),
            });
        }
        self.started.lock().expect("mock lock").push(request.clone());
        Ok(())
    }

    async fn job_status(&self, _job_name: &str) -> Result<JobStatus> {
        *self.status_checks.lock().expect("mock lock") += 1;
        Ok(self
            .statuses
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or(JobStatus::InProgress))
    }

    async fn fetch_document(&self, _transcript_uri: &str) -> Result<String> {
        Ok(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_are_clinical() {
        let request = JobRequest::new("job-1", "s3://bucket/session.mp3");
        assert_eq!(request.language_code, "en-US");
        assert_eq!(request.media_format, "mp3");
        assert!(request.show_speaker_labels);
        assert_eq!(request.max_speaker_labels, Some(2));
    }

    #[test]
    fn request_builder_methods() {
        let request = JobRequest::new("job-1", "s3://bucket/a.wav")
            .with_language("de-DE")
            .with_media_format("wav")
            .with_max_speakers(4);
        assert_eq!(request.language_code, "de-DE");
        assert_eq!(request.media_format, "wav");
        assert_eq!(request.max_speaker_labels, Some(4));
    }

    #[test]
    fn request_without_diarization() {
        let request = JobRequest::new("job-1", "s3://bucket/a.mp3").without_diarization();
        assert!(!request.show_speaker_labels);
        assert_eq!(request.max_speaker_labels, None);
    }

    #[tokio::test]
    async fn mock_records_started_jobs() {
        let service = MockJobService::new();
        let request = JobRequest::new("job-1", "s3://bucket/a.mp3");
        service.start_job(&request).await.expect("start");
        assert_eq!(service.started_jobs(), vec![request]);
    }

    #[tokio::test]
    async fn mock_start_failure() {
        let service = MockJobService::new().with_start_failure();
        let request = JobRequest::new("job-1", "s3://bucket/a.mp3");
        let err = service.start_job(&request).await.unwrap_err();
        assert!(matches!(err, TurnscribeError::JobStart { .. }));
        assert!(service.started_jobs().is_empty());
    }

    #[tokio::test]
    async fn mock_plays_back_statuses_then_in_progress() {
        let service = MockJobService::new().with_statuses([
            JobStatus::Queued,
            JobStatus::Completed {
                transcript_uri: "https://example.com/out.json".to_string(),
            },
        ]);

        assert_eq!(
            service.job_status("job-1").await.expect("status"),
            JobStatus::Queued
        );
        assert!(matches!(
            service.job_status("job-1").await.expect("status"),
            JobStatus::Completed { .. }
        ));
        // Script exhausted
        assert_eq!(
            service.job_status("job-1").await.expect("status"),
            JobStatus::InProgress
        );
        assert_eq!(service.status_checks(), 3);
    }

    #[tokio::test]
    async fn mock_serves_document() {
        let service = MockJobService::new().with_document(r#"{"results": {"items": []}}"#);
        let document = service
            .fetch_document("https://example.com/out.json")
            .await
            .expect("fetch");
        assert!(document.contains("items"));
    }

    #[test]
    fn service_trait_is_object_safe() {
        let service: Box<dyn JobService> = Box::new(MockJobService::new());
        drop(service);
    }
}
