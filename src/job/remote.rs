//! HTTP implementation of [`JobService`] for transcribe-style REST APIs.
//!
//! The API surface is three calls: `POST {base}/jobs` to submit, `GET
//! {base}/jobs/{name}` for status, and a plain GET of the transcript URI the
//! completed job reports. Authentication is a bearer token; uploading the
//! audio object itself is the caller's concern.

use crate::error::{Result, TurnscribeError};
use crate::job::service::{JobRequest, JobService, JobStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub struct HttpJobService {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpJobService {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Submission body, mirroring the job API's field names.
#[derive(Debug, Serialize)]
struct StartJobBody<'a> {
    job_name: &'a str,
    media: MediaRef<'a>,
    media_format: &'a str,
    language_code: &'a str,
    settings: JobSettings,
}

#[derive(Debug, Serialize)]
struct MediaRef<'a> {
    media_file_uri: &'a str,
}

#[derive(Debug, Serialize)]
struct JobSettings {
    show_speaker_labels: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_speaker_labels: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    transcript_uri: Option<String>,
    #[serde(default)]
    failure_reason: Option<String>,
}

fn build_start_body(request: &JobRequest) -> StartJobBody<'_> {
    StartJobBody {
        job_name: &request.job_name,
        media: MediaRef {
            media_file_uri: &request.media_uri,
        },
        media_format: &request.media_format,
        language_code: &request.language_code,
        settings: JobSettings {
            show_speaker_labels: request.show_speaker_labels,
            max_speaker_labels: request.max_speaker_labels,
        },
    }
}

/// Map a status payload to a [`JobStatus`].
///
/// Unknown status strings map to `InProgress`: the service occasionally adds
/// intermediate states and a new one should keep the poller waiting, not
/// abort the job.
fn status_from_response(job_name: &str, response: StatusResponse) -> Result<JobStatus> {
    match response.status.as_str() {
        "QUEUED" => Ok(JobStatus::Queued),
        "IN_PROGRESS" => Ok(JobStatus::InProgress),
        "COMPLETED" => {
            let transcript_uri =
                response
                    .transcript_uri
                    .ok_or_else(|| TurnscribeError::JobStatusCheck {
                        job: job_name.to_string(),
                        message: "completed job reported no transcript URI".to_string(),
                    })?;
            Ok(JobStatus::Completed { transcript_uri })
        }
        "FAILED" => Ok(JobStatus::Failed {
            reason: response
                .failure_reason
                .unwrap_or_else(|| "unknown reason".to_string()),
        }),
        _ => Ok(JobStatus::InProgress),
    }
}

#[async_trait]
impl JobService for HttpJobService {
    async fn start_job(&self, request: &JobRequest) -> Result<()> {
        let url = format!("{}/jobs", self.base_url);
        let response = self
            .authorize(self.client.post(&url))
            .json(&build_start_body(request))
            .send()
            .await
            .map_err(|e| TurnscribeError::JobStart {
                job: request.job_name.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TurnscribeError::JobStart {
                job: request.job_name.clone(),
                message: format!("HTTP {}", response.status()),
            });
        }
        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> Result<JobStatus> {
        let url = format!("{}/jobs/{}", self.base_url, job_name);
        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| TurnscribeError::JobStatusCheck {
                job: job_name.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TurnscribeError::JobStatusCheck {
                job: job_name.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let payload: StatusResponse =
            response
                .json()
                .await
                .map_err(|e| TurnscribeError::JobStatusCheck {
                    job: job_name.to_string(),
                    message: e.to_string(),
                })?;
        status_from_response(job_name, payload)
    }

    async fn fetch_document(&self, transcript_uri: &str) -> Result<String> {
        let response = self
            .authorize(self.client.get(transcript_uri))
            .send()
            .await
            .map_err(|e| TurnscribeError::TranscriptDownload {
                uri: transcript_uri.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TurnscribeError::TranscriptDownload {
                uri: transcript_uri.to_string(),
                message: format!("HTTP {}", response.status()),
            });
        }

        response
            .text()
            .await
            .map_err(|e| TurnscribeError::TranscriptDownload {
                uri: transcript_uri.to_string(),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_body_serializes_api_shape() {
        let request = JobRequest::new("job-1", "s3://bucket/session.mp3");
        let body = serde_json::to_value(build_start_body(&request)).expect("serialize");

        assert_eq!(body["job_name"], "job-1");
        assert_eq!(body["media"]["media_file_uri"], "s3://bucket/session.mp3");
        assert_eq!(body["media_format"], "mp3");
        assert_eq!(body["language_code"], "en-US");
        assert_eq!(body["settings"]["show_speaker_labels"], true);
        assert_eq!(body["settings"]["max_speaker_labels"], 2);
    }

    #[test]
    fn start_body_omits_max_speakers_without_diarization() {
        let request = JobRequest::new("job-1", "s3://b/a.mp3").without_diarization();
        let body = serde_json::to_value(build_start_body(&request)).expect("serialize");

        assert_eq!(body["settings"]["show_speaker_labels"], false);
        assert!(body["settings"].get("max_speaker_labels").is_none());
    }

    #[test]
    fn status_mapping() {
        let status = |s: &str, uri: Option<&str>, reason: Option<&str>| StatusResponse {
            status: s.to_string(),
            transcript_uri: uri.map(String::from),
            failure_reason: reason.map(String::from),
        };

        assert_eq!(
            status_from_response("j", status("QUEUED", None, None)).expect("map"),
            JobStatus::Queued
        );
        assert_eq!(
            status_from_response("j", status("IN_PROGRESS", None, None)).expect("map"),
            JobStatus::InProgress
        );
        assert_eq!(
            status_from_response("j", status("COMPLETED", Some("https://x/out.json"), None))
                .expect("map"),
            JobStatus::Completed {
                transcript_uri: "https://x/out.json".to_string()
            }
        );
        assert_eq!(
            status_from_response("j", status("FAILED", None, Some("bad audio"))).expect("map"),
            JobStatus::Failed {
                reason: "bad audio".to_string()
            }
        );
    }

    #[test]
    fn completed_without_uri_is_an_error() {
        let response = StatusResponse {
            status: "COMPLETED".to_string(),
            transcript_uri: None,
            failure_reason: None,
        };
        let err = status_from_response("job-1", response).unwrap_err();
        assert!(matches!(err, TurnscribeError::JobStatusCheck { .. }));
    }

    #[test]
    fn unknown_status_keeps_waiting() {
        let response = StatusResponse {
            status: "POST_PROCESSING".to_string(),
            transcript_uri: None,
            failure_reason: None,
        };
        assert_eq!(
            status_from_response("job-1", response).expect("map"),
            JobStatus::InProgress
        );
    }

    #[test]
    fn failed_without_reason_gets_placeholder() {
        let response = StatusResponse {
            status: "FAILED".to_string(),
            transcript_uri: None,
            failure_reason: None,
        };
        assert_eq!(
            status_from_response("job-1", response).expect("map"),
            JobStatus::Failed {
                reason: "unknown reason".to_string()
            }
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let service = HttpJobService::new("https://transcribe.example.com/", None);
        assert_eq!(service.base_url, "https://transcribe.example.com");
    }
}
