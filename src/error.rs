//! Error types for turnscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TurnscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Transcript document errors
    #[error("Transcript document is not valid JSON: {message}")]
    TranscriptJson { message: String },

    #[error("Invalid transcript document: {message}")]
    TranscriptParse { message: String },

    // Job orchestration errors
    #[error("Failed to start transcription job {job}: {message}")]
    JobStart { job: String, message: String },

    #[error("Transcription job {job} failed: {reason}")]
    JobFailed { job: String, reason: String },

    #[error("Transcription job {job} did not complete within {attempts} status checks")]
    PollTimeout { job: String, attempts: u32 },

    #[error("Failed to check status of job {job}: {message}")]
    JobStatusCheck { job: String, message: String },

    #[error("Failed to download transcript from {uri}: {message}")]
    TranscriptDownload { uri: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TurnscribeError>;
