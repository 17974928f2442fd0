//! turnscribe - Speaker-turn segmentation for clinical session transcripts
//!
//! Converts a speech-recognition job result (word-level tokens plus speaker
//! diarization) into a flat transcript, a turn-structured conversation, and
//! summary metadata, and drives the job service that produces those results.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod job;
#[cfg(feature = "cli")]
pub mod output;
pub mod transcript;

// Core segmentation (pure, no I/O)
pub use transcript::segmenter::{SegmentOptions, segment, segment_with};
pub use transcript::types::{
    ConversationTurn, ItemKind, RawTranscription, SpeakerSegment, Timestamp, TranscriptMetadata,
    TranscriptResult, WordItem,
};
pub use transcript::wire::TranscriptDocument;

// Role mapping (presentation layer)
pub use transcript::roles::{RoleMap, format_conversation};

// Job orchestration
pub use job::{
    JobRequest, JobService, JobStatus, MockJobService, PollPolicy, SessionTranscript,
    generate_job_name, run_job,
};
#[cfg(feature = "remote")]
pub use job::HttpJobService;

// Error handling
pub use error::{Result, TurnscribeError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.0.1+abc1234"` when git hash is available, `"0.0.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
