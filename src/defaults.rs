//! Default configuration constants for turnscribe.
//!
//! This module provides shared constants used across different configuration types
//! to ensure consistency and eliminate duplication.

use std::time::Duration;

/// Default language code requested from the transcription service.
///
/// Clinical sessions handled by this tool are recorded in US English;
/// override per job for multilingual practices.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Default media container format for submitted audio.
pub const DEFAULT_MEDIA_FORMAT: &str = "mp3";

/// Default maximum number of diarized speakers requested per job.
///
/// A clinical session is normally a two-party conversation (clinician and
/// patient). Raise this for group sessions.
pub const MAX_SPEAKER_LABELS: u32 = 2;

/// Maximum number of job status checks before giving up.
///
/// Combined with the backoff schedule this bounds how long a single
/// transcription is allowed to stay in flight.
pub const MAX_POLL_ATTEMPTS: u32 = 5;

/// Initial delay between job status checks.
///
/// Transcription of a session recording takes tens of seconds at minimum,
/// so there is no point polling faster than this.
pub const POLL_DELAY: Duration = Duration::from_secs(10);

/// Multiplier applied to the poll delay after each unfinished status check.
pub const POLL_BACKOFF_FACTOR: u32 = 2;

/// Speaker label the transcription service assigns to the first diarized voice.
pub const FIRST_SPEAKER_LABEL: &str = "spk_0";
