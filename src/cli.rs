//! Command-line interface for turnscribe
//!
//! Provides argument parsing using clap derive macros.

use crate::transcript::roles::RoleMap;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Speaker-turn segmentation for clinical session transcripts
#[derive(Parser, Debug)]
#[command(
    name = "turnscribe",
    version,
    about = "Speaker-turn segmentation for clinical session transcripts"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress the summary line on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose progress output on stderr (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output rendering format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// "Role: text" lines
    Text,
    /// The full result object as pretty-printed JSON
    Json,
}

/// Parse a poll interval string into a Duration.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`), and compound (`1m30s`).
fn parse_poll_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Parse a role mapping spec like `spk_0=Doctor,spk_1=Patient`.
fn parse_roles(s: &str) -> Result<RoleMap, String> {
    s.parse().map_err(|e: crate::error::TurnscribeError| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment a completed job's result document into speaker turns
    Segment {
        /// Result JSON file (reads stdin when omitted)
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'o', value_name = "FORMAT", value_enum, default_value = "text")]
        format: OutputFormat,

        /// Speaker role mapping (e.g. spk_0=Doctor,spk_1=Patient)
        #[arg(long, value_name = "SPEC", value_parser = parse_roles)]
        roles: Option<RoleMap>,

        /// Use the two-party Doctor/Patient role mapping
        #[arg(long, conflicts_with = "roles")]
        doctor_patient: bool,

        /// Attach punctuation to the preceding word instead of space-joining
        #[arg(long)]
        attach_punctuation: bool,
    },

    /// Submit a transcription job and wait for the segmented result
    #[cfg(feature = "remote")]
    Run {
        /// Reference to the uploaded audio object (e.g. s3://bucket/session.mp3)
        #[arg(long, value_name = "URI")]
        media_uri: String,

        /// Job name (default: generated from the media URI)
        #[arg(long, value_name = "NAME")]
        job_name: Option<String>,

        /// Language code override (e.g. en-US, de-DE)
        #[arg(long, value_name = "LANG")]
        language: Option<String>,

        /// Media container format override (e.g. mp3, wav)
        #[arg(long, value_name = "FORMAT")]
        media_format: Option<String>,

        /// Maximum number of diarized speakers
        #[arg(long, value_name = "N")]
        max_speakers: Option<u32>,

        /// Request a plain transcript without speaker labels
        #[arg(long)]
        no_diarization: bool,

        /// Delay between status checks (default: 10s). Examples: 30s, 2m
        #[arg(long, value_name = "DURATION", value_parser = parse_poll_interval)]
        poll_interval: Option<Duration>,

        /// Status checks allowed before giving up
        #[arg(long, value_name = "N")]
        max_attempts: Option<u32>,

        /// Output format
        #[arg(long, short = 'o', value_name = "FORMAT", value_enum, default_value = "text")]
        format: OutputFormat,

        /// Speaker role mapping (e.g. spk_0=Doctor,spk_1=Patient)
        #[arg(long, value_name = "SPEC", value_parser = parse_roles)]
        roles: Option<RoleMap>,

        /// Use the two-party Doctor/Patient role mapping
        #[arg(long, conflicts_with = "roles")]
        doctor_patient: bool,

        /// Attach punctuation to the preceding word instead of space-joining
        #[arg(long)]
        attach_punctuation: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration inspection actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration as TOML
    Show,
}
