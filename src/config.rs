use crate::defaults;
use crate::error::{Result, TurnscribeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub job: JobConfig,
    pub segmenter: SegmenterConfig,
    pub output: OutputConfig,
}

/// Transcription job orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JobConfig {
    /// Base URL of the transcription REST service. Empty means unset.
    pub endpoint: String,
    pub language: String,
    pub media_format: String,
    pub show_speaker_labels: bool,
    pub max_speaker_labels: u32,
    pub max_poll_attempts: u32,
    pub poll_delay_secs: u64,
}

/// Segmenter behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Join punctuation tokens to the preceding word instead of
    /// space-separating them in the flat transcript.
    pub attach_punctuation: bool,
}

/// Output rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub color: bool,
    /// Render the two-party Doctor/Patient role names instead of raw
    /// speaker labels.
    pub doctor_patient_roles: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            media_format: defaults::DEFAULT_MEDIA_FORMAT.to_string(),
            show_speaker_labels: true,
            max_speaker_labels: defaults::MAX_SPEAKER_LABELS,
            max_poll_attempts: defaults::MAX_POLL_ATTEMPTS,
            poll_delay_secs: defaults::POLL_DELAY.as_secs(),
        }
    }
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            attach_punctuation: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            doctor_patient_roles: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TurnscribeError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                TurnscribeError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(TurnscribeError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TURNSCRIBE_ENDPOINT → job.endpoint
    /// - TURNSCRIBE_LANGUAGE → job.language
    ///
    /// The API token is read separately (TURNSCRIBE_TOKEN) and never stored
    /// in the config file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("TURNSCRIBE_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.job.endpoint = endpoint;
        }

        if let Ok(language) = std::env::var("TURNSCRIBE_LANGUAGE")
            && !language.is_empty()
        {
            self.job.language = language;
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/turnscribe/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("turnscribe").join("config.toml"))
    }

    #[cfg(not(feature = "cli"))]
    pub fn default_path() -> Option<PathBuf> {
        None
    }
}
