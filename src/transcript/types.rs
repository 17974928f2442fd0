//! Domain types for transcript segmentation.

use crate::error::{Result, TurnscribeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A time offset into the recording, as reported by the transcription service.
///
/// The service emits offsets as decimal strings (e.g. `"1.02"`), and words are
/// matched to speaker segments by exact equality of those values. Equality and
/// hashing therefore use the original string, not the parsed float; two
/// timestamps that print differently are different keys even if they denote
/// the same instant.
#[derive(Debug, Clone)]
pub struct Timestamp {
    raw: String,
    seconds: f64,
}

impl Timestamp {
    /// Parse a decimal-string offset.
    ///
    /// Rejects anything that is not a finite, non-negative number.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        let seconds: f64 = raw.parse().map_err(|_| TurnscribeError::TranscriptParse {
            message: format!("invalid time offset {raw:?}"),
        })?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(TurnscribeError::TranscriptParse {
                message: format!("time offset {raw:?} is not a non-negative number"),
            });
        }
        Ok(Self {
            raw: raw.to_string(),
            seconds,
        })
    }

    /// The canonical wire representation.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The offset in seconds.
    pub fn seconds(&self) -> f64 {
        self.seconds
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Timestamp {}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Kind of recognized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A spoken word.
    Pronunciation,
    /// An inserted punctuation mark (no timing, no confidence).
    Punctuation,
}

/// One recognized token in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct WordItem {
    pub kind: ItemKind,
    /// Present only for pronunciation items.
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    /// Highest-confidence candidate text.
    pub best_text: String,
    /// Recognition probability in [0, 1]; pronunciation items only.
    pub confidence: Option<f64>,
}

impl WordItem {
    /// Build a pronunciation item.
    pub fn pronunciation(
        text: &str,
        start: Timestamp,
        end: Timestamp,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            kind: ItemKind::Pronunciation,
            start_time: Some(start),
            end_time: Some(end),
            best_text: text.to_string(),
            confidence,
        }
    }

    /// Build a punctuation item.
    pub fn punctuation(text: &str) -> Self {
        Self {
            kind: ItemKind::Punctuation,
            start_time: None,
            end_time: None,
            best_text: text.to_string(),
            confidence: None,
        }
    }
}

/// One timing entry inside a speaker segment, matching a word's start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentItem {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// A contiguous span of the recording attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerSegment {
    /// Opaque label from the diarizer (e.g. "spk_0").
    pub speaker_label: String,
    pub items: Vec<SegmentItem>,
}

/// Fully validated input to the segmenter.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTranscription {
    /// Chronologically ordered tokens; this ordering is authoritative.
    pub items: Vec<WordItem>,
    /// Diarization output; empty when speaker labels were not requested.
    pub speaker_segments: Vec<SpeakerSegment>,
    pub duration_seconds: f64,
    pub language_code: String,
}

/// A maximal run of consecutive words from a single speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Raw speaker label; role naming is a caller concern.
    pub speaker: String,
    /// Words joined by single spaces, in original order.
    pub text: String,
}

/// Summary metadata for a segmented transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptMetadata {
    pub duration_seconds: f64,
    pub language_code: String,
    /// Mean confidence over pronunciation items that carry one; 0.0 when
    /// none do.
    pub average_confidence: f64,
    /// Number of distinct speaker labels in the diarization output.
    pub speaker_count: usize,
}

/// The segmenter's output: flat transcript, optional conversation, metadata.
///
/// Serializes directly to the JSON shape callers expose; `conversation` is
/// `null` when no speaker segmentation was provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub transcript: String,
    pub conversation: Option<Vec<ConversationTurn>>,
    pub metadata: TranscriptMetadata,
}
