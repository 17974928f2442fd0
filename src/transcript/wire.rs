//! Serde model of the transcription service's result document.
//!
//! The job service delivers one JSON document per completed job:
//! `results.transcripts[]` (redundant full-text chunks), `results.items[]`
//! (word/punctuation tokens with string-typed offsets and confidences), and
//! `results.speaker_labels.segments[]` (diarization). This module mirrors
//! that shape and validates it into [`RawTranscription`] before anything
//! reaches the pure segmenter, so malformed payloads fail fast with a
//! descriptive error instead of leaking into the core.

use crate::defaults;
use crate::error::{Result, TurnscribeError};
use crate::transcript::types::{
    ItemKind, RawTranscription, SegmentItem, SpeakerSegment, Timestamp, WordItem,
};
use serde::Deserialize;

/// Top-level result document as delivered by the job service.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptDocument {
    #[serde(default, rename = "jobName")]
    pub job_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub results: WireResults,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct WireResults {
    #[serde(default)]
    pub transcripts: Vec<WireTranscript>,
    #[serde(default)]
    pub items: Vec<WireItem>,
    #[serde(default)]
    pub speaker_labels: Option<WireSpeakerLabels>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub audio_duration: Option<WireNumber>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTranscript {
    #[serde(default)]
    pub transcript: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<WireAlternative>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireAlternative {
    pub content: String,
    #[serde(default)]
    pub confidence: Option<WireNumber>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSpeakerLabels {
    #[serde(default)]
    pub segments: Vec<WireSegment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSegment {
    pub speaker_label: String,
    #[serde(default)]
    pub items: Vec<WireSegmentItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSegmentItem {
    pub start_time: String,
    pub end_time: String,
}

/// The service is inconsistent about numeric fields: offsets and confidences
/// arrive as decimal strings, durations sometimes as plain numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    fn as_f64(&self, field: &str) -> Result<f64> {
        let value = match self {
            WireNumber::Number(n) => *n,
            WireNumber::Text(s) => {
                s.trim()
                    .parse()
                    .map_err(|_| TurnscribeError::TranscriptParse {
                        message: format!("{field} is not a number: {s:?}"),
                    })?
            }
        };
        if !value.is_finite() {
            return Err(TurnscribeError::TranscriptParse {
                message: format!("{field} is not finite"),
            });
        }
        Ok(value)
    }
}

impl TranscriptDocument {
    /// Parse a result document from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TurnscribeError::TranscriptJson {
            message: e.to_string(),
        })
    }

    /// The service's own full-text rendering, joined across chunks.
    ///
    /// Redundant with the item stream; kept for cross-checking only.
    pub fn redundant_transcript(&self) -> String {
        self.results
            .transcripts
            .iter()
            .map(|t| t.transcript.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Validate the document into segmenter input.
    ///
    /// Fails on: unknown item type, an item without alternatives, a
    /// pronunciation item without timing, unparseable offsets, or a
    /// confidence outside [0, 1]. Absent `items` or `speaker_labels` are
    /// well-formed (empty transcript / no diarization), not errors.
    pub fn into_raw(self) -> Result<RawTranscription> {
        let mut items = Vec::with_capacity(self.results.items.len());
        for (index, item) in self.results.items.into_iter().enumerate() {
            items.push(convert_item(index, item)?);
        }

        let mut speaker_segments = Vec::new();
        if let Some(labels) = self.results.speaker_labels {
            for segment in labels.segments {
                speaker_segments.push(convert_segment(segment)?);
            }
        }

        let duration_seconds = match self.results.audio_duration {
            Some(duration) => duration.as_f64("audio_duration")?,
            None => 0.0,
        };

        Ok(RawTranscription {
            items,
            speaker_segments,
            duration_seconds,
            language_code: self
                .results
                .language_code
                .unwrap_or_else(|| defaults::DEFAULT_LANGUAGE.to_string()),
        })
    }
}

fn convert_item(index: usize, item: WireItem) -> Result<WordItem> {
    let kind = match item.item_type.as_str() {
        "pronunciation" => ItemKind::Pronunciation,
        "punctuation" => ItemKind::Punctuation,
        other => {
            return Err(TurnscribeError::TranscriptParse {
                message: format!("item {index} has unknown type {other:?}"),
            });
        }
    };

    let Some(best) = item.alternatives.into_iter().next() else {
        return Err(TurnscribeError::TranscriptParse {
            message: format!("item {index} has no alternatives"),
        });
    };

    match kind {
        ItemKind::Punctuation => Ok(WordItem::punctuation(&best.content)),
        ItemKind::Pronunciation => {
            let start = item.start_time.ok_or_else(|| TurnscribeError::TranscriptParse {
                message: format!("pronunciation item {index} has no start_time"),
            })?;
            let end = item.end_time.ok_or_else(|| TurnscribeError::TranscriptParse {
                message: format!("pronunciation item {index} has no end_time"),
            })?;

            let confidence = match best.confidence {
                Some(value) => {
                    let confidence = value.as_f64("confidence")?;
                    if !(0.0..=1.0).contains(&confidence) {
                        return Err(TurnscribeError::TranscriptParse {
                            message: format!(
                                "item {index} confidence {confidence} is outside [0, 1]"
                            ),
                        });
                    }
                    Some(confidence)
                }
                None => None,
            };

            Ok(WordItem::pronunciation(
                &best.content,
                Timestamp::parse(&start)?,
                Timestamp::parse(&end)?,
                confidence,
            ))
        }
    }
}

fn convert_segment(segment: WireSegment) -> Result<SpeakerSegment> {
    let mut items = Vec::with_capacity(segment.items.len());
    for item in segment.items {
        items.push(SegmentItem {
            start_time: Timestamp::parse(&item.start_time)?,
            end_time: Timestamp::parse(&item.end_time)?,
        });
    }
    Ok(SpeakerSegment {
        speaker_label: segment.speaker_label,
        items,
    })
}
