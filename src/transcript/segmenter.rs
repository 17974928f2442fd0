//! The transcript segmenter: a pure pass over one recognition result.
//!
//! Two independent stages operate on the ordered token stream: a fold over
//! the diarization segments produces an immutable start-time → speaker
//! lookup, then a single walk over the tokens builds speaker turns. Neither
//! stage performs I/O and the whole pass is referentially transparent, so it
//! can run on any worker task without synchronization.

use crate::transcript::types::{
    ConversationTurn, ItemKind, RawTranscription, SpeakerSegment, Timestamp, TranscriptMetadata,
    TranscriptResult, WordItem,
};
use std::collections::{HashMap, HashSet};

/// Knobs for the flat-transcript rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentOptions {
    /// Join punctuation tokens directly to the preceding word.
    ///
    /// Off by default: the upstream service emits punctuation as separate
    /// tokens and the historical output space-separates them ("Hello ."),
    /// which downstream consumers already expect.
    pub attach_punctuation: bool,
}

/// Segment a recognition result with default options.
pub fn segment(raw: &RawTranscription) -> TranscriptResult {
    segment_with(raw, &SegmentOptions::default())
}

/// Segment a recognition result.
///
/// Total over any well-formed input: empty `items` yields an empty
/// transcript, and empty `speaker_segments` yields no conversation rather
/// than an error.
pub fn segment_with(raw: &RawTranscription, options: &SegmentOptions) -> TranscriptResult {
    let transcript = join_items(&raw.items, options);

    let conversation = if raw.speaker_segments.is_empty() {
        None
    } else {
        let lookup = speaker_lookup(&raw.speaker_segments);
        Some(build_turns(&raw.items, &lookup))
    };

    TranscriptResult {
        transcript,
        conversation,
        metadata: TranscriptMetadata {
            duration_seconds: raw.duration_seconds,
            language_code: raw.language_code.clone(),
            average_confidence: average_confidence(&raw.items),
            speaker_count: speaker_count(&raw.speaker_segments),
        },
    }
}

/// Join every token's best text in order.
fn join_items(items: &[WordItem], options: &SegmentOptions) -> String {
    let mut out = String::new();
    for item in items {
        let attach = options.attach_punctuation && item.kind == ItemKind::Punctuation;
        if !out.is_empty() && !attach {
            out.push(' ');
        }
        out.push_str(&item.best_text);
    }
    out
}

/// Fold the diarization segments into a start-time → speaker-label lookup.
///
/// When two segments claim the same start time, the later segment in input
/// order wins. The upstream contract does not rule such collisions out, so
/// the tie-break has to be explicit to keep the output deterministic.
fn speaker_lookup(segments: &[SpeakerSegment]) -> HashMap<&Timestamp, &str> {
    segments.iter().fold(HashMap::new(), |mut lookup, segment| {
        for item in &segment.items {
            lookup.insert(&item.start_time, segment.speaker_label.as_str());
        }
        lookup
    })
}

/// Walk the tokens in order and close a turn whenever the speaker changes.
///
/// Only pronunciation items participate; a word whose start time matches no
/// segment stays in the flat transcript but joins no turn.
fn build_turns(items: &[WordItem], lookup: &HashMap<&Timestamp, &str>) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    let mut current_speaker: Option<&str> = None;
    let mut buffer: Vec<&str> = Vec::new();

    for item in items {
        if item.kind != ItemKind::Pronunciation {
            continue;
        }
        let Some(start) = &item.start_time else {
            continue;
        };
        let Some(&speaker) = lookup.get(start) else {
            continue;
        };

        if let Some(previous) = current_speaker
            && previous != speaker
            && !buffer.is_empty()
        {
            turns.push(ConversationTurn {
                speaker: previous.to_string(),
                text: buffer.join(" "),
            });
            buffer.clear();
        }

        current_speaker = Some(speaker);
        buffer.push(&item.best_text);
    }

    if let Some(speaker) = current_speaker
        && !buffer.is_empty()
    {
        turns.push(ConversationTurn {
            speaker: speaker.to_string(),
            text: buffer.join(" "),
        });
    }

    turns
}

/// Mean confidence over pronunciation items that carry one.
///
/// 0.0 when no item does — never an error, never NaN.
fn average_confidence(items: &[WordItem]) -> f64 {
    let confidences: Vec<f64> = items
        .iter()
        .filter(|item| item.kind == ItemKind::Pronunciation)
        .filter_map(|item| item.confidence)
        .collect();

    if confidences.is_empty() {
        0.0
    } else {
        confidences.iter().sum::<f64>() / confidences.len() as f64
    }
}

/// Distinct speaker labels appearing in the diarization output.
fn speaker_count(segments: &[SpeakerSegment]) -> usize {
    segments
        .iter()
        .map(|segment| segment.speaker_label.as_str())
        .collect::<HashSet<_>>()
        .len()
}
