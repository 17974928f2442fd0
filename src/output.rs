//! Terminal rendering for segmented transcripts.
//!
//! Presentation only; the segmentation core never prints.

use crate::transcript::roles::{RoleMap, format_conversation};
use crate::transcript::types::TranscriptResult;
use owo_colors::OwoColorize;

/// Render a result as "Role: text" lines, optionally coloring role names.
///
/// Falls back to the flat transcript when no diarization is present.
pub fn render_text(result: &TranscriptResult, roles: &RoleMap, color: bool) -> String {
    if !color {
        return format_conversation(result, roles);
    }
    match &result.conversation {
        Some(turns) => turns
            .iter()
            .map(|turn| {
                let role = roles.resolve(&turn.speaker);
                format!("{}: {}", role.cyan().bold(), turn.text)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => result.transcript.clone(),
    }
}

/// Render a result as pretty-printed JSON.
pub fn render_json(result: &TranscriptResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// One-line summary for stderr: speakers, turns, duration, confidence.
pub fn summary_line(result: &TranscriptResult) -> String {
    let turns = result.conversation.as_ref().map_or(0, Vec::len);
    format!(
        "{} speakers, {} turns, {:.1}s audio, {:.0}% avg confidence",
        result.metadata.speaker_count,
        turns,
        result.metadata.duration_seconds,
        result.metadata.average_confidence * 100.0,
    )
}
