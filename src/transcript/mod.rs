//! Transcript segmentation core.
//!
//! Turns a raw speech-recognition job result (word-level tokens plus
//! per-segment speaker labels) into a flat transcript, a turn-structured
//! conversation, and summary metadata. The segmenter itself is a pure
//! function; parsing and validation of the wire document happen in
//! [`wire`], and speaker-role naming lives in [`roles`] as a separate
//! caller-side concern.

pub mod roles;
pub mod segmenter;
pub mod types;
pub mod wire;

pub use roles::{RoleMap, format_conversation};
pub use segmenter::{SegmentOptions, segment, segment_with};
pub use types::{
    ConversationTurn, ItemKind, RawTranscription, SegmentItem, SpeakerSegment, Timestamp,
    TranscriptMetadata, TranscriptResult, WordItem,
};
pub use wire::TranscriptDocument;
