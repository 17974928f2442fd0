//! Speaker-label → role-name mapping.
//!
//! The segmenter keeps the diarizer's raw labels ("spk_0", "spk_1"); naming
//! the parties is a presentation concern layered on top. The default map
//! passes labels through unchanged; [`RoleMap::doctor_patient`] reproduces
//! the historical two-party rendering of clinical sessions.

use crate::error::TurnscribeError;
use crate::transcript::types::TranscriptResult;
use std::str::FromStr;

/// Maps speaker labels to display names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMap {
    entries: Vec<(String, String)>,
    /// Name used for labels with no entry; `None` passes the label through.
    fallback: Option<String>,
}

impl RoleMap {
    /// Labels render as-is.
    pub fn passthrough() -> Self {
        Self {
            entries: Vec::new(),
            fallback: None,
        }
    }

    /// Two-party clinical mapping: the first diarized voice is the Doctor,
    /// every other label the Patient.
    pub fn doctor_patient() -> Self {
        Self {
            entries: vec![(
                crate::defaults::FIRST_SPEAKER_LABEL.to_string(),
                "Doctor".to_string(),
            )],
            fallback: Some("Patient".to_string()),
        }
    }

    /// Add or replace a label's display name.
    pub fn with_role(mut self, label: &str, name: &str) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(l, _)| l == label) {
            entry.1 = name.to_string();
        } else {
            self.entries.push((label.to_string(), name.to_string()));
        }
        self
    }

    /// Resolve a label to its display name.
    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, name)| name.as_str())
            .or(self.fallback.as_deref())
            .unwrap_or(label)
    }
}

impl Default for RoleMap {
    fn default() -> Self {
        Self::passthrough()
    }
}

impl FromStr for RoleMap {
    type Err = TurnscribeError;

    /// Parse `"spk_0=Doctor,spk_1=Patient"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut map = RoleMap::passthrough();
        for pair in s.split(',').filter(|pair| !pair.trim().is_empty()) {
            let Some((label, name)) = pair.split_once('=') else {
                return Err(TurnscribeError::ConfigInvalidValue {
                    key: "roles".to_string(),
                    message: format!("expected label=name, got {pair:?}"),
                });
            };
            let (label, name) = (label.trim(), name.trim());
            if label.is_empty() || name.is_empty() {
                return Err(TurnscribeError::ConfigInvalidValue {
                    key: "roles".to_string(),
                    message: format!("empty label or name in {pair:?}"),
                });
            }
            map = map.with_role(label, name);
        }
        Ok(map)
    }
}

/// Render a segmented result as "Role: text" lines.
///
/// Falls back to the flat transcript when no speaker segmentation was
/// provided, matching the service's behavior for undiarized jobs.
pub fn format_conversation(result: &TranscriptResult, roles: &RoleMap) -> String {
    match &result.conversation {
        Some(turns) => turns
            .iter()
            .map(|turn| format!("{}: {}", roles.resolve(&turn.speaker), turn.text))
            .collect::<Vec<_>>()
            .join("\n"),
        None => result.transcript.clone(),
    }
}
