//! Content catalog: avatars and quiz sets keyed by id.
//!
//! Populated from built-in definitions at startup and grown by merging
//! imported bundles. Merge is first-write-wins per id, so importing the same
//! bundle twice is a no-op.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// An unlockable player avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub id: String,
    pub emoji: String,
    #[serde(default)]
    pub name: String,
    /// Shop price in coins; 0 means not sold (default avatar or pack reward).
    #[serde(default)]
    pub cost: u64,
    /// Pack the avatar ships in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices`. Semantic correctness is not validated.
    pub answer: usize,
}

/// An ordered set of questions playable as one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub questions: Vec<Question>,
}

/// The import/export document shape: exactly two top-level arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    pub avatars: Vec<Avatar>,
    #[serde(rename = "quizSets")]
    pub quiz_sets: Vec<QuizSet>,
}

impl ContentBundle {
    /// Parse an imported file.
    ///
    /// Unparsable JSON is `Unreadable`; JSON that parses but lacks either
    /// top-level array is `InvalidFormat`. Validation happens before any
    /// catalog mutation, so a rejected file changes nothing.
    pub fn from_json(text: &str) -> GameResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| GameError::Unreadable(e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| GameError::InvalidFormat("top level is not an object".to_string()))?;
        for field in ["avatars", "quizSets"] {
            if !object.get(field).is_some_and(|v| v.is_array()) {
                return Err(GameError::InvalidFormat(format!("missing `{field}` array")));
            }
        }

        serde_json::from_value(value).map_err(|e| GameError::InvalidFormat(e.to_string()))
    }

    /// Pretty-printed JSON for the downloadable export file.
    pub fn to_json_pretty(&self) -> GameResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::Persistence(e.to_string()))
    }
}

/// Counts from one `merge_bundle` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub avatars_added: usize,
    pub avatars_skipped: usize,
    pub quiz_sets_added: usize,
    pub quiz_sets_skipped: usize,
}

impl MergeReport {
    /// Total entries added across both collections.
    pub fn added(&self) -> usize {
        self.avatars_added + self.quiz_sets_added
    }

    /// Total duplicate entries skipped across both collections.
    pub fn skipped(&self) -> usize {
        self.avatars_skipped + self.quiz_sets_skipped
    }

    /// True when the merge changed nothing (e.g. re-importing a bundle).
    pub fn is_noop(&self) -> bool {
        self.added() == 0
    }
}

/// The live catalog: ordered entries plus an id index per collection.
///
/// Entries are never removed or overwritten; registration order is the
/// display order.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    avatars: Vec<Avatar>,
    avatar_index: HashMap<String, usize>,
    quiz_sets: Vec<QuizSet>,
    quiz_set_index: HashMap<String, usize>,
}

impl ContentCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a validated bundle, first-write-wins per id.
    ///
    /// Never fails per-entry: every entry is either appended (new id) or
    /// silently skipped (id already present, existing entry untouched).
    pub fn merge_bundle(&mut self, bundle: ContentBundle) -> MergeReport {
        let mut report = MergeReport::default();

        for avatar in bundle.avatars {
            if self.avatar_index.contains_key(&avatar.id) {
                report.avatars_skipped += 1;
            } else {
                self.avatar_index.insert(avatar.id.clone(), self.avatars.len());
                self.avatars.push(avatar);
                report.avatars_added += 1;
            }
        }

        for quiz_set in bundle.quiz_sets {
            if self.quiz_set_index.contains_key(&quiz_set.id) {
                report.quiz_sets_skipped += 1;
            } else {
                self.quiz_set_index
                    .insert(quiz_set.id.clone(), self.quiz_sets.len());
                self.quiz_sets.push(quiz_set);
                report.quiz_sets_added += 1;
            }
        }

        report
    }

    /// Full catalog content in the shape `merge_bundle` accepts.
    ///
    /// Round trip: merging the export into a fresh catalog reproduces it;
    /// merging it back into this catalog adds nothing.
    pub fn export_bundle(&self) -> ContentBundle {
        ContentBundle {
            avatars: self.avatars.clone(),
            quiz_sets: self.quiz_sets.clone(),
        }
    }

    pub fn avatar(&self, id: &str) -> Option<&Avatar> {
        self.avatar_index.get(id).map(|&i| &self.avatars[i])
    }

    pub fn quiz_set(&self, id: &str) -> Option<&QuizSet> {
        self.quiz_set_index.get(id).map(|&i| &self.quiz_sets[i])
    }

    /// Avatars in registration order.
    pub fn avatars(&self) -> &[Avatar] {
        &self.avatars
    }

    /// Quiz sets in registration order.
    pub fn quiz_sets(&self) -> &[QuizSet] {
        &self.quiz_sets
    }
}
