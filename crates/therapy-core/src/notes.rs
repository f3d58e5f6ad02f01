//! Therapist progress notes, kept in memory with optional JSON persistence.

use crate::error::{Result, TherapyError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A saved progress note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressNote {
    pub id: u64,
    pub child_id: String,
    pub note_text: String,
    pub emotional_state: Option<String>,
    pub art_engagement: Option<String>,
    pub art_form: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when saving a note.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    #[serde(default)]
    pub child_id: String,
    #[serde(default)]
    pub session_notes: String,
    pub emotional_state: Option<String>,
    pub art_engagement: Option<String>,
    pub art_form: Option<String>,
}

#[derive(Debug)]
pub struct NotesStore {
    notes: Vec<ProgressNote>,
    next_id: u64,
    path: Option<PathBuf>,
}

impl NotesStore {
    /// In-memory store.
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            next_id: 1,
            path: None,
        }
    }

    /// Store backed by a JSON file. Existing notes are loaded if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let notes: Vec<ProgressNote> = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            Vec::new()
        };
        let next_id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        tracing::debug!("Loaded {} notes from {:?}", notes.len(), path);
        Ok(Self {
            notes,
            next_id,
            path: Some(path),
        })
    }

    /// Save a note. Requires a child id and non-blank note text.
    pub fn save(&mut self, new: NewNote, now: DateTime<Utc>) -> Result<&ProgressNote> {
        if new.child_id.is_empty() || new.session_notes.trim().is_empty() {
            return Err(TherapyError::InvalidInput("Missing required fields".into()));
        }

        let note = ProgressNote {
            id: self.next_id,
            child_id: new.child_id,
            note_text: new.session_notes,
            emotional_state: new.emotional_state,
            art_engagement: new.art_engagement,
            art_form: new.art_form.unwrap_or_else(|| "unknown".into()),
            created_at: now,
        };
        self.notes.push(note);
        if let Some(path) = &self.path {
            if let Err(e) = persist(path, &self.notes) {
                self.notes.pop();
                return Err(e);
            }
        }
        self.next_id += 1;

        let saved = &self.notes[self.notes.len() - 1];
        tracing::debug!("Saved note {} for child {}", saved.id, saved.child_id);
        Ok(saved)
    }

    /// Up to `limit` notes for a child, newest first.
    pub fn recent(&self, child_id: &str, limit: usize) -> Vec<&ProgressNote> {
        self.notes
            .iter()
            .rev()
            .filter(|n| n.child_id == child_id)
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl Default for NotesStore {
    fn default() -> Self {
        Self::new()
    }
}

fn persist(path: &Path, notes: &[ProgressNote]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(notes)?;
    std::fs::write(path, json)?;
    Ok(())
}
