//! Note collection ownership and persistence.
//!
//! The collection is kept newest-first. Every applied mutation rewrites the
//! full serialized collection under [`NOTES_KEY`]; a failed write leaves the
//! in-memory collection authoritative until the next successful write.

use chrono::{DateTime, Utc};
use log::{error, info, warn};
use std::collections::HashSet;

use crate::database::{KeyValueStore, NOTES_KEY};
use crate::models::{Note, NoteDraft};

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

pub struct NoteStore<S: KeyValueStore> {
    store: S,
    notes: Vec<Note>,
    clock: Clock,
    last_save_error: Option<String>,
}

impl<S: KeyValueStore> NoteStore<S> {
    pub fn load(store: S) -> Self {
        Self::with_clock(store, Box::new(Utc::now))
    }

    pub fn with_clock(store: S, clock: Clock) -> Self {
        let notes = read_notes(&store);
        info!(
            "event=notes_loaded module=notes status=ok count={}",
            notes.len()
        );
        Self {
            store,
            notes,
            clock,
            last_save_error: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn create(&mut self, draft: NoteDraft) -> i64 {
        let now = (self.clock)();
        let id = self.fresh_id(now);

        self.notes.insert(
            0,
            Note {
                id,
                title: draft.title,
                description: draft.description,
                image: draft.image.unwrap_or_default(),
                created_at: now,
                updated_at: now,
            },
        );

        self.save();
        id
    }

    /// Replaces the note in place. Returns `false` when no note has `id`.
    pub fn edit(&mut self, id: i64, draft: NoteDraft) -> bool {
        let now = (self.clock)();
        let Some(note) = self.notes.iter_mut().find(|note| note.id == id) else {
            warn!("event=note_edit module=notes status=missing id={}", id);
            return false;
        };

        note.title = draft.title;
        note.description = draft.description;
        note.image = draft.image.unwrap_or_default();
        note.updated_at = now;

        self.save();
        true
    }

    /// Removes the note with `id`. Absent ids are ignored.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        if self.notes.len() == before {
            return false;
        }

        self.save();
        true
    }

    fn fresh_id(&self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        let Some(max) = self.notes.iter().map(|note| note.id).max() else {
            return candidate;
        };
        if candidate > max {
            return candidate;
        }
        if let Some(next) = max.checked_add(1) {
            return next;
        }

        // The id space above is exhausted, take the nearest free id below.
        let taken: HashSet<i64> = self.notes.iter().map(|note| note.id).collect();
        (i64::MIN..=candidate)
            .rev()
            .find(|id| !taken.contains(id))
            .unwrap_or(candidate)
    }

    fn save(&mut self) {
        let result = serde_json::to_string(&self.notes)
            .map_err(|e| e.to_string())
            .and_then(|json| self.store.set(NOTES_KEY, &json).map_err(|e| e.to_string()));

        match result {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                error!("event=notes_save module=notes status=error error={}", e);
                self.last_save_error = Some(e);
            }
        }
    }
}

fn read_notes<S: KeyValueStore>(store: &S) -> Vec<Note> {
    let raw = match store.get(NOTES_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("event=notes_read module=notes status=error error={}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Note>>(&raw) {
        Ok(notes) => dedup_by_id(notes),
        Err(e) => {
            warn!(
                "event=notes_parse module=notes status=error error={} fallback=empty",
                e
            );
            Vec::new()
        }
    }
}

// First occurrence wins so the collection keeps one note per id.
fn dedup_by_id(mut notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::new();
    notes.retain(|note| seen.insert(note.id));
    notes
}
