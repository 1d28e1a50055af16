use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;

use mapnotes::database::{KeyValueStore, NOTES_KEY, SqliteStore};
use mapnotes::models::{Note, NoteDraft};
use mapnotes::notes::NoteStore;

fn ticking_clock() -> Box<dyn Fn() -> DateTime<Utc>> {
    let seconds = Rc::new(Cell::new(1_700_000_000_i64));
    Box::new(move || {
        let now = Utc.timestamp_opt(seconds.get(), 0).unwrap();
        seconds.set(seconds.get() + 60);
        now
    })
}

fn draft(title: &str, description: &str, image: Option<&str>) -> NoteDraft {
    NoteDraft {
        title: title.into(),
        description: description.into(),
        image: image.map(str::to_owned),
    }
}

fn stored_notes(store: &SqliteStore) -> Vec<Note> {
    let raw = store.get(NOTES_KEY).unwrap().expect("notes key written");
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn store_mirrors_collection_after_every_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("notes.db")).unwrap();
    let mut notes = NoteStore::with_clock(&store, ticking_clock());

    let a = notes.create(draft("A", "first", None));
    assert_eq!(stored_notes(&store), notes.notes());

    let b = notes.create(draft("B", "second", None));
    assert_eq!(stored_notes(&store), notes.notes());

    let titles: Vec<&str> = notes.notes().iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, ["B", "A"]);
    for note in notes.notes() {
        assert!(note.image.is_empty());
        assert_eq!(note.created_at, note.updated_at);
    }

    assert!(notes.delete(a));
    assert_eq!(stored_notes(&store), notes.notes());
    assert_eq!(notes.len(), 1);
    assert_eq!(notes.notes()[0].id, b);
}

#[test]
fn edit_keeps_identity_and_position() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("notes.db")).unwrap();
    let mut notes = NoteStore::with_clock(&store, ticking_clock());

    let a = notes.create(draft("A", "first", Some("data:image/png;base64,AAAA")));
    notes.create(draft("B", "second", None));
    let before = notes.get(a).cloned().unwrap();

    assert!(notes.edit(a, draft("A2", "changed", Some("data:image/png;base64,AAAA"))));

    let after = notes.get(a).unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.title, "A2");
    assert_eq!(after.image, "data:image/png;base64,AAAA");
    assert_eq!(notes.notes()[1].id, a);
    assert_eq!(stored_notes(&store), notes.notes());
}

#[test]
fn deleting_unknown_id_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("notes.db")).unwrap();
    let mut notes = NoteStore::with_clock(&store, ticking_clock());
    notes.create(draft("A", "first", None));
    let snapshot = store.get(NOTES_KEY).unwrap();

    assert!(!notes.delete(42));
    assert_eq!(notes.len(), 1);
    assert_eq!(store.get(NOTES_KEY).unwrap(), snapshot);
}

#[test]
fn unreadable_stored_value_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(&dir.path().join("notes.db")).unwrap();
    store.set(NOTES_KEY, "{not json").unwrap();

    let notes = NoteStore::load(&store);
    assert!(notes.is_empty());
}

#[test]
fn reopening_database_restores_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let created = {
        let mut notes = NoteStore::with_clock(SqliteStore::open(&path).unwrap(), ticking_clock());
        notes.create(draft("Trip", "Paris", None));
        notes.create(draft("Lunch", "Cafe", None));
        notes.notes().to_vec()
    };

    let reopened = NoteStore::load(SqliteStore::open(&path).unwrap());
    assert_eq!(reopened.notes(), created.as_slice());
}
