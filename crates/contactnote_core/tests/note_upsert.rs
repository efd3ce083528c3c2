use contactnote_core::db::open_db_in_memory;
use contactnote_core::{
    ContactBook, NewNote, NoteRepository, NoteService, SqliteNoteRepository, Store, SyncConfig,
};

fn book() -> ContactBook {
    ContactBook::new(Store::open_in_memory().unwrap(), SyncConfig::default())
}

#[test]
fn upsert_twice_keeps_single_note_with_latest_text() {
    let book = book();

    let first = book.create_or_update_note(5, "buy milk").unwrap();
    let second = book.create_or_update_note(5, "buy bread").unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.description, "buy bread");
    let notes = book.list_notes().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].contact_id, 5);
    assert_eq!(
        book.find_note_for_contact(5).unwrap().unwrap().description,
        "buy bread"
    );
}

#[test]
fn upsert_creates_independent_notes_per_contact() {
    let book = book();
    book.create_or_update_note(1, "call back").unwrap();
    book.create_or_update_note(2, "birthday in may").unwrap();

    assert_eq!(book.list_notes().unwrap().len(), 2);
    assert_eq!(
        book.find_note_for_contact(1).unwrap().unwrap().description,
        "call back"
    );
    assert_eq!(
        book.find_note_for_contact(2).unwrap().unwrap().description,
        "birthday in may"
    );
}

#[test]
fn delete_for_contact_without_note_is_noop() {
    let book = book();
    book.create_or_update_note(1, "keep me").unwrap();
    let before = book.list_notes().unwrap();

    assert!(!book.delete_note_for_contact(999).unwrap());
    assert_eq!(book.list_notes().unwrap(), before);
}

#[test]
fn delete_for_contact_removes_its_note() {
    let book = book();
    book.create_or_update_note(1, "gone soon").unwrap();
    book.create_or_update_note(2, "stays").unwrap();

    assert!(book.delete_note_for_contact(1).unwrap());
    assert_eq!(book.find_note_for_contact(1).unwrap(), None);
    assert!(book.find_note_for_contact(2).unwrap().is_some());
}

#[test]
fn upsert_updates_oldest_note_when_duplicates_exist() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let oldest = repo.insert_note(&NewNote::new(4, "legacy a")).unwrap();
    repo.insert_note(&NewNote::new(4, "legacy b")).unwrap();

    let service = NoteService::new(repo);
    let saved = service.create_or_update_note(4, "merged").unwrap();

    assert_eq!(saved.id, oldest);
    assert_eq!(saved.description, "merged");
    assert_eq!(service.list_notes().unwrap().len(), 2);
}

#[test]
fn note_service_lists_all_notes() {
    let conn = open_db_in_memory().unwrap();
    let service = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap());
    service.create_or_update_note(1, "a").unwrap();
    service.create_or_update_note(2, "b").unwrap();
    service.create_or_update_note(1, "c").unwrap();

    let descriptions: Vec<String> = service
        .list_notes()
        .unwrap()
        .into_iter()
        .map(|note| note.description)
        .collect();
    assert_eq!(descriptions, vec!["c".to_string(), "b".to_string()]);
}
