use contactnote_core::db::open_db_in_memory;
use contactnote_core::{
    Contact, ContactRepository, NewNote, Note, NoteRepository, SqliteContactRepository,
    SqliteNoteRepository, StorageError,
};
use rusqlite::Connection;

#[test]
fn insert_list_and_get_contacts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    let bob = Contact::new(2, "Bob", "555-0101");
    let alice = Contact::new(1, "Alice", "555-0100");
    assert_eq!(repo.insert_contact(&bob).unwrap(), 2);
    assert_eq!(repo.insert_contact(&alice).unwrap(), 1);

    assert_eq!(repo.list_contacts().unwrap(), vec![alice.clone(), bob]);
    assert_eq!(repo.get_contact(1).unwrap(), Some(alice));
    assert_eq!(repo.get_contact(42).unwrap(), None);
}

#[test]
fn insert_with_existing_id_replaces_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();

    repo.insert_contact(&Contact::new(1, "Alice", "555-0100"))
        .unwrap();
    repo.insert_contact(&Contact::new(1, "Alice Smith", "555-0199"))
        .unwrap();

    assert_eq!(
        repo.list_contacts().unwrap(),
        vec![Contact::new(1, "Alice Smith", "555-0199")]
    );
}

#[test]
fn update_and_delete_report_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    repo.insert_contact(&Contact::new(1, "Alice", "555-0100"))
        .unwrap();

    assert!(repo
        .update_contact(&Contact::new(1, "Alice", "555-0111"))
        .unwrap());
    assert!(!repo
        .update_contact(&Contact::new(9, "Nobody", "000"))
        .unwrap());
    assert_eq!(
        repo.get_contact(1).unwrap().unwrap().phone_number,
        "555-0111"
    );

    assert!(repo.delete_contact(1).unwrap());
    assert!(!repo.delete_contact(1).unwrap());
    assert!(repo.list_contacts().unwrap().is_empty());
}

#[test]
fn note_crud_and_contact_lookup() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first_id = repo.insert_note(&NewNote::new(5, "buy milk")).unwrap();
    let second_id = repo.insert_note(&NewNote::new(6, "call back")).unwrap();
    assert_ne!(first_id, second_id);

    assert_eq!(repo.find_note_id_by_contact_id(5).unwrap(), Some(first_id));
    assert_eq!(repo.find_note_id_by_contact_id(7).unwrap(), None);
    assert_eq!(repo.find_note_by_contact_id(7).unwrap(), None);

    let edited = Note {
        id: first_id,
        description: "buy bread".to_string(),
        contact_id: 5,
    };
    assert!(repo.update_note(&edited).unwrap());
    assert_eq!(repo.find_note_by_contact_id(5).unwrap(), Some(edited));

    assert!(repo.delete_note(second_id).unwrap());
    assert!(!repo.delete_note(second_id).unwrap());
    assert_eq!(repo.list_notes().unwrap().len(), 1);
}

#[test]
fn note_ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let first_id = repo.insert_note(&NewNote::new(1, "one")).unwrap();
    repo.delete_note(first_id).unwrap();
    let second_id = repo.insert_note(&NewNote::new(1, "two")).unwrap();
    assert!(second_id > first_id);
}

#[test]
fn repositories_reject_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    assert!(matches!(
        SqliteContactRepository::try_new(&conn),
        Err(StorageError::MissingRequiredTable("contacts"))
    ));
    assert!(matches!(
        SqliteNoteRepository::try_new(&conn),
        Err(StorageError::MissingRequiredTable("notes"))
    ));
}

#[test]
fn repositories_reject_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, description TEXT);")
        .unwrap();

    assert!(matches!(
        SqliteNoteRepository::try_new(&conn),
        Err(StorageError::MissingRequiredColumn {
            table: "notes",
            column: "contact_id",
        })
    ));
}
