use recycle_guide_core::db::{open_db, open_db_in_memory};
use recycle_guide_core::{
    CollectionPath, DocumentStore, Fields, MemoryDocumentStore, SqliteDocumentStore, StoreError,
};
use serde_json::json;

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().unwrap()
}

/// Shared behavior every backend must provide.
fn exercise_store(store: &dyn DocumentStore) {
    let guides = CollectionPath::root("guides");
    let items = guides.child("plastic", "items");

    assert!(store.get_collection(&guides).unwrap().is_empty());
    assert!(store.get_document(&guides, "plastic").unwrap().is_none());

    store
        .set_document(&guides, "plastic", fields(json!({"material": "plastic"})))
        .unwrap();
    store
        .set_document(&guides, "glass", fields(json!({"material": "glass"})))
        .unwrap();
    store
        .set_document(
            &items,
            "bottle",
            fields(json!({"item": "bottle", "guideline": "rinse"})),
        )
        .unwrap();

    assert_eq!(store.get_collection(&guides).unwrap(), vec!["glass", "plastic"]);
    assert_eq!(store.get_collection(&items).unwrap(), vec!["bottle"]);

    let hits = store.query_by_field(&guides, "material", "glass").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "glass");
    assert!(store
        .query_by_field(&guides, "material", "metal")
        .unwrap()
        .is_empty());
    assert!(store
        .query_by_field(&guides, "missing_field", "glass")
        .unwrap()
        .is_empty());

    store
        .set_document(
            &items,
            "bottle",
            fields(json!({"item": "bottle", "guideline": "crush"})),
        )
        .unwrap();
    let bottle = store.get_document(&items, "bottle").unwrap().unwrap();
    assert_eq!(bottle.str_field("guideline"), Some("crush"));
    assert_eq!(store.get_collection(&items).unwrap().len(), 1);

    store.delete_document(&items, "bottle").unwrap();
    store.delete_document(&items, "bottle").unwrap();
    assert!(store.get_collection(&items).unwrap().is_empty());
    assert_eq!(store.get_collection(&guides).unwrap().len(), 2);

    let err = store
        .set_document(&guides, "a/b", fields(json!({"material": "a/b"})))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey(key) if key == "a/b"));

    for field in ["", "say\"hi", "x\") OR 1=1 --"] {
        let err = store.query_by_field(&guides, field, "glass").unwrap_err();
        assert!(matches!(err, StoreError::InvalidField(name) if name == field));
    }
}

#[test]
fn sqlite_store_satisfies_document_contract() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    exercise_store(&store);
}

#[test]
fn memory_store_satisfies_document_contract() {
    exercise_store(&MemoryDocumentStore::new());
}

#[test]
fn sqlite_collections_do_not_leak_into_each_other() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let guides = CollectionPath::root("guides");

    store
        .set_document(
            &guides.child("plastic", "items"),
            "bottle",
            fields(json!({"item": "bottle"})),
        )
        .unwrap();

    assert!(store
        .get_collection(&guides.child("glass", "items"))
        .unwrap()
        .is_empty());
    assert!(store.get_collection(&guides).unwrap().is_empty());
}

#[test]
fn sqlite_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guide.db");
    let guides = CollectionPath::root("guides");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteDocumentStore::try_new(&conn).unwrap();
        store
            .set_document(&guides, "paper", fields(json!({"material": "paper"})))
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let paper = store.get_document(&guides, "paper").unwrap().unwrap();
    assert_eq!(paper.str_field("material"), Some("paper"));
}

#[test]
fn sqlite_read_rejects_corrupt_document() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO documents (collection, doc_key, fields) VALUES ('guides', 'odd', '[1, 2]');",
        [],
    )
    .unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();

    let err = store
        .get_document(&CollectionPath::root("guides"), "odd")
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn sqlite_query_matches_field_names_with_path_syntax() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::try_new(&conn).unwrap();
    let guides = CollectionPath::root("guides");

    store
        .set_document(&guides, "tin", fields(json!({"bin.colour": "yellow", "bin": "grey"})))
        .unwrap();

    let hits = store.query_by_field(&guides, "bin.colour", "yellow").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key, "tin");
    assert!(store.query_by_field(&guides, "bin", "yellow").unwrap().is_empty());
}
