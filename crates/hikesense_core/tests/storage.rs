use hikesense_core::{
    score, RepoError, Response, ResponseStorage, SentimentResult, SqliteResponseStorage,
};
use rusqlite::Connection;
use uuid::Uuid;

#[test]
fn insert_and_fetch_roundtrip() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let response = Response::new("first", score("I love hiking").unwrap());

    storage.insert(&response).unwrap();

    assert_eq!(storage.fetch_all().unwrap(), vec![response]);
    assert_eq!(storage.count().unwrap(), 1);
}

#[test]
fn update_replaces_all_scored_fields() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let response = Response::new("draft", SentimentResult::from_score(0.6));
    storage.insert(&response).unwrap();

    let edited = response.rescored("edited", SentimentResult::from_score(-0.3));
    storage.update(&edited).unwrap();

    assert_eq!(storage.fetch_all().unwrap(), vec![edited]);
}

#[test]
fn update_keeps_insertion_order() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let older = Response::new("older", SentimentResult::NEUTRAL);
    let newer = Response::new("newer", SentimentResult::NEUTRAL);
    storage.insert(&older).unwrap();
    storage.insert(&newer).unwrap();

    storage
        .update(&older.rescored("older, edited", SentimentResult::from_score(0.5)))
        .unwrap();

    let ids: Vec<Uuid> = storage
        .fetch_all()
        .unwrap()
        .iter()
        .map(|response| response.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[test]
fn update_not_found_returns_not_found() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let response = Response::new("missing", SentimentResult::NEUTRAL);

    let err = storage.update(&response).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == response.id));
}

#[test]
fn delete_reports_whether_row_existed() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let response = Response::new("bye", SentimentResult::NEUTRAL);
    storage.insert(&response).unwrap();

    assert!(storage.delete(response.id).unwrap());
    assert!(!storage.delete(response.id).unwrap());
    assert!(storage.fetch_all().unwrap().is_empty());
}

#[test]
fn duplicate_id_insert_is_rejected() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let response = Response::new("once", SentimentResult::NEUTRAL);
    storage.insert(&response).unwrap();

    let err = storage.insert(&response).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn invalid_response_is_rejected_before_write() {
    let storage = SqliteResponseStorage::open_in_memory().unwrap();
    let mut response = Response::new("broken", SentimentResult::NEUTRAL);
    response.score = f64::INFINITY;

    let err = storage.insert(&response).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(storage.count().unwrap(), 0);
}

#[test]
fn invalid_persisted_uuid_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    let storage = SqliteResponseStorage::open(&path).unwrap();
    drop(storage);

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO responses (id, text, score, confidence) VALUES ('not-a-uuid', 'x', 0.0, 0.0);",
        [],
    )
    .unwrap();
    drop(conn);

    let storage = SqliteResponseStorage::open(&path).unwrap();
    let err = storage.fetch_all().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn file_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hikesense.db");
    let response = Response::new("durable", SentimentResult::from_score(0.4));

    let storage = SqliteResponseStorage::open(&path).unwrap();
    storage.insert(&response).unwrap();
    drop(storage);

    let reopened = SqliteResponseStorage::open(&path).unwrap();
    assert_eq!(reopened.fetch_all().unwrap(), vec![response]);
}
