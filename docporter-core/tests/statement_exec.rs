//! Statement execution tests without requiring a real database.
//!
//! Parse, argument-count, and JSON errors are reported before any driver
//! call, so they resolve instantly even against an unreachable server; the
//! one test that does reach for the network asserts graceful failure.

use docporter_core::{DocPorterError, MongoSource, execute_statement};

const UNREACHABLE_URL: &str =
    "mongodb://127.0.0.1:59999/testdb?serverSelectionTimeoutMS=1000&connectTimeoutMS=1000";

async fn unreachable_db() -> mongodb::Database {
    let source = MongoSource::connect(UNREACHABLE_URL).await.unwrap();
    source.database(None).unwrap()
}

#[tokio::test]
async fn test_malformed_statement_fails_before_any_driver_call() {
    let db = unreachable_db().await;

    let err = execute_statement(&db, "not a statement").await.unwrap_err();
    assert!(matches!(err, DocPorterError::StatementParse { .. }));

    let err = execute_statement(&db, "db.users.find({}").await.unwrap_err();
    assert!(matches!(err, DocPorterError::StatementParse { .. }));
}

#[tokio::test]
async fn test_unknown_method_is_unsupported() {
    let db = unreachable_db().await;

    let err = execute_statement(&db, "db.users.count({})").await.unwrap_err();
    assert!(matches!(
        err,
        DocPorterError::UnsupportedMethod { ref method } if method == "count"
    ));
}

#[tokio::test]
async fn test_update_argument_count_is_checked_before_execution() {
    let db = unreachable_db().await;

    let err = execute_statement(&db, r#"db.users.updateone({"a":1})"#)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocPorterError::ArgumentCount {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let err = execute_statement(&db, r#"db.users.updatemany({}, {}, {})"#)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocPorterError::ArgumentCount {
            expected: 2,
            actual: 3,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_json_argument_is_a_parse_error() {
    let db = unreachable_db().await;

    let err = execute_statement(&db, "db.users.insertone({oops)").await.unwrap_err();
    assert!(matches!(err, DocPorterError::StatementParse { .. }));

    let err = execute_statement(&db, r#"db.users.insertmany({"not":"array"})"#)
        .await
        .unwrap_err();
    assert!(matches!(err, DocPorterError::StatementParse { .. }));
}

#[tokio::test]
async fn test_find_against_unreachable_server_fails_gracefully() {
    let db = unreachable_db().await;

    let result = execute_statement(&db, "db.users.find({})").await;
    assert!(matches!(result, Err(DocPorterError::Execution { .. })));
}
