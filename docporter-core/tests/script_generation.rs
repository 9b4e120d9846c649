//! End-to-end SQL script generation tests over constructed document sets.

use bson::doc;
use docporter_core::schema::{SchemaAnalyzer, SkipFields};
use docporter_core::sql::{SqlDialect, generate_script};

fn generate(dialect: SqlDialect, documents: &[bson::Document], skip: &SkipFields) -> String {
    let mut buf = Vec::new();
    generate_script(&mut buf, dialect, "items", documents, skip).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn test_full_export_round_for_both_dialects() {
    let documents = vec![
        doc! {
            "_id": bson::oid::ObjectId::new(),
            "sku": "A-1",
            "qty": 3_i32,
            "price": 9.99,
            "active": true,
            "createdAt": bson::DateTime::now(),
        },
        doc! {
            "_id": bson::oid::ObjectId::new(),
            "sku": "B-2",
            "qty": 5_000_000_000_i64,
            "active": false,
        },
    ];

    for dialect in [SqlDialect::MsSql, SqlDialect::MySql] {
        let script = generate(dialect, &documents, &SkipFields::default());

        // housekeeping fields never appear
        assert!(!script.contains("_id"));
        assert!(!script.contains("createdAt"));

        // qty widened Int32 -> Int64
        assert!(script.contains("BIGINT"));

        // two INSERT statements, one per document
        assert_eq!(script.matches("INSERT INTO").count(), 2);

        // second document misses price: NULL is substituted
        let second_insert = script.lines().last().unwrap();
        assert!(second_insert.contains("NULL"));
    }
}

#[test]
fn test_column_order_and_synthetic_id() {
    let documents = vec![doc! { "z": 1_i32, "a": 2_i32 }, doc! { "m": 3_i32 }];
    let script = generate(SqlDialect::MySql, &documents, &SkipFields::default());

    let create_start = script.find("CREATE TABLE").unwrap();
    let id_pos = script[create_start..].find("`id`").unwrap();
    let z_pos = script[create_start..].find("`z`").unwrap();
    let a_pos = script[create_start..].find("`a`").unwrap();
    let m_pos = script[create_start..].find("`m`").unwrap();

    // synthetic id first, then first-seen field order
    assert!(id_pos < z_pos);
    assert!(z_pos < a_pos);
    assert!(a_pos < m_pos);
}

#[test]
fn test_mixed_type_field_exports_as_text() {
    let documents = vec![
        doc! { "v": 1_i32 },
        doc! { "v": "forty-two" },
        doc! { "v": 2.5 },
    ];

    let mssql = generate(SqlDialect::MsSql, &documents, &SkipFields::default());
    assert!(mssql.contains("v NVARCHAR(MAX)"));

    let mysql = generate(SqlDialect::MySql, &documents, &SkipFields::default());
    assert!(mysql.contains("`v` TEXT"));
}

#[test]
fn test_custom_skip_fields_replace_defaults() {
    let documents = vec![doc! { "_id": 1_i32, "secret": "s", "name": "n" }];
    let mut skip = SkipFields::none();
    skip.insert("secret");

    let script = generate(SqlDialect::MySql, &documents, &skip);
    // default exclusions no longer apply, custom one does
    assert!(script.contains("`_id`"));
    assert!(!script.contains("secret"));
}

#[test]
fn test_analyzer_and_writer_agree_on_columns() {
    let documents = vec![doc! { "a": 1_i32 }, doc! { "b": "x" }];
    let columns = SchemaAnalyzer::analyze_all(&documents, SkipFields::default());

    let mut buf = Vec::new();
    docporter_core::sql::write_script(
        &mut buf,
        SqlDialect::MsSql,
        "items",
        &documents,
        &columns,
    )
    .unwrap();
    let script = String::from_utf8(buf).unwrap();

    assert!(script.contains("INSERT INTO items (a, b) VALUES (1, NULL);"));
    assert!(script.contains("INSERT INTO items (a, b) VALUES (NULL, N'x');"));
}

#[test]
fn test_empty_collection_produces_empty_script() {
    let script = generate(SqlDialect::MsSql, &[], &SkipFields::default());
    assert!(script.is_empty());
}
