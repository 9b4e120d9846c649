//! Statement dispatch and result shaping.

use super::parser::{Method, ParsedStatement, parse_statement, split_args};
use crate::error::{DocPorterError, Result};
use bson::{Bson, Document};
use mongodb::{Cursor, Database};
use std::collections::BTreeSet;

/// Maximum number of documents returned by a `find` statement.
pub const FIND_LIMIT: i64 = 1000;

/// Result of executing one native statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    /// Documents returned by `find` or `aggregate`, rendered tabularly
    Documents(TabularResult),
    /// Count of documents removed by `deleteone`/`deletemany`
    Deleted {
        /// Number of documents removed
        count: u64,
    },
    /// Counts reported by `updateone`/`updatemany`
    Updated {
        /// Number of documents the filter matched
        matched: u64,
        /// Number of documents actually modified
        modified: u64,
    },
    /// Count of documents inserted by `insertone`/`insertmany`
    Inserted {
        /// Number of documents inserted
        count: u64,
    },
}

/// Documents rendered as ordered columns and string-valued rows.
///
/// The column set is the union of all field names across the returned
/// documents, sorted lexicographically; each row supplies the empty string
/// for fields the document lacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularResult {
    /// Column headers in lexicographic order
    pub columns: Vec<String>,
    /// One row of rendered cell values per document, in result order
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    /// Builds a tabular rendering of a document sequence.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut fields = BTreeSet::new();
        for doc in documents {
            for (name, _) in doc {
                fields.insert(name.clone());
            }
        }
        let columns: Vec<String> = fields.into_iter().collect();

        let rows = documents
            .iter()
            .map(|doc| {
                columns
                    .iter()
                    .map(|column| doc.get(column).map(render_plain).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Returns true if no documents were rendered.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders a BSON value as plain display text.
///
/// Strings render unquoted, object ids as their hex form, datetimes as
/// RFC 3339; containers and exotic types fall back to their shell-style
/// serialization.
pub fn render_plain(value: &Bson) -> String {
    match value {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Double(d) => d.to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Null => "null".to_string(),
        Bson::DateTime(dt) => dt.to_chrono().to_rfc3339(),
        other => other.to_string(),
    }
}

/// Parses and executes one native statement against `db`.
///
/// Exactly one driver call is issued per invocation; parse and
/// argument-count errors are reported before anything reaches the server.
pub async fn execute_statement(db: &Database, input: &str) -> Result<StatementOutcome> {
    let statement = parse_statement(input)?;
    execute_parsed(db, &statement).await
}

/// Executes an already-parsed statement against `db`.
pub async fn execute_parsed(db: &Database, statement: &ParsedStatement) -> Result<StatementOutcome> {
    let collection = db.collection::<Document>(&statement.collection);
    let name = statement.collection.as_str();

    match statement.method {
        Method::Find => {
            let filter = parse_filter_or_empty(&statement.raw_args)?;
            let cursor = collection
                .find(filter)
                .limit(FIND_LIMIT)
                .await
                .map_err(|e| execution_error("find", name, e))?;
            let docs = collect_documents(cursor, "find", name).await?;
            Ok(StatementOutcome::Documents(TabularResult::from_documents(
                &docs,
            )))
        }
        Method::DeleteOne | Method::DeleteMany => {
            let filter = parse_filter_or_empty(&statement.raw_args)?;
            let result = match statement.method {
                Method::DeleteOne => collection.delete_one(filter).await,
                _ => collection.delete_many(filter).await,
            }
            .map_err(|e| execution_error(statement.method.name(), name, e))?;
            Ok(StatementOutcome::Deleted {
                count: result.deleted_count,
            })
        }
        Method::UpdateOne | Method::UpdateMany => {
            let args = split_args(&statement.raw_args);
            if args.len() != 2 {
                return Err(DocPorterError::argument_count(
                    statement.method.name(),
                    2,
                    args.len(),
                ));
            }
            let filter = parse_document(&args[0])?;
            let update = parse_document(&args[1])?;
            let result = match statement.method {
                Method::UpdateOne => collection.update_one(filter, update).await,
                _ => collection.update_many(filter, update).await,
            }
            .map_err(|e| execution_error(statement.method.name(), name, e))?;
            Ok(StatementOutcome::Updated {
                matched: result.matched_count,
                modified: result.modified_count,
            })
        }
        Method::InsertOne => {
            let doc = parse_document(&statement.raw_args)?;
            collection
                .insert_one(doc)
                .await
                .map_err(|e| execution_error("insertone", name, e))?;
            Ok(StatementOutcome::Inserted { count: 1 })
        }
        Method::InsertMany => {
            let docs = parse_document_array(&statement.raw_args)?;
            let count = docs.len() as u64;
            collection
                .insert_many(docs)
                .await
                .map_err(|e| execution_error("insertmany", name, e))?;
            Ok(StatementOutcome::Inserted { count })
        }
        Method::Aggregate => {
            let stages = parse_document_array(&statement.raw_args)?;
            let cursor = collection
                .aggregate(stages)
                .await
                .map_err(|e| execution_error("aggregate", name, e))?;
            let docs = collect_documents(cursor, "aggregate", name).await?;
            Ok(StatementOutcome::Documents(TabularResult::from_documents(
                &docs,
            )))
        }
    }
}

/// Parses a filter argument, defaulting to the match-all filter when blank.
fn parse_filter_or_empty(raw: &str) -> Result<Document> {
    let raw = raw.trim();
    if raw.is_empty() {
        Ok(Document::new())
    } else {
        parse_document(raw)
    }
}

/// Parses one JSON document argument.
fn parse_document(text: &str) -> Result<Document> {
    serde_json::from_str::<Document>(text)
        .map_err(|e| DocPorterError::statement_parse(format!("invalid document argument: {}", e)))
}

/// Parses a JSON array-of-documents argument.
fn parse_document_array(text: &str) -> Result<Vec<Document>> {
    serde_json::from_str::<Vec<Document>>(text).map_err(|e| {
        DocPorterError::statement_parse(format!("invalid document array argument: {}", e))
    })
}

async fn collect_documents(
    mut cursor: Cursor<Document>,
    operation: &str,
    collection: &str,
) -> Result<Vec<Document>> {
    let mut docs = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| execution_error(operation, collection, e))?
    {
        docs.push(
            cursor
                .deserialize_current()
                .map_err(|e| execution_error(operation, collection, e))?,
        );
    }
    Ok(docs)
}

fn execution_error<E>(operation: &str, collection: &str, error: E) -> DocPorterError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DocPorterError::execution_failed(format!("{} on '{}'", operation, collection), error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn test_tabular_columns_are_sorted_union() {
        let docs = vec![
            doc! { "zeta": 1, "alpha": "x" },
            doc! { "mid": true },
        ];
        let table = TabularResult::from_documents(&docs);
        assert_eq!(table.columns, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_tabular_missing_fields_render_empty() {
        let docs = vec![doc! { "a": 1 }, doc! { "b": "x" }];
        let table = TabularResult::from_documents(&docs);
        assert_eq!(table.rows, vec![
            vec!["1".to_string(), String::new()],
            vec![String::new(), "x".to_string()],
        ]);
    }

    #[test]
    fn test_tabular_empty_document_set() {
        let table = TabularResult::from_documents(&[]);
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_render_plain_scalars() {
        assert_eq!(render_plain(&Bson::String("x".to_string())), "x");
        assert_eq!(render_plain(&Bson::Int32(7)), "7");
        assert_eq!(render_plain(&Bson::Int64(-3)), "-3");
        assert_eq!(render_plain(&Bson::Double(2.5)), "2.5");
        assert_eq!(render_plain(&Bson::Boolean(true)), "true");
        assert_eq!(render_plain(&Bson::Null), "null");
    }

    #[test]
    fn test_render_plain_object_id_is_hex() {
        let oid = ObjectId::new();
        assert_eq!(render_plain(&Bson::ObjectId(oid)), oid.to_hex());
    }

    #[test]
    fn test_parse_filter_defaults_to_match_all() {
        assert_eq!(parse_filter_or_empty("").unwrap(), Document::new());
        assert_eq!(parse_filter_or_empty("   ").unwrap(), Document::new());
    }

    #[test]
    fn test_parse_document_surfaces_json_error() {
        let err = parse_document("{not json").unwrap_err();
        assert!(matches!(err, DocPorterError::StatementParse { .. }));
        assert!(err.to_string().contains("invalid document argument"));
    }

    #[test]
    fn test_parse_document_array() {
        let docs = parse_document_array(r#"[{"a":1},{"a":2}]"#).unwrap();
        assert_eq!(docs.len(), 2);

        let err = parse_document_array(r#"{"a":1}"#).unwrap_err();
        assert!(matches!(err, DocPorterError::StatementParse { .. }));
    }
}
