//! Database, collection, and index enumeration.

use crate::error::{DocPorterError, Result};
use bson::{Document, doc};
use mongodb::Client;
use mongodb::results::CollectionType;

/// System databases that are excluded by default when listing databases.
pub const SYSTEM_DATABASES: &[&str] = &["admin", "config", "local"];

/// Information about a database on the server.
#[derive(Debug, Clone)]
pub struct DatabaseEntry {
    /// Database name
    pub name: String,
    /// On-disk size in bytes, when the server reports one
    pub size_bytes: Option<u64>,
    /// Whether this is a system database
    pub is_system: bool,
}

/// Information about a collection in a database.
#[derive(Debug, Clone)]
pub struct CollectionEntry {
    /// Collection name
    pub name: String,
    /// Collection kind (regular, view, timeseries)
    pub kind: CollectionKind,
}

/// Kind of a listed collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Regular collection
    Collection,
    /// Read-only view over another collection
    View,
    /// Time-series collection
    Timeseries,
    /// Kind the driver reported but this tool does not distinguish
    Other,
}

impl From<&CollectionType> for CollectionKind {
    fn from(value: &CollectionType) -> Self {
        match value {
            CollectionType::Collection => Self::Collection,
            CollectionType::View => Self::View,
            CollectionType::Timeseries => Self::Timeseries,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Collection => "collection",
            Self::View => "view",
            Self::Timeseries => "timeseries",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// One index of a collection.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// Index name
    pub name: String,
    /// Indexed keys in definition order
    pub keys: Vec<IndexKey>,
    /// Whether the index enforces uniqueness
    pub unique: bool,
}

/// One key of an index definition.
#[derive(Debug, Clone)]
pub struct IndexKey {
    /// Field path the key covers
    pub field: String,
    /// Sort direction, when the key value is the conventional 1/-1
    pub direction: Option<IndexDirection>,
}

/// Sort direction of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexDirection {
    /// Ascending order (key value 1)
    Ascending,
    /// Descending order (key value -1)
    Descending,
}

/// Returns true if `name` is a known system database.
pub fn is_system_database(name: &str) -> bool {
    SYSTEM_DATABASES.contains(&name)
}

/// Lists databases on the server, filtering system databases by default.
pub async fn list_databases(client: &Client, include_system: bool) -> Result<Vec<DatabaseEntry>> {
    let specs = client
        .list_databases()
        .await
        .map_err(|e| DocPorterError::execution_failed("listDatabases", e))?;

    let mut entries: Vec<DatabaseEntry> = specs
        .into_iter()
        .map(|spec| {
            let is_system = is_system_database(&spec.name);
            DatabaseEntry {
                name: spec.name,
                size_bytes: Some(spec.size_on_disk),
                is_system,
            }
        })
        .filter(|entry| include_system || !entry.is_system)
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!("Listed {} databases", entries.len());
    Ok(entries)
}

/// Lists collections in a database, sorted by name.
pub async fn list_collections(client: &Client, database: &str) -> Result<Vec<CollectionEntry>> {
    let db = client.database(database);
    let mut cursor = db.list_collections().await.map_err(|e| {
        DocPorterError::execution_failed(format!("listCollections on '{}'", database), e)
    })?;

    let mut entries = Vec::new();
    while cursor.advance().await.map_err(|e| {
        DocPorterError::execution_failed(format!("listCollections on '{}'", database), e)
    })? {
        let spec = cursor.deserialize_current().map_err(|e| {
            DocPorterError::execution_failed(format!("listCollections on '{}'", database), e)
        })?;
        entries.push(CollectionEntry {
            name: spec.name,
            kind: CollectionKind::from(&spec.collection_type),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Lists the indexes of a collection.
pub async fn list_indexes(
    client: &Client,
    database: &str,
    collection: &str,
) -> Result<Vec<IndexEntry>> {
    let coll = client.database(database).collection::<Document>(collection);
    let context = || format!("listIndexes on '{}.{}'", database, collection);

    let mut cursor = coll
        .list_indexes()
        .await
        .map_err(|e| DocPorterError::execution_failed(context(), e))?;

    let mut indexes = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| DocPorterError::execution_failed(context(), e))?
    {
        let model = cursor
            .deserialize_current()
            .map_err(|e| DocPorterError::execution_failed(context(), e))?;

        let options = model.options;
        let name = options
            .as_ref()
            .and_then(|o| o.name.clone())
            .unwrap_or_else(|| "unnamed".to_string());
        let unique = options.as_ref().and_then(|o| o.unique).unwrap_or(false);

        let keys = model
            .keys
            .iter()
            .map(|(field, value)| {
                let direction = match value.as_i32() {
                    Some(1) => Some(IndexDirection::Ascending),
                    Some(-1) => Some(IndexDirection::Descending),
                    _ => None,
                };
                IndexKey {
                    field: field.clone(),
                    direction,
                }
            })
            .collect();

        indexes.push(IndexEntry { name, keys, unique });
    }

    Ok(indexes)
}

/// Fetches documents from a collection, optionally capped at `limit`.
pub async fn fetch_documents(
    client: &Client,
    database: &str,
    collection: &str,
    limit: Option<i64>,
) -> Result<Vec<Document>> {
    let coll = client.database(database).collection::<Document>(collection);
    let context = || format!("find on '{}.{}'", database, collection);

    let mut find = coll.find(doc! {});
    if let Some(limit) = limit {
        find = find.limit(limit);
    }

    let mut cursor = find
        .await
        .map_err(|e| DocPorterError::execution_failed(context(), e))?;

    let mut documents = Vec::new();
    while cursor
        .advance()
        .await
        .map_err(|e| DocPorterError::execution_failed(context(), e))?
    {
        documents.push(
            cursor
                .deserialize_current()
                .map_err(|e| DocPorterError::execution_failed(context(), e))?,
        );
    }

    tracing::debug!(
        "Fetched {} documents from '{}.{}'",
        documents.len(),
        database,
        collection
    );
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_database_detection() {
        assert!(is_system_database("admin"));
        assert!(is_system_database("config"));
        assert!(is_system_database("local"));
        assert!(!is_system_database("orders"));
    }

    #[test]
    fn test_collection_kind_display() {
        assert_eq!(CollectionKind::Collection.to_string(), "collection");
        assert_eq!(CollectionKind::View.to_string(), "view");
    }
}
