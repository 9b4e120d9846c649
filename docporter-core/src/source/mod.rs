//! MongoDB source access.
//!
//! # Module Structure
//! - `connection`: client construction and connection string validation
//! - `enumeration`: database, collection, and index listing
//!
//! The source is a thin wrapper over the official driver: it resolves a
//! connection URL into a [`mongodb::Client`], answers enumeration queries
//! for the CLI, and fetches documents wholesale for export. All operations
//! it performs itself are read-only; writes only happen through the
//! statement executor.

mod connection;
pub mod enumeration;

pub use connection::SourceConfig;
pub use enumeration::{
    CollectionEntry, CollectionKind, DatabaseEntry, IndexDirection, IndexEntry, IndexKey,
    SYSTEM_DATABASES,
};

use crate::error::{DocPorterError, Result};
use bson::Document;
use mongodb::{Client, Database};

/// Handle to a MongoDB deployment, resolved from a connection URL.
#[derive(Debug, Clone)]
pub struct MongoSource {
    client: Client,
    config: SourceConfig,
}

impl MongoSource {
    pub(crate) fn from_parts(client: Client, config: SourceConfig) -> Self {
        Self { client, config }
    }

    /// Underlying driver client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Database name taken from the connection URL path, if any.
    pub fn default_database(&self) -> Option<&str> {
        self.config.database.as_deref()
    }

    /// Resolves a database name from an explicit choice or the URL default.
    pub fn database_name(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.config.database.clone())
            .ok_or_else(|| {
                DocPorterError::configuration(
                    "No database selected. Pass --database or include one in the \
                     connection URL (mongodb://host:port/database).",
                )
            })
    }

    /// Returns a database handle for an explicit or URL-default database.
    pub fn database(&self, explicit: Option<&str>) -> Result<Database> {
        Ok(self.client.database(&self.database_name(explicit)?))
    }

    /// Verifies the server is reachable by listing database names.
    pub async fn test_connection(&self) -> Result<()> {
        let _ = self
            .client
            .list_database_names()
            .await
            .map_err(DocPorterError::connection_failed)?;
        Ok(())
    }

    /// Lists databases on the server.
    ///
    /// System databases (`admin`, `config`, `local`) are excluded unless
    /// `include_system` is set.
    pub async fn list_databases(&self, include_system: bool) -> Result<Vec<DatabaseEntry>> {
        enumeration::list_databases(&self.client, include_system).await
    }

    /// Lists collections in a database.
    pub async fn list_collections(&self, database: &str) -> Result<Vec<CollectionEntry>> {
        enumeration::list_collections(&self.client, database).await
    }

    /// Lists the indexes of a collection.
    pub async fn list_indexes(&self, database: &str, collection: &str) -> Result<Vec<IndexEntry>> {
        enumeration::list_indexes(&self.client, database, collection).await
    }

    /// Fetches documents from a collection, optionally capped at `limit`.
    pub async fn fetch_documents(
        &self,
        database: &str,
        collection: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Document>> {
        enumeration::fetch_documents(&self.client, database, collection, limit).await
    }
}
