//! MongoDB connection management.
//!
//! Connection strings are validated before the driver sees them, and
//! credentials never appear in errors or logs — failures carry the
//! redacted form of the URL only.

use super::MongoSource;
use crate::error::{DocPorterError, Result, redact_database_url};
use mongodb::Client;
use mongodb::options::ClientOptions;
use std::time::Duration;
use url::Url;

/// Connection settings extracted from a MongoDB URL.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Server host name
    pub host: String,
    /// Server port (27017 when the URL omits it)
    pub port: Option<u16>,
    /// Database named in the URL path, if any
    pub database: Option<String>,
    /// User name from the URL, if any (the password is never retained)
    pub username: Option<String>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Server selection timeout, bounding how long operations wait for a
    /// reachable server
    pub server_selection_timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: Some(27017),
            database: None,
            username: None,
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }
}

impl MongoSource {
    /// Connects to a deployment described by a MongoDB connection URL.
    ///
    /// The URL must use the `mongodb://` or `mongodb+srv://` scheme and
    /// name a host. `connectTimeoutMS` and `serverSelectionTimeoutMS`
    /// query parameters override the defaults. The driver connects lazily;
    /// use [`MongoSource::test_connection`] to verify reachability.
    pub async fn connect(connection_url: &str) -> Result<Self> {
        let config = parse_source_config(connection_url)?;

        let mut options = ClientOptions::parse(connection_url).await.map_err(|e| {
            DocPorterError::configuration(format!(
                "Failed to parse connection options for {}: {}",
                redact_database_url(connection_url),
                e
            ))
        })?;

        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.server_selection_timeout);
        options.app_name = Some(format!("docporter-{}", env!("CARGO_PKG_VERSION")));

        let client = Client::with_options(options).map_err(DocPorterError::connection_failed)?;

        Ok(Self::from_parts(client, config))
    }

    /// Connection settings this source was created with.
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

/// Parses and validates a MongoDB connection URL.
pub(crate) fn parse_source_config(connection_url: &str) -> Result<SourceConfig> {
    validate_connection_url(connection_url)?;

    let url = Url::parse(connection_url).map_err(|e| {
        DocPorterError::configuration(format!("Invalid MongoDB connection string: {}", e))
    })?;

    let mut config = SourceConfig {
        host: url.host_str().unwrap_or("localhost").to_string(),
        ..SourceConfig::default()
    };

    if let Some(port) = url.port() {
        if port == 0 {
            return Err(DocPorterError::configuration(
                "Invalid port number: must be greater than 0",
            ));
        }
        config.port = Some(port);
    }

    let path = url.path().trim_start_matches('/');
    if !path.is_empty() {
        config.database = Some(path.to_string());
    }

    if !url.username().is_empty() {
        config.username = Some(url.username().to_string());
    }

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "connectTimeoutMS" => {
                if let Ok(timeout_ms) = value.parse::<u64>()
                    && timeout_ms > 0
                    && timeout_ms <= 300_000
                {
                    config.connect_timeout = Duration::from_millis(timeout_ms);
                }
            }
            "serverSelectionTimeoutMS" => {
                if let Ok(timeout_ms) = value.parse::<u64>()
                    && timeout_ms > 0
                    && timeout_ms <= 300_000
                {
                    config.server_selection_timeout = Duration::from_millis(timeout_ms);
                }
            }
            _ => {} // Other parameters are left to the driver
        }
    }

    Ok(config)
}

/// Validates scheme and host of a MongoDB connection URL.
pub(crate) fn validate_connection_url(connection_url: &str) -> Result<()> {
    let url = Url::parse(connection_url).map_err(|e| {
        DocPorterError::configuration(format!("Invalid MongoDB connection string: {}", e))
    })?;

    if !matches!(url.scheme(), "mongodb" | "mongodb+srv") {
        return Err(DocPorterError::configuration(
            "Connection string must use the mongodb:// or mongodb+srv:// scheme",
        ));
    }

    if url.host_str().is_none() {
        return Err(DocPorterError::configuration(
            "Connection string must specify a host",
        ));
    }

    Ok(())
}
