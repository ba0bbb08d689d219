//! Application configuration.

use std::path::Path;

use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;

use crate::storage::StorageConfig;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Administrator allow-list.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Photo processing configuration.
    #[serde(default)]
    pub media: MediaSettings,
    /// Legacy import configuration.
    #[serde(default)]
    pub import: ImportConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this portal.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Administrator configuration.
///
/// The identity provider authenticates users; this list decides which of
/// them may open the review workflow.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Email addresses allowed to review nominations.
    #[serde(default = "default_admin_emails")]
    pub emails: Vec<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            emails: default_admin_emails(),
        }
    }
}

/// Photo processing settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MediaSettings {
    /// Bounding box edge for compressed photos, in pixels.
    #[serde(default = "default_max_photo_dimension")]
    pub max_photo_dimension: u32,
    /// JPEG quality used when re-encoding photos (1-100).
    #[serde(default = "default_photo_quality")]
    pub photo_quality: u8,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            max_photo_dimension: default_max_photo_dimension(),
            photo_quality: default_photo_quality(),
        }
    }
}

/// Legacy import settings.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ImportConfig {
    /// Maximum number of writes per atomic batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_admin_emails() -> Vec<String> {
    vec![
        "hod.cse@university.edu".to_string(),
        "dean@university.edu".to_string(),
        "sea.admin@university.edu".to_string(),
    ]
}

const fn default_max_photo_dimension() -> u32 {
    600
}

const fn default_photo_quality() -> u8 {
    80
}

const fn default_batch_size() -> usize {
    500
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `AWARDS_ENV`)
    /// 3. Environment variables with `AWARDS_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("AWARDS_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        Self::build(builder, None)
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(config::File::from(path.as_ref()));
        Self::build(builder, None)
    }

    /// Layer `AWARDS__*` variables over `builder`. `vars` replaces the
    /// process environment when given.
    fn build(
        builder: ConfigBuilder<DefaultState>,
        vars: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        builder
            .add_source(
                config::Environment::with_prefix("AWARDS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("admin.emails")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()?
            .try_deserialize()
    }
}
