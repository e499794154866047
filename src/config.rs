// geocode_ingestor/src/config.rs
// Loads the database and application YAML documents.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{IngestorError, Result};

pub const DB_CONFIG_FILE: &str = "db.yml";
pub const APP_CONFIG_FILE: &str = "config.yml";

/// Connection parameters plus the schema that holds the results table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq,)]
pub struct DbConfig {
    pub host:     String,
    pub port:     u16,
    pub database: String,
    pub schema:   String,
    pub user:     String,
    pub password: String,
}

/// Application secrets.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq,)]
pub struct AppConfig {
    pub google_api_key: String,
    /// Overrides the Google Geocoding endpoint.
    #[serde(default)]
    pub endpoint:       Option<String,>,
}

pub fn load_db_config(path: &Path,) -> Result<DbConfig,> {
    load_yaml(path,)
}

pub fn load_app_config(path: &Path,) -> Result<AppConfig,> {
    load_yaml(path,)
}

/// Returns `explicit` when given, otherwise `file_name` next to the running
/// executable.
pub fn resolve_config_path(explicit: Option<&Path,>, file_name: &str,) -> Result<PathBuf,> {
    if let Some(path,) = explicit {
        return Ok(path.to_path_buf(),);
    }
    let exe = std::env::current_exe().map_err(|e| {
        IngestorError::ConfigurationError(format!("Cannot locate executable directory: {}", e),)
    },)?;
    let dir = exe.parent().ok_or_else(|| {
        IngestorError::ConfigurationError(format!(
            "Executable path has no parent directory: {}",
            exe.display()
        ),)
    },)?;
    Ok(dir.join(file_name,),)
}

fn load_yaml<T: DeserializeOwned,>(path: &Path,) -> Result<T,> {
    debug!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path,).map_err(|e| {
        IngestorError::ConfigurationError(format!("Cannot read {}: {}", path.display(), e),)
    },)?;
    serde_yaml::from_str(&content,).map_err(|e| {
        IngestorError::ConfigurationError(format!("Cannot parse {}: {}", path.display(), e),)
    },)
}
