// geocode_ingestor/src/error.rs
// Defines the error type shared by every stage of an import run.

use thiserror::Error;

use crate::geocode::GeocodeError;

/// Every variant is fatal: a run stops on the first one it meets.
#[derive(Debug, Error,)]
pub enum IngestorError {
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String,),
    #[error("Field '{field}' not found in source header (available: {headers:?})")]
    FieldNotFound {
        field:   String,
        headers: Vec<String,>,
    },
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String,),
    #[error("Database specific error: {0}")]
    DatabaseError(String,),
    #[error("Failed to prepare insert statement: {0}")]
    PreparedStatementError(String,),
    #[error("Failed to write geocode result: {0}")]
    StoreWriteError(String,),
    #[error(transparent)]
    Geocode(#[from] GeocodeError,),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error,),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error,),
}

pub type Result<T,> = std::result::Result<T, IngestorError,>;
