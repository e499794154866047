// geocode_ingestor/src/ingestor.rs
// The storage seam of an import run and the row it persists.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::Result;

/// One persisted candidate.
#[derive(Debug, Clone, PartialEq,)]
pub struct GeocodeRecord {
    /// Value read from the source file, before any transform.
    pub raw_string:      String,
    /// Value sent to the geocoding API.
    pub geocoded_string: String,
    /// When the API call that produced this candidate completed.
    pub timestamp:       NaiveDateTime,
    pub result:          serde_json::Value,
}

/// Destination for geocode results.
#[async_trait]
pub trait ResultStore: Send {
    /// Creates the schema, results table and indexes if they are missing.
    async fn provision(&mut self,) -> Result<(),>;

    /// Compiles the insert statement. Calling it again keeps the first one.
    async fn prepare_insert(&mut self,) -> Result<(),>;

    /// Writes one record with the prepared statement.
    async fn insert(&mut self, record: &GeocodeRecord,) -> Result<(),>;
}
