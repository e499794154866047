// geocode_ingestor/src/pipeline.rs
// Drives one import: provision, read rows, geocode, persist every candidate.

use std::path::Path;

use chrono::Local;
use tracing::{debug, error, info};

use crate::error::{IngestorError, Result};
use crate::geocode::Geocoder;
use crate::ingestor::{GeocodeRecord, ResultStore};
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum ImportState {
    NotStarted,
    Provisioning,
    Importing,
    Done,
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq,)]
pub struct ImportCounters {
    pub rows_read:    usize,
    pub rows_skipped: usize,
    pub api_calls:    usize,
    pub inserts:      usize,
}

/// Some encodings leave a byte-order mark (or similar) in front of the first
/// header name.
pub fn clean_header(header: &str,) -> &str {
    header.trim_start_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '_'),)
}

pub struct ImportPipeline<S, G,> {
    store:    S,
    geocoder: G,
    state:    ImportState,
    counters: ImportCounters,
}

impl<S: ResultStore, G: Geocoder,> ImportPipeline<S, G,> {
    pub fn new(store: S, geocoder: G,) -> Self {
        Self {
            store,
            geocoder,
            state: ImportState::NotStarted,
            counters: ImportCounters::default(),
        }
    }

    pub fn state(&self,) -> ImportState {
        self.state
    }

    pub fn counters(&self,) -> ImportCounters {
        self.counters
    }

    pub fn store(&self,) -> &S {
        &self.store
    }

    pub fn geocoder(&self,) -> &G {
        &self.geocoder
    }

    /// Geocodes `field_name` of every row in `source_path`.
    ///
    /// Stops at the first error. Rows written before it stay in the store.
    pub async fn run(
        &mut self,
        source_path: &Path,
        field_name: &str,
        transform: Option<&Transform,>,
    ) -> Result<(),> {
        match self.run_inner(source_path, field_name, transform,).await {
            Ok((),) => {
                self.state = ImportState::Done;
                let c = self.counters;
                info!(
                    "Import of {} finished: {} rows read, {} skipped, {} API calls, {} results stored",
                    source_path.display(),
                    c.rows_read,
                    c.rows_skipped,
                    c.api_calls,
                    c.inserts
                );
                Ok((),)
            },
            Err(e,) => {
                self.state = ImportState::Failed;
                error!(
                    "Import of {} aborted after {} rows: {}",
                    source_path.display(),
                    self.counters.rows_read,
                    e
                );
                Err(e,)
            },
        }
    }

    async fn run_inner(
        &mut self,
        source_path: &Path,
        field_name: &str,
        transform: Option<&Transform,>,
    ) -> Result<(),> {
        self.state = ImportState::Provisioning;
        self.store.provision().await?;
        self.store.prepare_insert().await?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true,)
            .flexible(true,)
            .from_path(source_path,)?;

        let headers: Vec<String,> = reader
            .headers()?
            .iter()
            .map(|h| clean_header(h,).to_string(),)
            .collect();
        let index = headers.iter().position(|h| h == field_name,).ok_or_else(|| {
            IngestorError::FieldNotFound {
                field:   field_name.to_string(),
                headers: headers.clone(),
            }
        },)?;

        self.state = ImportState::Importing;
        info!(
            "Importing column '{}' (index {}) from {}",
            field_name,
            index,
            source_path.display()
        );

        for row in reader.records() {
            let row = row?;
            self.counters.rows_read += 1;

            let raw = match row.get(index,) {
                Some(value,) if !value.is_empty() => value,
                _ => {
                    debug!("Row {}: empty '{}', skipping", self.counters.rows_read, field_name);
                    self.counters.rows_skipped += 1;
                    continue;
                },
            };

            let query = match transform {
                Some(f,) => f(raw,),
                None => raw.to_string(),
            };

            self.counters.api_calls += 1;
            let candidates = self.geocoder.geocode(&query,).await?;
            debug!(
                "Row {}: '{}' -> {} candidates",
                self.counters.rows_read,
                query,
                candidates.len()
            );

            for candidate in candidates {
                let record = GeocodeRecord {
                    raw_string:      raw.to_string(),
                    geocoded_string: query.clone(),
                    timestamp:       Local::now().naive_local(),
                    result:          candidate,
                };
                self.store.insert(&record,).await?;
                self.counters.inserts += 1;
            }
        }

        Ok((),)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(clean_header("\u{feff}Address"), "Address");
    }

    #[test]
    fn strips_any_leading_non_word_characters() {
        assert_eq!(clean_header("\u{ef}\u{bb}\u{bf}Name"), "Name");
        assert_eq!(clean_header("  #_id"), "_id");
        assert_eq!(clean_header("Zip Code"), "Zip Code");
    }

    #[test]
    fn all_non_word_header_becomes_empty() {
        assert_eq!(clean_header("***"), "");
    }
}
