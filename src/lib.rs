// geocode_ingestor/src/lib.rs
// Public API: geocode one CSV column and store every candidate in PostgreSQL.

pub mod cli;
pub mod config;
pub mod error;
pub mod geocode;
pub mod ingestor;
pub mod pipeline;
pub mod postgres;
pub mod schema_builder;
pub mod transform;

pub use pipeline::{ImportPipeline, ImportState};
