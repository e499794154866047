use crate::error::{IngestorError, Result};

pub const RESULTS_TABLE: &str = "results";

const MAX_IDENTIFIER_LEN: usize = 63;

/// SQL for the results table inside one validated schema.
///
/// The schema name is interpolated into DDL, so it is checked once here and
/// never taken verbatim from row data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSchema {
    schema: String,
}

impl ResultsSchema {
    pub fn new(schema: &str) -> Result<Self> {
        validate_identifier(schema)?;
        Ok(Self {
            schema: schema.to_string(),
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema, RESULTS_TABLE)
    }

    pub fn create_schema(&self) -> String {
        format!("CREATE SCHEMA IF NOT EXISTS {};", self.schema)
    }

    pub fn create_table(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (
                raw_string VARCHAR(256),
                geocoded_string VARCHAR(256),
                time TIMESTAMP,
                results JSONB
            );",
            self.qualified_table()
        )
    }

    pub fn create_indexes(&self) -> Vec<String> {
        let table = self.qualified_table();
        vec![
            format!("CREATE INDEX IF NOT EXISTS idx_results_raw_str ON {} (raw_string);", table),
            format!(
                "CREATE INDEX IF NOT EXISTS idx_results_geocoded_str ON {} (geocoded_string);",
                table
            ),
            format!("CREATE INDEX IF NOT EXISTS idx_results_results ON {} USING gin (results);", table),
        ]
    }

    /// Every provisioning statement, in execution order.
    pub fn provisioning_statements(&self) -> Vec<String> {
        let mut statements = vec![self.create_schema(), self.create_table()];
        statements.extend(self.create_indexes());
        statements
    }

    // Explicit VARCHAR(256) casts truncate longer values instead of failing.
    pub fn insert_statement(&self) -> String {
        format!(
            "INSERT INTO {} (raw_string, geocoded_string, time, results) \
             VALUES ($1::VARCHAR(256), $2::VARCHAR(256), $3::TIMESTAMP, $4::JSONB);",
            self.qualified_table()
        )
    }
}

fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest || name.len() > MAX_IDENTIFIER_LEN {
        return Err(IngestorError::ConfigurationError(format!(
            "Invalid schema name '{}': expected a plain SQL identifier of at most {} characters",
            name, MAX_IDENTIFIER_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_statements_for_schema() {
        let schema = ResultsSchema::new("geocoding").unwrap();
        assert_eq!(schema.create_schema(), "CREATE SCHEMA IF NOT EXISTS geocoding;");
        assert!(schema
            .create_table()
            .starts_with("CREATE TABLE IF NOT EXISTS geocoding.results ("));

        let indexes = schema.create_indexes();
        assert_eq!(indexes.len(), 3);
        assert!(indexes[2].contains("USING gin (results)"));

        assert_eq!(
            schema.insert_statement(),
            "INSERT INTO geocoding.results (raw_string, geocoded_string, time, results) \
             VALUES ($1::VARCHAR(256), $2::VARCHAR(256), $3::TIMESTAMP, $4::JSONB);"
        );
    }

    #[test]
    fn provisioning_order_is_schema_table_indexes() {
        let statements = ResultsSchema::new("s").unwrap().provisioning_statements();
        assert_eq!(statements.len(), 5);
        assert!(statements[0].starts_with("CREATE SCHEMA"));
        assert!(statements[1].starts_with("CREATE TABLE"));
        assert!(statements[2..].iter().all(|s| s.starts_with("CREATE INDEX")));
    }

    #[test]
    fn rejects_unsafe_schema_names() {
        let too_long = "a".repeat(64);
        for bad in ["", "1abc", "geo; DROP TABLE x", "geo-coding", "\"quoted\"", too_long.as_str()] {
            assert!(
                matches!(ResultsSchema::new(bad), Err(IngestorError::ConfigurationError(_))),
                "accepted {bad:?}"
            );
        }
        assert!(ResultsSchema::new("_geo_2024").is_ok());
    }
}
