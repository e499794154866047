use async_trait::async_trait;
use tokio_postgres::{Client, Config as TokioPgConfig, NoTls, Statement};
use tracing::{debug, error, info};

use crate::config::DbConfig;
use crate::error::{IngestorError, Result};
use crate::ingestor::{GeocodeRecord, ResultStore};
use crate::schema_builder::ResultsSchema;

/// Results store backed by a single PostgreSQL connection.
pub struct PostgresStore {
    client: Client,
    schema: ResultsSchema,
    insert: Option<Statement,>,
}

impl PostgresStore {
    pub async fn connect(config: &DbConfig,) -> Result<Self,> {
        let schema = ResultsSchema::new(&config.schema,)?;

        let mut pg_config = TokioPgConfig::new();
        pg_config
            .host(&config.host,)
            .port(config.port,)
            .dbname(&config.database,)
            .user(&config.user,)
            .password(&config.password,);

        let (client, connection,) = pg_config.connect(NoTls,).await.map_err(|e| {
            IngestorError::ConnectionError(format!(
                "{}@{}:{}/{}: {}",
                config.user, config.host, config.port, config.database, e
            ),)
        },)?;

        tokio::spawn(async move {
            if let Err(e,) = connection.await {
                error!("PostgreSQL connection closed with error: {}", e);
            }
        },);

        info!(
            "Connected to PostgreSQL at {}:{}/{}",
            config.host, config.port, config.database
        );
        Ok(PostgresStore { client, schema, insert: None, },)
    }

    pub fn schema(&self,) -> &ResultsSchema {
        &self.schema
    }

    /// Underlying connection.
    pub fn client(&self,) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ResultStore for PostgresStore {
    async fn provision(&mut self,) -> Result<(),> {
        for statement in self.schema.provisioning_statements() {
            debug!("Executing: {}", statement);
            self.client
                .batch_execute(&statement,)
                .await
                .map_err(|e| IngestorError::DatabaseError(e.to_string(),),)?;
        }
        info!("Provisioned table {}", self.schema.qualified_table());
        Ok((),)
    }

    async fn prepare_insert(&mut self,) -> Result<(),> {
        if self.insert.is_some() {
            return Ok((),);
        }
        let statement = self
            .client
            .prepare(&self.schema.insert_statement(),)
            .await
            .map_err(|e| IngestorError::PreparedStatementError(e.to_string(),),)?;
        self.insert = Some(statement,);
        Ok((),)
    }

    async fn insert(&mut self, record: &GeocodeRecord,) -> Result<(),> {
        let statement = self.insert.as_ref().ok_or_else(|| {
            IngestorError::StoreWriteError("insert statement has not been prepared".to_string(),)
        },)?;
        self.client
            .execute(
                statement,
                &[
                    &record.raw_string,
                    &record.geocoded_string,
                    &record.timestamp,
                    &record.result,
                ],
            )
            .await
            .map_err(|e| IngestorError::StoreWriteError(e.to_string(),),)?;
        Ok((),)
    }
}
