// geocode_ingestor/src/main.rs
// Entry point for the geocode-ingestor CLI.

use clap::Parser;
use geocode_ingestor::cli::{Cli, Commands, ConfigArgs, ImportArgs};
use geocode_ingestor::config::{
    APP_CONFIG_FILE, DB_CONFIG_FILE, load_app_config, load_db_config, resolve_config_path,
};
use geocode_ingestor::error::Result;
use geocode_ingestor::geocode::GoogleGeocoder;
use geocode_ingestor::ingestor::ResultStore;
use geocode_ingestor::pipeline::ImportPipeline;
use geocode_ingestor::postgres::PostgresStore;
use geocode_ingestor::transform::build_transform;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(),> {
    let file_appender = tracing_appender::rolling::never(".", "geocoder.log",);
    let (non_blocking, _guard,) = tracing_appender::non_blocking(file_appender,);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info",),),)
        .with(fmt::layer().with_writer(std::io::stderr,),)
        .with(fmt::layer().with_writer(non_blocking,).with_ansi(false,),)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Setup(args,) => setup(&args.config,).await,
        Commands::Import(args,) => import(args,).await,
    }
}

async fn connect(config: &ConfigArgs,) -> Result<PostgresStore,> {
    let path = resolve_config_path(config.db_config.as_deref(), DB_CONFIG_FILE,)?;
    let db = load_db_config(&path,)?;
    PostgresStore::connect(&db,).await
}

async fn setup(config: &ConfigArgs,) -> Result<(),> {
    let mut store = connect(config,).await?;
    store.provision().await?;
    info!("Schema '{}' is ready", store.schema().schema());
    Ok((),)
}

async fn import(args: ImportArgs,) -> Result<(),> {
    let app_path = resolve_config_path(args.app_config.as_deref(), APP_CONFIG_FILE,)?;
    let app = load_app_config(&app_path,)?;

    let store = connect(&args.config,).await?;
    let geocoder = GoogleGeocoder::new(app.google_api_key, app.endpoint,);
    let transform = build_transform(args.transform, args.prefix, args.suffix,);

    let mut pipeline = ImportPipeline::new(store, geocoder,);
    pipeline
        .run(&args.path, &args.field, transform.as_deref(),)
        .await
}
