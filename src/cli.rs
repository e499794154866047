// geocode_ingestor/src/cli.rs
// Command Line Interface (CLI) specific logic for geocode_ingestor.

use std::path::PathBuf;

use clap::Parser;

use crate::transform::TransformStep;

/// Geocode addresses from a CSV file into PostgreSQL.
#[derive(Parser, Debug,)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug,)]
pub enum Commands {
    /// Create the schema, results table and indexes, then exit
    Setup(SetupArgs,),
    /// Geocode one column of a CSV file and store every candidate
    Import(ImportArgs,),
}

#[derive(Parser, Debug,)]
pub struct ConfigArgs {
    /// Database YAML (defaults to db.yml next to the executable)
    #[clap(long, env = "GEOCODER_DB_CONFIG")]
    pub db_config: Option<PathBuf,>,
}

#[derive(Parser, Debug,)]
pub struct SetupArgs {
    #[clap(flatten)]
    pub config: ConfigArgs,
}

#[derive(Parser, Debug,)]
pub struct ImportArgs {
    /// Path to the CSV file to import
    #[clap(short, long)]
    pub path: PathBuf,

    /// Header name of the column holding the text to geocode
    #[clap(short, long)]
    pub field: String,

    /// Transform steps applied to each value before geocoding, in order
    #[clap(long, value_enum, value_delimiter = ',')]
    pub transform: Vec<TransformStep,>,

    /// Text prepended to each query
    #[clap(long)]
    pub prefix: Option<String,>,

    /// Text appended to each query (e.g. ", Chicago IL")
    #[clap(long)]
    pub suffix: Option<String,>,

    /// Application YAML holding the API key (defaults to config.yml next to the executable)
    #[clap(long, env = "GEOCODER_APP_CONFIG")]
    pub app_config: Option<PathBuf,>,

    #[clap(flatten)]
    pub config: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_import_with_transforms() {
        let cli = Cli::try_parse_from([
            "geocode-ingestor",
            "import",
            "--path",
            "addresses.csv",
            "--field",
            "Address",
            "--transform",
            "trim,upper",
            "--suffix",
            ", Chicago IL",
            "--db-config",
            "/etc/geo/db.yml",
        ],)
        .unwrap();

        match cli.command {
            Commands::Import(args,) => {
                assert_eq!(args.path, PathBuf::from("addresses.csv"));
                assert_eq!(args.field, "Address");
                assert_eq!(args.transform, vec![TransformStep::Trim, TransformStep::Upper]);
                assert_eq!(args.suffix.as_deref(), Some(", Chicago IL"));
                assert_eq!(args.config.db_config, Some(PathBuf::from("/etc/geo/db.yml")));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn import_requires_field() {
        assert!(Cli::try_parse_from(["geocode-ingestor", "import", "--path", "a.csv"]).is_err());
    }

    #[test]
    fn parses_setup() {
        let cli = Cli::try_parse_from(["geocode-ingestor", "setup"],).unwrap();
        assert!(matches!(cli.command, Commands::Setup(_)));
    }
}
