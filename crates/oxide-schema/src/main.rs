//! oxide-schema CLI
//!
//! Command-line tool for generating schema drop scripts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_schema::dialect::DIALECT_NAMES;
use oxide_schema::prelude::*;

/// Dependency-ordered schema drop scripts.
#[derive(Parser)]
#[command(name = "oxide-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the drop script for a catalog.
    Drop {
        /// Catalog definition (JSON).
        #[arg(short, long)]
        catalog: PathBuf,

        /// SQL dialect.
        #[arg(short, long, env = "OXIDE_SCHEMA_DIALECT", default_value = "postgresql")]
        dialect: String,

        /// Also drop the schemas themselves.
        #[arg(long)]
        drop_schemas: bool,

        /// Write the script to this file.
        #[arg(short, long, env = "OXIDE_SCHEMA_OUTPUT")]
        output: Option<PathBuf>,

        /// Text written after every statement.
        #[arg(long, default_value = ";")]
        delimiter: String,

        /// Do not print the script to stdout.
        #[arg(short, long)]
        quiet: bool,
    },

    /// List supported dialects.
    Dialects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Dialects => {
            for name in DIALECT_NAMES {
                println!("{}", name);
            }
        }

        Commands::Drop {
            catalog,
            dialect,
            drop_schemas,
            output,
            delimiter,
            quiet,
        } => {
            let dialect = dialect_by_name(&dialect)?;
            let database = CatalogDefinition::from_path(&catalog)?.into_database(dialect)?;
            let dropper = SchemaDropper::new();

            let mut stdout = WriterTarget::stdout().delimiter(delimiter.as_str());
            let mut file = output
                .as_ref()
                .map(|path| FileTarget::new(path).delimiter(delimiter.as_str()));

            let mut targets: Vec<&mut dyn Target> = Vec::new();
            if !quiet {
                targets.push(&mut stdout);
            }
            if let Some(file) = file.as_mut() {
                targets.push(file);
            }

            dropper.drop(&database, drop_schemas, &mut targets)?;

            if let Some(path) = &output {
                info!("Wrote drop script to {}", path.display());
            }
        }
    }

    Ok(())
}
