//! Command-line interface for seedforge
//!
//! # Usage Examples
//!
//! ## Generate
//! ```bash
//! # Print rows as JSON
//! seedforge generate --seed-file schema.yaml --seed 42
//!
//! # Only some tables, into a file
//! seedforge generate --seed-file schema.yaml --tables users,posts --output rows.json
//! ```
//!
//! ## Populate
//! ```bash
//! seedforge populate postgresql \
//!   --seed-file schema.yaml \
//!   --count 1000 \
//!   --postgresql-connection-string "host=localhost user=postgres dbname=testdb" \
//!   --truncate
//! ```
//!
//! ## Generators
//! ```bash
//! # List generator kinds per API version
//! seedforge generators
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use seed_engine::DialectKind;
use seed_generator::registry;
use seed_postgresql::{PostgreSQLArgs, PostgreSQLSelector, PostgreSQLStore};
use seedforge::{rows_to_json, SeedArgs, SeedFile};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "seedforge")]
#[command(about = "Deterministic synthetic data for relational schemas")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate rows in memory and write them as JSON
    Generate {
        #[command(flatten)]
        args: SeedArgs,

        /// Output file (default: stdout)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Generate rows and insert them into a database
    Populate {
        #[command(subcommand)]
        target: PopulateTarget,
    },

    /// List the registered generators
    Generators,
}

/// Database to populate
#[derive(Subcommand)]
enum PopulateTarget {
    /// Populate a PostgreSQL database
    #[command(name = "postgresql")]
    PostgreSQL {
        #[command(flatten)]
        args: SeedArgs,

        #[command(flatten)]
        postgresql: PostgreSQLArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args, output } => run_generate(args, output).await?,
        Commands::Populate {
            target: PopulateTarget::PostgreSQL { args, postgresql },
        } => run_populate_postgresql(args, postgresql).await?,
        Commands::Generators => {
            for entry in registry::entries() {
                let unique = if entry.supports_unique() { "unique" } else { "" };
                println!("{:<18} v{} {unique}", entry.kind.to_string(), entry.version);
            }
        }
    }

    Ok(())
}

async fn run_generate(args: SeedArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    let file = SeedFile::from_file(&args.seed_file)?;
    let schema = file
        .schema()
        .with_context(|| format!("Invalid schema in {:?}", args.seed_file))?;

    let tables = args
        .seeder(&schema, &file)
        .generate()
        .await
        .context("Failed to generate rows")?;
    let json = serde_json::to_string_pretty(&rows_to_json(&tables))?;

    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Failed to write {path:?}"))?;
            info!("Wrote {} tables to {:?}", tables.len(), path);
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn run_populate_postgresql(args: SeedArgs, postgresql: PostgreSQLArgs) -> anyhow::Result<()> {
    let file = SeedFile::from_file(&args.seed_file)?;
    let schema = file
        .schema()
        .with_context(|| format!("Invalid schema in {:?}", args.seed_file))?;

    let mut store = PostgreSQLStore::connect(&postgresql.postgresql_connection_string)
        .await
        .context("Failed to connect to PostgreSQL")?;
    if postgresql.pglite {
        store = store.with_dialect(DialectKind::PgLite);
    }

    let seeder = args
        .seeder(&schema, &file)
        .with_selector(Box::new(PostgreSQLSelector));
    if postgresql.truncate {
        let plan = seeder.plan()?;
        store
            .truncate(&plan.order())
            .await
            .context("Failed to truncate tables")?;
    }

    let report = seeder.seed(&mut store).await.context("Failed to seed PostgreSQL")?;
    for table in &report.tables {
        info!(
            "{}: {} rows inserted in {} batches, {} updated",
            table.table, table.rows_inserted, table.batch_count, table.rows_updated
        );
    }
    Ok(())
}
