//! CLI argument definitions shared by all commands.

use crate::seed_file::SeedFile;
use clap::Args;
use seed_core::SeedSchema;
use seed_engine::{SeedOptions, Seeder};
use std::path::PathBuf;

/// Seed file and run settings. Flags override the values in the file.
#[derive(Args, Clone, Debug)]
pub struct SeedArgs {
    /// Path to the seed YAML file
    #[arg(long, short = 's')]
    pub seed_file: PathBuf,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long)]
    pub seed: Option<i64>,

    /// Default number of rows per table
    #[arg(long)]
    pub count: Option<u64>,

    /// Rows per INSERT, before the dialect's parameter limit applies
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Generator API version
    #[arg(long = "version")]
    pub api_version: Option<u32>,

    /// Specific tables to seed (comma-separated, empty = all tables)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,
}

impl SeedArgs {
    pub fn options(&self, file: &SeedFile) -> SeedOptions {
        let mut options = file.options();
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        if let Some(count) = self.count {
            options = options.with_count(count);
        }
        if let Some(batch_size) = self.batch_size {
            options = options.with_batch_size(batch_size);
        }
        if let Some(version) = self.api_version {
            options = options.with_version(version);
        }
        options
    }

    /// Seeder over `schema` configured from the file and the flags.
    pub fn seeder<'a>(&self, schema: &'a SeedSchema, file: &SeedFile) -> Seeder<'a> {
        let seeder = Seeder::new(schema)
            .with_refinements(file.refine.clone())
            .with_options(self.options(file));
        if self.tables.is_empty() {
            seeder
        } else {
            seeder.with_tables(self.tables.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: SeedArgs,
    }

    #[test]
    fn test_flags_override_file() {
        let cli = Cli::parse_from([
            "seedforge",
            "--seed-file",
            "schema.yaml",
            "--seed",
            "7",
            "--tables",
            "users,posts",
            "--version",
            "1",
        ]);
        let file = SeedFile::from_yaml("seed: 42\ncount: 3\ntables: []").unwrap();
        let options = cli.args.options(&file);
        assert_eq!(options.seed, 7);
        assert_eq!(options.count, 3);
        assert_eq!(options.version, 1);
        assert_eq!(cli.args.tables, vec!["users", "posts"]);
    }
}
