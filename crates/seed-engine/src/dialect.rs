//! Target dialects and their bind-parameter limits.

use serde::{Deserialize, Serialize};

/// SQL dialect family of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    PostgreSQL,
    /// Embedded PostgreSQL (PGlite) with a lower parameter ceiling
    PgLite,
    MySQL,
    SQLite,
    MsSQL,
}

impl DialectKind {
    /// Maximum bind parameters in one statement.
    pub fn parameter_limit(self) -> usize {
        match self {
            DialectKind::PostgreSQL => 65_535,
            DialectKind::PgLite => 32_740,
            DialectKind::MySQL => 100_000,
            DialectKind::SQLite => 32_766,
            DialectKind::MsSQL => 2_100,
        }
    }

    /// Rows per insert: the requested size, clamped so that
    /// `rows * columns` stays within the parameter limit.
    pub fn max_batch_size(self, requested: usize, columns: usize) -> usize {
        let ceiling = self.parameter_limit() / columns.max(1);
        requested.min(ceiling).max(1)
    }

    /// Whether explicit inserts into serial/identity columns leave the
    /// backing sequence behind, so the engine must advance it afterwards.
    pub fn needs_sequence_advance(self) -> bool {
        matches!(self, DialectKind::PostgreSQL | DialectKind::PgLite)
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectKind::PostgreSQL => write!(f, "postgresql"),
            DialectKind::PgLite => write!(f, "pglite"),
            DialectKind::MySQL => write!(f, "mysql"),
            DialectKind::SQLite => write!(f, "sqlite"),
            DialectKind::MsSQL => write!(f, "mssql"),
        }
    }
}

impl std::str::FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Ok(DialectKind::PostgreSQL),
            "pglite" => Ok(DialectKind::PgLite),
            "mysql" => Ok(DialectKind::MySQL),
            "sqlite" => Ok(DialectKind::SQLite),
            "mssql" | "sqlserver" => Ok(DialectKind::MsSQL),
            _ => Err(format!("Unknown dialect: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size_clamped_by_parameter_limit() {
        assert_eq!(DialectKind::PostgreSQL.max_batch_size(10_000, 5), 10_000);
        assert_eq!(DialectKind::PostgreSQL.max_batch_size(100_000, 10), 6_553);
        assert_eq!(DialectKind::MsSQL.max_batch_size(10_000, 7), 300);
        assert_eq!(DialectKind::MsSQL.max_batch_size(10_000, 5_000), 1);
        assert_eq!(DialectKind::SQLite.max_batch_size(0, 3), 1);
    }

    #[test]
    fn test_sequence_advance_only_for_postgres_family() {
        assert!(DialectKind::PostgreSQL.needs_sequence_advance());
        assert!(DialectKind::PgLite.needs_sequence_advance());
        assert!(!DialectKind::MySQL.needs_sequence_advance());
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("postgres".parse::<DialectKind>(), Ok(DialectKind::PostgreSQL));
        assert_eq!(DialectKind::MsSQL.to_string(), "mssql");
        assert!("oracle".parse::<DialectKind>().is_err());
    }
}
