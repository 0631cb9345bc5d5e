//! CLI command implementations.

pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors from CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection or query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Running migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Reading the seed file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing the seed file failed.
    #[error("invalid seed file: {0}")]
    InvalidSeedFile(#[from] serde_yaml::Error),
}

/// Resolve the database URL, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<String, CommandError> {
    std::env::var("DOPETECH_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("DOPETECH_DATABASE_URL"))
}
