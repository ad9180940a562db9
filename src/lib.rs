//! # dockersql - Query your Docker host with SQL
//!
//! dockersql snapshots the containers and images of a Docker daemon into an
//! in-memory SQLite database and exposes it through an interactive shell.
//!
//! dockersql provides:
//! - A flat relational schema for containers and images
//! - A one-shot snapshot loader that flattens nested daemon records
//! - A read/execute/report shell that survives bad queries

pub mod app;
pub mod config;
pub mod daemon;
pub mod shell;
pub mod snapshot;
pub mod storage;
pub mod ui;

// Re-exports for convenient access
pub use config::Config;
pub use daemon::{DaemonClient, DockerClient};
pub use shell::{SessionOutcome, Shell};
pub use snapshot::{load_snapshot, SnapshotStats};
pub use storage::{RelationalStore, SqliteStore};

/// Result type alias for dockersql operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dockersql operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Docker daemon error: {0}")]
    Daemon(#[from] bollard::errors::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
