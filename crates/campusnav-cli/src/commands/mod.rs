// Module exports for CLI subcommands.
//
// Each module handles one group of subcommands; main.rs parses arguments and
// dispatches to these handlers.

pub mod database;
pub mod nodes;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};
use campusnav_lib::{ensure_database, SqliteGraphProvider};
use tracing::info;

/// Locate the campus database and open it for reading.
pub(crate) fn open_campus(database: Option<&Path>) -> Result<SqliteGraphProvider> {
    let path = ensure_database(database).context("failed to locate the campus database")?;
    let provider = SqliteGraphProvider::open_read_only(&path)
        .with_context(|| format!("failed to open campus database {}", path.display()))?;
    info!(path = %path.display(), "loaded campus database");
    Ok(provider)
}
