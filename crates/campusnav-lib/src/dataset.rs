use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::{Error, Result};

/// Default filename for the campus database.
const DATABASE_FILENAME: &str = "campus.db";

/// Environment variable overriding the database location.
pub const DATABASE_ENV_VAR: &str = "CAMPUSNAV_DATABASE";

/// Resolve the default database location using platform-specific project directories.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "campusnav", "campusnav").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(DATABASE_FILENAME))
}

/// Resolve which campus database to use.
///
/// The resolution order is:
/// 1. Explicit `target` argument when provided.
/// 2. `CAMPUSNAV_DATABASE` environment variable.
/// 3. Platform-specific project data directory.
///
/// A directory is accepted anywhere a file is and resolves to
/// `<dir>/campus.db`. The path is not required to exist.
pub fn resolve_database_path(target: Option<&Path>) -> Result<PathBuf> {
    if let Some(explicit) = target {
        return Ok(canonical_database_path(explicit));
    }

    if let Some(env_path) = env::var_os(DATABASE_ENV_VAR) {
        let resolved = canonical_database_path(Path::new(&env_path));
        debug!(path = %resolved.display(), "using database from {}", DATABASE_ENV_VAR);
        return Ok(resolved);
    }

    default_database_path()
}

/// Like [`resolve_database_path`], failing when the file does not exist.
pub fn ensure_database(target: Option<&Path>) -> Result<PathBuf> {
    let path = resolve_database_path(target)?;
    if !path.is_file() {
        return Err(Error::DatabaseNotFound { path });
    }
    Ok(path)
}

fn canonical_database_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.join(DATABASE_FILENAME);
    }
    path.to_path_buf()
}
