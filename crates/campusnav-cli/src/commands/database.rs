//! Database maintenance handlers: `init` and `import`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use campusnav_lib::{resolve_database_path, GraphDocument, SqliteGraphProvider};

/// Create an empty campus database (or add missing tables to an existing one).
pub fn handle_init_command(database: Option<&Path>) -> Result<()> {
    let path = resolve_database_path(database)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    SqliteGraphProvider::create(&path)
        .with_context(|| format!("failed to initialise {}", path.display()))?;
    println!("Campus database ready at {}", path.display());
    Ok(())
}

/// Validate a JSON graph document and write it into the campus database.
pub fn handle_import_command(database: Option<&Path>, document_path: &Path) -> Result<()> {
    let document = GraphDocument::from_path(document_path)
        .with_context(|| format!("failed to read graph document {}", document_path.display()))?;

    let path = resolve_database_path(database)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let provider = SqliteGraphProvider::create(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    provider
        .import_document(&document)
        .with_context(|| format!("failed to import {}", document_path.display()))?;

    println!(
        "Imported {} nodes and {} edges into {}",
        document.nodes.len(),
        document.edges.len(),
        path.display()
    );
    Ok(())
}
