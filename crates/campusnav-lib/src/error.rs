use std::path::PathBuf;

use thiserror::Error;

use crate::model::{EdgeId, NodeId};

/// Convenient result alias for the campus navigation library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// "No route" is deliberately absent: route lookups report it as `Ok(None)`
/// so callers can tell an impossible route apart from a failing system.
#[derive(Debug, Error)]
pub enum Error {
    /// Campus database could not be located at the resolved path.
    #[error("campus database not found at {path}")]
    DatabaseNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the campus database")]
    ProjectDirsUnavailable,

    /// The graph data provider could not answer a lookup.
    #[error("graph data unavailable: {message}")]
    ProviderUnavailable { message: String },

    /// A route search was aborted through its cancellation token.
    #[error("route search was cancelled")]
    Cancelled,

    /// Raised when an edge connects a node to itself.
    #[error("edge {edge} is a self-loop on node {node}")]
    SelfLoopEdge { edge: EdgeId, node: NodeId },

    /// Raised when an edge references a node that does not exist.
    #[error("edge {edge} references unknown node {node}")]
    DanglingEdge { edge: EdgeId, node: NodeId },

    /// Raised when two nodes share an identifier.
    #[error("duplicate node identifier {id}")]
    DuplicateNode { id: NodeId },

    /// Raised when two edges share an identifier.
    #[error("duplicate edge identifier {id}")]
    DuplicateEdge { id: EdgeId },

    /// Raised when an edge weight is zero, negative, or not a number.
    #[error("edge {edge} has invalid weight {weight}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    /// Raised when a search configuration constant is out of range.
    #[error("invalid search configuration: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    /// Raised when a stored category string is outside the known vocabulary.
    #[error("unknown {entity} category: {value}")]
    UnknownCategory { entity: &'static str, value: String },

    /// Raised when a node name could not be found.
    #[error("unknown node name: {name}{}", format_suggestions(.suggestions))]
    UnknownNode {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a campus database lacks one of the required tables.
    #[error("campus database is missing the {table} table")]
    MissingTable { table: &'static str },

    /// Raised when a computed route contains no steps.
    #[error("route was empty")]
    EmptyRoute,

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
