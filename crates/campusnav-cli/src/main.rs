use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use campusnav_cli::commands::database::{handle_import_command, handle_init_command};
use campusnav_cli::commands::nodes::{
    handle_node_command, handle_nodes_command, handle_transitions_command,
};
use campusnav_cli::commands::route::{handle_route_command, RouteCommandArgs};
use campusnav_cli::logging::{init_logging, LogFormat, LoggingConfig};
use campusnav_cli::output::OutputFormat;
use campusnav_lib::{BuildingId, FloorId, NodeId, SearchConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus wayfinding and route planning")]
struct Cli {
    /// Campus database file or directory (defaults to $CAMPUSNAV_DATABASE,
    /// then the platform data directory).
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// JSON file overriding search cost constants.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log output format (logs go to stderr).
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two nodes, given by id or name.
    Route {
        /// Starting node id or name.
        #[arg(long = "from")]
        from: String,
        /// Destination node id or name.
        #[arg(long = "to")]
        to: String,
        /// Only use step-free, wheelchair-accessible paths.
        #[arg(long)]
        accessible: bool,
    },
    /// Show a single node.
    Node {
        /// Node id.
        #[arg(required_unless_present = "scan_code")]
        id: Option<NodeId>,
        /// Look the node up by its scan-code (QR) payload instead.
        #[arg(long, conflicts_with = "id")]
        scan_code: Option<String>,
    },
    /// List nodes, optionally filtered by building and floor.
    Nodes {
        #[arg(long)]
        building: Option<BuildingId>,
        #[arg(long)]
        floor: Option<FloorId>,
    },
    /// List stair and elevator landings of a building.
    Transitions {
        #[arg(long)]
        building: BuildingId,
    },
    /// Create an empty campus database.
    Init {
        /// Target path (defaults to the resolved database path).
        path: Option<PathBuf>,
    },
    /// Import a JSON graph document ({"nodes": [...], "edges": [...]}).
    Import {
        /// Graph document to import.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::default().with_format(cli.log_format));

    let database = cli.database.as_deref();
    match cli.command {
        Command::Route {
            from,
            to,
            accessible,
        } => {
            let config = load_search_config(cli.config.as_deref())?;
            let args = RouteCommandArgs {
                from,
                to,
                accessible,
            };
            handle_route_command(database, config, cli.format, &args)
        }
        Command::Node { id, scan_code } => {
            handle_node_command(database, cli.format, id, scan_code.as_deref())
        }
        Command::Nodes { building, floor } => {
            handle_nodes_command(database, cli.format, building, floor)
        }
        Command::Transitions { building } => {
            handle_transitions_command(database, cli.format, building)
        }
        Command::Init { path } => handle_init_command(path.as_deref().or(database)),
        Command::Import { file } => handle_import_command(database, &file),
    }
}

fn load_search_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => SearchConfig::from_path(path)
            .with_context(|| format!("failed to load search config {}", path.display())),
        None => Ok(SearchConfig::default()),
    }
}
