//! Route command handler for computing paths between campus locations.

use std::path::Path;

use anyhow::{bail, Context, Result};
use campusnav_lib::{NodeId, RouteFinder, RouteSummary, SearchConfig, SqliteGraphProvider};
use tracing::debug;

use crate::commands::open_campus;
use crate::output::{render_route, OutputFormat};

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting node id or name.
    pub from: String,
    /// Destination node id or name.
    pub to: String,
    /// Avoid stairs and inaccessible nodes.
    pub accessible: bool,
}

/// Handle the route subcommand.
pub fn handle_route_command(
    database: Option<&Path>,
    config: SearchConfig,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let provider = open_campus(database)?;
    let start = resolve_endpoint(&provider, &args.from)?;
    let goal = resolve_endpoint(&provider, &args.to)?;
    if start == goal {
        bail!("start and destination are the same node ({start})");
    }

    let finder = RouteFinder::with_config(&provider, config);
    let route = finder
        .find_path(start, goal, args.accessible)
        .with_context(|| format!("route search from {} to {} failed", args.from, args.to))?;

    let Some(route) = route else {
        if args.accessible {
            bail!(
                "No route found from {} to {} (accessible routes only; try again without --accessible)",
                args.from,
                args.to
            );
        }
        bail!("No route found from {} to {}", args.from, args.to);
    };
    debug!(
        expanded = route.stats.expanded,
        pushed = route.stats.pushed,
        "route search statistics"
    );

    let summary = RouteSummary::from_route(&route, args.accessible)?;
    print!("{}", render_route(&summary, format)?);
    Ok(())
}

/// Numeric input is taken as a node id; anything else is looked up by name.
fn resolve_endpoint(provider: &SqliteGraphProvider, value: &str) -> Result<NodeId> {
    let trimmed = value.trim();
    if let Ok(id) = trimmed.parse::<NodeId>() {
        return Ok(id);
    }
    Ok(provider.resolve_node_name(trimmed)?)
}
