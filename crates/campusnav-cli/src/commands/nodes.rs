//! Node lookup handlers: `node`, `nodes` and `transitions`.

use std::path::Path;

use anyhow::{anyhow, bail, Result};
use campusnav_lib::{BuildingId, FloorId, GraphProvider, NodeId};

use crate::commands::open_campus;
use crate::output::{render_node, render_nodes, OutputFormat};

/// Show one node, looked up by id or by scan-code payload.
pub fn handle_node_command(
    database: Option<&Path>,
    format: OutputFormat,
    id: Option<NodeId>,
    scan_code: Option<&str>,
) -> Result<()> {
    let provider = open_campus(database)?;
    let node = match (id, scan_code) {
        (Some(id), _) => provider
            .node(id)?
            .ok_or_else(|| anyhow!("no node with id {id}"))?,
        (None, Some(code)) => provider
            .node_by_scan_code(code)?
            .ok_or_else(|| anyhow!("no node with scan code {code}"))?,
        (None, None) => bail!("either a node id or --scan-code is required"),
    };
    print!("{}", render_node(&node, format)?);
    Ok(())
}

/// List nodes, optionally restricted to a building and/or floor.
pub fn handle_nodes_command(
    database: Option<&Path>,
    format: OutputFormat,
    building: Option<BuildingId>,
    floor: Option<FloorId>,
) -> Result<()> {
    let provider = open_campus(database)?;
    let nodes = provider.nodes_by_location(building, floor)?;
    print!("{}", render_nodes(&nodes, format)?);
    Ok(())
}

/// List the stair and elevator landings of a building.
pub fn handle_transitions_command(
    database: Option<&Path>,
    format: OutputFormat,
    building: BuildingId,
) -> Result<()> {
    let provider = open_campus(database)?;
    let nodes = provider.floor_transition_nodes(building)?;
    print!("{}", render_nodes(&nodes, format)?);
    Ok(())
}
