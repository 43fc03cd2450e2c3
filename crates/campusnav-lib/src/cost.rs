//! Edge cost, heuristic and duration estimates.
//!
//! The heuristic adds fixed floor and building penalties on top of the
//! straight-line distance. That makes it overestimate in some multi-floor
//! graphs, so the search prefers routes with fewer transitions over strict
//! optimality.

use crate::config::SearchConfig;
use crate::model::{Edge, EdgeKind, Node};

/// Estimated remaining cost from `current` to `target`.
pub fn heuristic(config: &SearchConfig, current: &Node, target: &Node) -> f64 {
    let mut estimate = current
        .position
        .distance_to(&target.position)
        .unwrap_or(config.unknown_position_distance);

    if current.floor_id != target.floor_id {
        estimate += config.floor_change_penalty;
    }
    if current.building_id != target.building_id {
        estimate += config.building_change_penalty;
    }

    estimate
}

/// Cost of traversing `edge`, shaped by its category.
///
/// Stairs are priced prohibitively (but not forbidden) when `accessible` is
/// set; the search also filters them out structurally.
pub fn edge_cost(config: &SearchConfig, edge: &Edge, accessible: bool) -> f64 {
    let base = edge.effective_weight();
    let factor = match edge.kind {
        EdgeKind::Stairs if accessible => config.accessible_stairs_multiplier,
        EdgeKind::Stairs => config.stairs_multiplier,
        EdgeKind::Elevator => config.elevator_multiplier,
        EdgeKind::Door => config.door_multiplier,
        EdgeKind::OutdoorPath => config.outdoor_multiplier,
        EdgeKind::Walkway => 1.0,
    };
    base * factor
}

/// Whole seconds needed to cover `distance` along `edge`.
pub fn estimate_duration(config: &SearchConfig, edge: &Edge, distance: f64) -> u64 {
    let walking = distance / config.walking_speed;
    let seconds = match edge.kind {
        EdgeKind::Stairs => walking * config.stairs_duration_factor,
        EdgeKind::Elevator => walking + config.elevator_wait_seconds,
        EdgeKind::Door => walking + config.door_seconds,
        EdgeKind::OutdoorPath | EdgeKind::Walkway => walking,
    };
    seconds.round().max(0.0) as u64
}
