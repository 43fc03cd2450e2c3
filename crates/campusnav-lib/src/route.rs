//! Turning a settled search record into an instructional route.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::SearchConfig;
use crate::cost::{edge_cost, estimate_duration};
use crate::model::{BuildingId, Edge, EdgeKind, FloorId, Node, NodeId};
use crate::path::{SearchNode, SearchStats};

/// Instruction recorded for the first step of every route.
pub const START_INSTRUCTION: &str = "Start here";

/// One node along a route and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStep {
    pub node: Node,
    /// Edge used to arrive at `node`, oriented in travel direction. `None`
    /// for the starting step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<Edge>,
    pub instruction: String,
    pub distance: f64,
    pub duration_seconds: u64,
}

/// Complete route from start to goal with aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    pub path: Vec<PathStep>,
    pub total_distance: f64,
    pub total_duration_seconds: u64,
    pub floors_involved: BTreeSet<FloorId>,
    pub buildings_involved: BTreeSet<BuildingId>,
    /// True when every node is accessible and no step uses stairs.
    pub accessibility_compatible: bool,
    #[serde(skip)]
    pub stats: SearchStats,
}

impl RouteResult {
    /// Node identifiers in travel order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.path.iter().map(|step| step.node.id).collect()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<&Node> {
        self.path.first().map(|step| &step.node)
    }

    pub fn goal(&self) -> Option<&Node> {
        self.path.last().map(|step| &step.node)
    }

    /// Edges traversed, in travel order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.path.iter().filter_map(|step| step.edge.as_ref())
    }
}

/// Walk parent links back from `goal_slot` and build the route.
pub(crate) fn reconstruct_route(
    config: &SearchConfig,
    arena: &[SearchNode],
    goal_slot: usize,
    stats: SearchStats,
) -> RouteResult {
    let mut reversed: Vec<&SearchNode> = Vec::new();
    let mut current = Some(goal_slot);
    while let Some(slot) = current {
        let record = &arena[slot];
        reversed.push(record);
        current = record.parent;
    }
    reversed.reverse();

    let mut path = Vec::with_capacity(reversed.len());
    let mut floors_involved = BTreeSet::new();
    let mut buildings_involved = BTreeSet::new();
    let mut total_distance = 0.0;
    let mut total_duration_seconds: u64 = 0;
    let mut previous: Option<&Node> = None;

    for record in reversed {
        let node = &record.node;
        floors_involved.extend(node.floor_id);
        buildings_involved.extend(node.building_id);

        let step = match (previous, record.edge.as_ref()) {
            (Some(from), Some(edge)) => {
                let distance = edge_cost(config, edge, false);
                let duration_seconds = estimate_duration(config, edge, distance);
                total_distance += distance;
                total_duration_seconds = total_duration_seconds.saturating_add(duration_seconds);
                PathStep {
                    node: node.clone(),
                    edge: Some(edge.clone()),
                    instruction: edge
                        .instruction
                        .clone()
                        .unwrap_or_else(|| synthesize_instruction(edge, from, node)),
                    distance,
                    duration_seconds,
                }
            }
            _ => PathStep {
                node: node.clone(),
                edge: None,
                instruction: START_INSTRUCTION.to_string(),
                distance: 0.0,
                duration_seconds: 0,
            },
        };
        path.push(step);
        previous = Some(node);
    }

    let accessibility_compatible = path.iter().all(|step| {
        step.node.accessible
            && step
                .edge
                .as_ref()
                .map_or(true, |edge| edge.kind != EdgeKind::Stairs)
    });

    RouteResult {
        path,
        total_distance,
        total_duration_seconds,
        floors_involved,
        buildings_involved,
        accessibility_compatible,
        stats,
    }
}

/// Instruction for an edge that carries no stored text.
pub fn synthesize_instruction(edge: &Edge, from: &Node, to: &Node) -> String {
    let name = to.name.as_deref();
    match edge.kind {
        EdgeKind::Stairs => {
            let direction = if from.floor_id.unwrap_or(0) < to.floor_id.unwrap_or(0) {
                "up"
            } else {
                "down"
            };
            format!(
                "Take stairs {direction} to {}",
                name.unwrap_or("next floor")
            )
        }
        EdgeKind::Elevator => format!(
            "Take elevator to {}",
            name.unwrap_or("destination floor")
        ),
        EdgeKind::Door => format!("Go through door to {}", name.unwrap_or("next area")),
        EdgeKind::OutdoorPath => format!("Walk outside to {}", name.unwrap_or("destination")),
        EdgeKind::Walkway => match name {
            Some(name) => format!("Walk to {name}"),
            None => "Continue straight".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    fn record(node: Node, g: f64, parent: Option<usize>, edge: Option<Edge>) -> SearchNode {
        SearchNode {
            node,
            g,
            h: 0.0,
            parent,
            edge,
        }
    }

    #[test]
    fn reconstruction_orders_steps_and_totals_metrics() {
        let arena = vec![
            record(
                Node::new(1, NodeKind::Entrance).named("Gate").on_floor(1).in_building(1),
                0.0,
                None,
                None,
            ),
            record(
                Node::new(2, NodeKind::Elevator).on_floor(2).in_building(1),
                28.0,
                Some(0),
                Some(Edge::new(10, 1, 2, EdgeKind::Elevator).weighted(14.0)),
            ),
            record(
                Node::new(3, NodeKind::Room).named("Lab").on_floor(2).in_building(1),
                35.0,
                Some(1),
                Some(
                    Edge::new(11, 2, 3, EdgeKind::Walkway)
                        .weighted(7.0)
                        .with_instruction("Follow the corridor"),
                ),
            ),
        ];

        let route = reconstruct_route(&SearchConfig::default(), &arena, 2, SearchStats::default());
        assert_eq!(route.node_ids(), vec![1, 2, 3]);
        assert_eq!(route.path[0].instruction, START_INSTRUCTION);
        assert_eq!(route.path[0].distance, 0.0);
        assert_eq!(route.path[1].instruction, "Take elevator to destination floor");
        assert_eq!(route.path[1].distance, 28.0);
        assert_eq!(route.path[1].duration_seconds, 50);
        assert_eq!(route.path[2].instruction, "Follow the corridor");
        assert_eq!(route.total_distance, 35.0);
        assert_eq!(route.total_duration_seconds, 55);
        assert_eq!(route.floors_involved.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(route.buildings_involved.len(), 1);
        assert!(route.accessibility_compatible);
    }

    #[test]
    fn stairs_or_inaccessible_nodes_break_compatibility() {
        let arena = vec![
            record(Node::new(1, NodeKind::Room), 0.0, None, None),
            record(
                Node::new(2, NodeKind::Room),
                1.5,
                Some(0),
                Some(Edge::new(1, 1, 2, EdgeKind::Stairs)),
            ),
        ];
        let route = reconstruct_route(&SearchConfig::default(), &arena, 1, SearchStats::default());
        assert!(!route.accessibility_compatible);

        let arena = vec![
            record(Node::new(1, NodeKind::Room), 0.0, None, None),
            record(
                Node::new(2, NodeKind::Room).inaccessible(),
                1.0,
                Some(0),
                Some(Edge::new(1, 1, 2, EdgeKind::Walkway)),
            ),
        ];
        let route = reconstruct_route(&SearchConfig::default(), &arena, 1, SearchStats::default());
        assert!(!route.accessibility_compatible);
    }

    #[test]
    fn unbounded_segment_durations_saturate_the_total() {
        // Only reachable by building the config directly, bypassing validation.
        let config = SearchConfig {
            walking_speed: 0.0,
            ..SearchConfig::default()
        };
        let arena = vec![
            record(Node::new(1, NodeKind::Room), 0.0, None, None),
            record(
                Node::new(2, NodeKind::Room),
                1.0,
                Some(0),
                Some(Edge::new(1, 1, 2, EdgeKind::Walkway)),
            ),
            record(
                Node::new(3, NodeKind::Room),
                2.0,
                Some(1),
                Some(Edge::new(2, 2, 3, EdgeKind::Walkway)),
            ),
        ];
        let route = reconstruct_route(&config, &arena, 2, SearchStats::default());
        assert_eq!(route.path[1].duration_seconds, u64::MAX);
        assert_eq!(route.total_duration_seconds, u64::MAX);
    }

    #[test]
    fn synthesized_instructions_follow_edge_category() {
        let ground = Node::new(1, NodeKind::Staircase).on_floor(1);
        let upper = Node::new(2, NodeKind::Staircase).named("Level 2 Landing").on_floor(2);
        let unnamed = Node::new(3, NodeKind::Room);
        let named = Node::new(4, NodeKind::Room).named("Cafe");

        let stairs = Edge::new(1, 1, 2, EdgeKind::Stairs);
        assert_eq!(
            synthesize_instruction(&stairs, &ground, &upper),
            "Take stairs up to Level 2 Landing"
        );
        assert_eq!(
            synthesize_instruction(&stairs, &upper, &ground),
            "Take stairs down to next floor"
        );
        assert_eq!(
            synthesize_instruction(&Edge::new(2, 1, 4, EdgeKind::Door), &ground, &named),
            "Go through door to Cafe"
        );
        assert_eq!(
            synthesize_instruction(&Edge::new(3, 1, 3, EdgeKind::OutdoorPath), &ground, &unnamed),
            "Walk outside to destination"
        );
        assert_eq!(
            synthesize_instruction(&Edge::new(4, 1, 4, EdgeKind::Walkway), &ground, &named),
            "Walk to Cafe"
        );
        assert_eq!(
            synthesize_instruction(&Edge::new(5, 1, 3, EdgeKind::Walkway), &ground, &unnamed),
            "Continue straight"
        );
    }
}
