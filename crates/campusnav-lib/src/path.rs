use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::cancel::CancellationToken;
use crate::config::SearchConfig;
use crate::cost::{edge_cost, heuristic};
use crate::error::{Error, Result};
use crate::model::{Edge, EdgeKind, Node, NodeId};
use crate::normalize::orient_edge;
use crate::provider::GraphProvider;
use crate::route::{reconstruct_route, RouteResult};

/// Counters collected while a single search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes popped from the frontier and settled.
    pub expanded: usize,
    /// Frontier records created, including improved duplicates.
    pub pushed: usize,
    /// Outdated frontier records discarded on pop.
    pub stale: usize,
    /// Edges ignored because they were malformed or pointed at missing nodes.
    pub skipped_edges: usize,
}

/// Accessibility-aware A* route search over a [`GraphProvider`].
///
/// A finder holds no per-search state, so one instance can serve any number
/// of concurrent requests as long as the provider allows shared reads.
#[derive(Debug, Clone)]
pub struct RouteFinder<P> {
    provider: P,
    config: SearchConfig,
}

impl<P: GraphProvider> RouteFinder<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SearchConfig::default())
    }

    pub fn with_config(provider: P, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a route from `start` to `goal`.
    ///
    /// Returns `Ok(None)` when either endpoint does not exist or no route
    /// satisfies the accessibility requirement. Provider failures are
    /// returned as errors.
    pub fn find_path(
        &self,
        start: NodeId,
        goal: NodeId,
        accessible: bool,
    ) -> Result<Option<RouteResult>> {
        Search::new(&self.provider, &self.config, accessible, None).run(start, goal)
    }

    /// Like [`RouteFinder::find_path`], aborting with [`Error::Cancelled`]
    /// once `cancel` fires. The token is checked on every frontier pop and
    /// before every provider call.
    pub fn find_path_with_cancel(
        &self,
        start: NodeId,
        goal: NodeId,
        accessible: bool,
        cancel: &CancellationToken,
    ) -> Result<Option<RouteResult>> {
        Search::new(&self.provider, &self.config, accessible, Some(cancel)).run(start, goal)
    }
}

/// Find a route with the default cost model.
pub fn find_route<P: GraphProvider>(
    provider: &P,
    start: NodeId,
    goal: NodeId,
    accessible: bool,
) -> Result<Option<RouteResult>> {
    RouteFinder::new(provider).find_path(start, goal, accessible)
}

/// Candidate path record. `parent` indexes into the search arena.
#[derive(Debug, Clone)]
pub(crate) struct SearchNode {
    pub(crate) node: Node,
    pub(crate) g: f64,
    pub(crate) h: f64,
    pub(crate) parent: Option<usize>,
    pub(crate) edge: Option<Edge>,
}

struct Search<'a, P> {
    provider: &'a P,
    config: &'a SearchConfig,
    accessible: bool,
    cancel: Option<&'a CancellationToken>,
    nodes: HashMap<NodeId, Option<Node>>,
    arena: Vec<SearchNode>,
    best_g: HashMap<NodeId, f64>,
    settled: HashSet<NodeId>,
    frontier: BinaryHeap<FrontierEntry>,
    stats: SearchStats,
}

impl<'a, P: GraphProvider> Search<'a, P> {
    fn new(
        provider: &'a P,
        config: &'a SearchConfig,
        accessible: bool,
        cancel: Option<&'a CancellationToken>,
    ) -> Self {
        Self {
            provider,
            config,
            accessible,
            cancel,
            nodes: HashMap::new(),
            arena: Vec::new(),
            best_g: HashMap::new(),
            settled: HashSet::new(),
            frontier: BinaryHeap::new(),
            stats: SearchStats::default(),
        }
    }

    fn run(mut self, start: NodeId, goal: NodeId) -> Result<Option<RouteResult>> {
        debug!(start, goal, accessible = self.accessible, "starting route search");

        let Some(start_node) = self.fetch(start)? else {
            debug!(start, "start node not found");
            return Ok(None);
        };
        let Some(goal_node) = self.fetch(goal)? else {
            debug!(goal, "goal node not found");
            return Ok(None);
        };

        let h = heuristic(self.config, &start_node, &goal_node);
        self.push(SearchNode {
            node: start_node,
            g: 0.0,
            h,
            parent: None,
            edge: None,
        });

        while let Some(entry) = self.frontier.pop() {
            self.check_cancelled()?;

            if self.settled.contains(&entry.node) {
                self.stats.stale += 1;
                continue;
            }

            if entry.node == goal {
                let route = reconstruct_route(self.config, &self.arena, entry.slot, self.stats);
                debug!(
                    start,
                    goal,
                    steps = route.path.len(),
                    total_distance = route.total_distance,
                    expanded = self.stats.expanded,
                    pushed = self.stats.pushed,
                    stale = self.stats.stale,
                    "route found"
                );
                return Ok(Some(route));
            }

            self.settled.insert(entry.node);
            self.stats.expanded += 1;
            self.expand(entry.slot, &goal_node)?;
        }

        debug!(
            start,
            goal,
            expanded = self.stats.expanded,
            "frontier exhausted without reaching goal"
        );
        Ok(None)
    }

    fn expand(&mut self, slot: usize, goal: &Node) -> Result<()> {
        let current_id = self.arena[slot].node.id;
        let current_g = self.arena[slot].g;

        self.check_cancelled()?;
        let edges = if self.accessible {
            self.provider.accessible_neighbor_edges(current_id)?
        } else {
            self.provider.neighbor_edges(current_id)?
        };
        trace!(node = current_id, edges = edges.len(), g = current_g, "expanding node");

        for edge in edges {
            let edge_id = edge.id;
            let Some(oriented) = orient_edge(edge, current_id) else {
                warn!(edge = edge_id, node = current_id, "skipping edge not incident to node");
                self.stats.skipped_edges += 1;
                continue;
            };

            let neighbor_id = oriented.target();
            if self.settled.contains(&neighbor_id) {
                continue;
            }
            if self.accessible
                && (oriented.edge().kind == EdgeKind::Stairs
                    || !oriented.edge().is_flagged_accessible())
            {
                continue;
            }

            let Some(neighbor) = self.fetch(neighbor_id)? else {
                warn!(edge = edge_id, node = neighbor_id, "skipping edge to unknown node");
                self.stats.skipped_edges += 1;
                continue;
            };
            if self.accessible && !neighbor.accessible {
                continue;
            }

            let edge = oriented.into_edge(&self.arena[slot].node, &neighbor);
            let g = current_g + edge_cost(self.config, &edge, self.accessible);
            if self
                .best_g
                .get(&neighbor_id)
                .is_some_and(|&best| g >= best)
            {
                continue;
            }

            let h = heuristic(self.config, &neighbor, goal);
            self.push(SearchNode {
                node: neighbor,
                g,
                h,
                parent: Some(slot),
                edge: Some(edge),
            });
        }

        Ok(())
    }

    /// Per-search node cache; each node is requested from the provider once.
    fn fetch(&mut self, id: NodeId) -> Result<Option<Node>> {
        if let Some(cached) = self.nodes.get(&id) {
            return Ok(cached.clone());
        }
        self.check_cancelled()?;
        let node = self.provider.node(id)?;
        self.nodes.insert(id, node.clone());
        Ok(node)
    }

    // Improved records are pushed alongside older ones; the older record is
    // discarded as stale when popped after the node has been settled.
    fn push(&mut self, candidate: SearchNode) {
        let slot = self.arena.len();
        let id = candidate.node.id;
        self.best_g.insert(id, candidate.g);
        self.frontier
            .push(FrontierEntry::new(id, slot, candidate.g + candidate.h));
        self.arena.push(candidate);
        self.stats.pushed += 1;
    }

    fn check_cancelled(&self) -> Result<()> {
        match self.cancel {
            Some(token) if token.is_cancelled() => {
                debug!(expanded = self.stats.expanded, "route search cancelled");
                Err(Error::Cancelled)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    estimate: FloatOrd,
    node: NodeId,
    slot: usize,
}

impl FrontierEntry {
    fn new(node: NodeId, slot: usize, estimate: f64) -> Self {
        Self {
            estimate: FloatOrd(estimate),
            node,
            slot,
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap pops the lowest estimate, then the
        // lowest node id, then the oldest record.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.slot.cmp(&self.slot))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
