use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{BuildingId, Edge, EdgeKind, FloorId, Node, NodeId};
use crate::provider::GraphProvider;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const FUZZY_MATCH_THRESHOLD: f64 = 0.75;

/// Serialisable snapshot of a campus graph (`{"nodes": [...], "edges": [...]}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Read a graph document from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// In-memory campus graph, usable directly as a [`GraphProvider`].
///
/// Edges are stored once and indexed under both endpoints, so lookups from
/// either side return the same stored record.
#[derive(Debug, Clone, Default)]
pub struct CampusGraph {
    nodes: Arc<HashMap<NodeId, Node>>,
    edges: Arc<Vec<Edge>>,
    incident: Arc<HashMap<NodeId, Vec<usize>>>,
    name_to_id: Arc<HashMap<String, NodeId>>,
}

impl CampusGraph {
    pub fn builder() -> CampusGraphBuilder {
        CampusGraphBuilder::default()
    }

    /// Build and validate a graph from owned nodes and edges.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self> {
        CampusGraphBuilder {
            nodes,
            edges,
            allow_dangling: false,
        }
        .build()
    }

    pub fn from_document(document: GraphDocument) -> Result<Self> {
        Self::from_parts(document.nodes, document.edges)
    }

    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes_sorted().into_iter().cloned().collect(),
            edges: self.edges.as_ref().clone(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All nodes ordered by identifier.
    pub fn nodes_sorted(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes.values().collect();
        nodes.sort_by_key(|node| node.id);
        nodes
    }

    /// Stored edges touching `id`, in stored orientation.
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.incident
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&index| &self.edges[index])
    }

    /// Lookup a node identifier by its case-sensitive name. Duplicate names
    /// resolve to the lowest identifier.
    pub fn node_id_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// Resolve a name to an identifier, or fail with fuzzy suggestions.
    pub fn resolve_node_name(&self, name: &str) -> Result<NodeId> {
        self.node_id_by_name(name).ok_or_else(|| Error::UnknownNode {
            name: name.to_string(),
            suggestions: self.fuzzy_node_matches(name, 3),
        })
    }

    /// Node names most similar to `query`, best first.
    pub fn fuzzy_node_matches(&self, query: &str, limit: usize) -> Vec<String> {
        fuzzy_matches(self.name_to_id.keys().map(String::as_str), query, limit)
    }

    /// Find the node whose scan-code (QR) payload equals `payload`.
    pub fn node_by_scan_code(&self, payload: &str) -> Option<&Node> {
        self.nodes_sorted()
            .into_iter()
            .find(|node| node.scan_code.as_deref() == Some(payload))
    }

    /// Nodes in the given building and/or floor, ordered by identifier.
    pub fn nodes_by_location(
        &self,
        building: Option<BuildingId>,
        floor: Option<FloorId>,
    ) -> Vec<&Node> {
        self.nodes_sorted()
            .into_iter()
            .filter(|node| building.map_or(true, |b| node.building_id == Some(b)))
            .filter(|node| floor.map_or(true, |f| node.floor_id == Some(f)))
            .collect()
    }

    /// Nodes of a building that touch an elevator or staircase edge.
    pub fn floor_transition_nodes(&self, building: BuildingId) -> Vec<&Node> {
        self.nodes_sorted()
            .into_iter()
            .filter(|node| node.building_id == Some(building))
            .filter(|node| {
                self.incident_edges(node.id)
                    .any(|edge| edge.kind.is_floor_transition())
            })
            .collect()
    }
}

impl GraphProvider for CampusGraph {
    fn node(&self, id: NodeId) -> Result<Option<Node>> {
        Ok(self.nodes.get(&id).cloned())
    }

    fn neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        Ok(self.incident_edges(id).cloned().collect())
    }

    fn accessible_neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        Ok(self
            .incident_edges(id)
            .filter(|edge| edge.kind != EdgeKind::Stairs)
            .filter(|edge| {
                edge.other_endpoint(id)
                    .and_then(|other| self.nodes.get(&other))
                    .is_some_and(|node| node.accessible)
            })
            .cloned()
            .collect())
    }
}

/// Accumulates nodes and edges and validates them into a [`CampusGraph`].
#[derive(Debug, Default)]
pub struct CampusGraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    allow_dangling: bool,
}

impl CampusGraphBuilder {
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Keep edges whose endpoints are missing instead of rejecting them.
    pub fn allow_dangling_edges(mut self) -> Self {
        self.allow_dangling = true;
        self
    }

    pub fn build(self) -> Result<CampusGraph> {
        let mut nodes = HashMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(Error::DuplicateNode { id });
            }
        }

        let mut seen_edges = HashSet::with_capacity(self.edges.len());
        let mut incident: HashMap<NodeId, Vec<usize>> = HashMap::new();
        let mut dangling = 0usize;
        for (index, edge) in self.edges.iter().enumerate() {
            edge.validate()?;
            if !seen_edges.insert(edge.id) {
                return Err(Error::DuplicateEdge { id: edge.id });
            }
            for endpoint in [edge.from_node_id, edge.to_node_id] {
                if !nodes.contains_key(&endpoint) {
                    if !self.allow_dangling {
                        return Err(Error::DanglingEdge {
                            edge: edge.id,
                            node: endpoint,
                        });
                    }
                    dangling += 1;
                }
            }
            incident.entry(edge.from_node_id).or_default().push(index);
            incident.entry(edge.to_node_id).or_default().push(index);
        }

        if dangling > 0 {
            warn!(dangling, "campus graph keeps edges referencing unknown nodes");
        }

        let mut name_to_id: HashMap<String, NodeId> = HashMap::new();
        let mut ordered: Vec<&Node> = nodes.values().collect();
        ordered.sort_by_key(|node| node.id);
        for node in ordered {
            if let Some(name) = &node.name {
                name_to_id.entry(name.clone()).or_insert(node.id);
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = self.edges.len(),
            "built campus graph"
        );

        Ok(CampusGraph {
            nodes: Arc::new(nodes),
            edges: Arc::new(self.edges),
            incident: Arc::new(incident),
            name_to_id: Arc::new(name_to_id),
        })
    }
}

pub(crate) fn fuzzy_matches<'a>(
    candidates: impl Iterator<Item = &'a str>,
    query: &str,
    limit: usize,
) -> Vec<String> {
    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .map(|candidate| {
            let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
        .collect();
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}
