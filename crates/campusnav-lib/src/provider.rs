//! Contract between the routing core and whatever stores the campus graph.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{Edge, Node, NodeId};

/// Read-only source of nodes and their incident edges.
///
/// Implementations must be safe to share between concurrent searches. Every
/// method may fail with [`crate::Error::ProviderUnavailable`] (or a storage
/// error); the search engine propagates such failures without retrying.
///
/// Incident edges may be returned in their stored orientation: the engine
/// orients each edge relative to the node being expanded before using it.
pub trait GraphProvider: Send + Sync {
    /// Look up a node, returning `Ok(None)` when it does not exist.
    fn node(&self, id: NodeId) -> Result<Option<Node>>;

    /// Every edge incident to `id`, whichever endpoint it is stored under.
    fn neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>>;

    /// Incident edges that are not stairs and whose opposite endpoint is an
    /// accessible node.
    fn accessible_neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>>;
}

impl<P: GraphProvider + ?Sized> GraphProvider for &P {
    fn node(&self, id: NodeId) -> Result<Option<Node>> {
        (**self).node(id)
    }

    fn neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        (**self).neighbor_edges(id)
    }

    fn accessible_neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        (**self).accessible_neighbor_edges(id)
    }
}

impl<P: GraphProvider + ?Sized> GraphProvider for Arc<P> {
    fn node(&self, id: NodeId) -> Result<Option<Node>> {
        (**self).node(id)
    }

    fn neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        (**self).neighbor_edges(id)
    }

    fn accessible_neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        (**self).accessible_neighbor_edges(id)
    }
}

impl<P: GraphProvider + ?Sized> GraphProvider for Box<P> {
    fn node(&self, id: NodeId) -> Result<Option<Node>> {
        (**self).node(id)
    }

    fn neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        (**self).neighbor_edges(id)
    }

    fn accessible_neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        (**self).accessible_neighbor_edges(id)
    }
}
