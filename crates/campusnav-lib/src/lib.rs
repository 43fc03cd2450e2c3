//! Campus navigation library entry points.
//!
//! This crate models a campus as a graph of rooms, corridors, stairs, and
//! elevators, and plans walking routes over it with an A* search. Graph data
//! comes from any [`GraphProvider`]: the in-memory [`CampusGraph`] or the
//! SQLite-backed [`SqliteGraphProvider`]. Higher-level consumers (CLI) should
//! only depend on the functions exported here instead of reimplementing
//! behavior.

pub mod cancel;
pub mod config;
pub mod cost;
pub mod dataset;
pub mod db;
pub mod error;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod output;
pub mod path;
pub mod provider;
pub mod route;

pub use cancel::CancellationToken;
pub use config::SearchConfig;
pub use dataset::{default_database_path, ensure_database, resolve_database_path};
pub use db::SqliteGraphProvider;
pub use error::{Error, Result};
pub use graph::{CampusGraph, CampusGraphBuilder, GraphDocument};
pub use model::{BuildingId, Edge, EdgeKind, FloorId, Node, NodeId, NodeKind, Position};
pub use output::{RouteRenderMode, RouteSummary};
pub use path::{find_route, RouteFinder, SearchStats};
pub use provider::GraphProvider;
pub use route::{PathStep, RouteResult};
