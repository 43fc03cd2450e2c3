use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::{fuzzy_matches, CampusGraph, GraphDocument};
use crate::model::{Attributes, BuildingId, Edge, FloorId, Node, NodeId, Position};
use crate::provider::GraphProvider;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS nodes (
    id INTEGER PRIMARY KEY,
    name TEXT,
    type TEXT NOT NULL,
    floor_id INTEGER,
    building_id INTEGER,
    x REAL,
    y REAL,
    is_accessible INTEGER NOT NULL DEFAULT 1,
    qr_code_payload TEXT,
    attributes TEXT
);
CREATE TABLE IF NOT EXISTS edges (
    id INTEGER PRIMARY KEY,
    from_node_id INTEGER NOT NULL,
    to_node_id INTEGER NOT NULL,
    weight REAL,
    type TEXT NOT NULL,
    instructions TEXT,
    attributes TEXT,
    CHECK (from_node_id <> to_node_id)
);
CREATE INDEX IF NOT EXISTS edges_from_node_idx ON edges(from_node_id);
CREATE INDEX IF NOT EXISTS edges_to_node_idx ON edges(to_node_id);
CREATE INDEX IF NOT EXISTS nodes_qr_code_idx ON nodes(qr_code_payload);
";

const NODE_COLUMNS: &str = "n.id, n.name, n.type, n.floor_id, n.building_id, n.x, n.y, \
     n.is_accessible, n.qr_code_payload, n.attributes";
const EDGE_COLUMNS: &str =
    "e.id, e.from_node_id, e.to_node_id, e.weight, e.type, e.instructions, e.attributes";

/// [`GraphProvider`] backed by a SQLite campus database.
///
/// Every lookup runs its own query, so nothing is preloaded; the connection
/// sits behind a mutex so one provider can serve concurrent searches.
#[derive(Debug)]
pub struct SqliteGraphProvider {
    connection: Mutex<Connection>,
}

impl SqliteGraphProvider {
    /// Open an existing campus database without write access.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )?;
        verify_schema(&connection)?;
        debug!(path = %path.display(), "opened campus database");
        Ok(Self::from_connection(connection))
    }

    /// Open (or create) a campus database for writing, creating the schema
    /// when missing.
    pub fn create(path: &Path) -> Result<Self> {
        let connection = Connection::open(path)?;
        create_schema(&connection)?;
        info!(path = %path.display(), "initialised campus database");
        Ok(Self::from_connection(connection))
    }

    /// Fresh in-memory database with the schema applied.
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        create_schema(&connection)?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| Error::ProviderUnavailable {
                message: "sqlite connection lock poisoned".to_string(),
            })
    }

    /// Insert a node record.
    pub fn insert_node(&self, node: &Node) -> Result<()> {
        let connection = self.connection()?;
        insert_node(&connection, node)
    }

    /// Insert an edge record after validating it and its endpoints.
    pub fn insert_edge(&self, edge: &Edge) -> Result<()> {
        let connection = self.connection()?;
        insert_edge(&connection, edge)
    }

    /// Validate a graph document and write it in a single transaction.
    pub fn import_document(&self, document: &GraphDocument) -> Result<()> {
        CampusGraph::from_parts(document.nodes.clone(), document.edges.clone())?;

        let mut connection = self.connection()?;
        let tx = connection.transaction()?;
        for node in &document.nodes {
            insert_node(&tx, node)?;
        }
        for edge in &document.edges {
            insert_edge(&tx, edge)?;
        }
        tx.commit()?;
        info!(
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "imported campus graph"
        );
        Ok(())
    }

    /// Find the node whose scan-code (QR) payload equals `payload`.
    pub fn node_by_scan_code(&self, payload: &str) -> Result<Option<Node>> {
        let connection = self.connection()?;
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes n WHERE n.qr_code_payload = ?1 ORDER BY n.id LIMIT 1"
        );
        let row = connection
            .query_row(&sql, [payload], read_node_row)
            .optional()?;
        row.map(NodeRow::into_node).transpose()
    }

    /// Nodes in the given building and/or floor, ordered by identifier.
    pub fn nodes_by_location(
        &self,
        building: Option<BuildingId>,
        floor: Option<FloorId>,
    ) -> Result<Vec<Node>> {
        let connection = self.connection()?;
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes n \
             WHERE (?1 IS NULL OR n.building_id = ?1) AND (?2 IS NULL OR n.floor_id = ?2) \
             ORDER BY n.id"
        );
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map(params![building, floor], read_node_row)?;
        collect_nodes(rows)
    }

    /// Nodes of a building that touch an elevator or staircase edge.
    pub fn floor_transition_nodes(&self, building: BuildingId) -> Result<Vec<Node>> {
        let connection = self.connection()?;
        let sql = format!(
            "SELECT DISTINCT {NODE_COLUMNS} FROM nodes n \
             JOIN edges e ON e.from_node_id = n.id OR e.to_node_id = n.id \
             WHERE n.building_id = ?1 \
               AND lower(e.type) IN ('elevator', 'stairs', 'staircase') \
             ORDER BY n.id"
        );
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map([building], read_node_row)?;
        collect_nodes(rows)
    }

    /// Resolve a node name (exact match, lowest id wins) or fail with
    /// fuzzy suggestions.
    pub fn resolve_node_name(&self, name: &str) -> Result<NodeId> {
        let connection = self.connection()?;
        let found: Option<NodeId> = connection
            .query_row(
                "SELECT id FROM nodes WHERE name = ?1 ORDER BY id LIMIT 1",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = found {
            return Ok(id);
        }

        let mut stmt = connection.prepare("SELECT DISTINCT name FROM nodes WHERE name IS NOT NULL")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Err(Error::UnknownNode {
            name: name.to_string(),
            suggestions: fuzzy_matches(names.iter().map(String::as_str), name, 3),
        })
    }

    /// Materialise the whole database as an in-memory [`CampusGraph`].
    ///
    /// Self-loops and edges whose endpoints are missing are dropped with a
    /// warning rather than failing the load.
    pub fn load_campus_graph(&self) -> Result<CampusGraph> {
        let connection = self.connection()?;

        let sql = format!("SELECT {NODE_COLUMNS} FROM nodes n ORDER BY n.id");
        let mut stmt = connection.prepare(&sql)?;
        let nodes = collect_nodes(stmt.query_map([], read_node_row)?)?;

        let sql = format!("SELECT {EDGE_COLUMNS} FROM edges e ORDER BY e.id");
        let mut stmt = connection.prepare(&sql)?;
        let edges = collect_edges(stmt.query_map([], read_edge_row)?)?;

        let known: std::collections::HashSet<NodeId> = nodes.iter().map(|node| node.id).collect();
        let total_edges = edges.len();
        let edges: Vec<Edge> = edges
            .into_iter()
            .filter(|edge| {
                !edge.is_self_loop()
                    && known.contains(&edge.from_node_id)
                    && known.contains(&edge.to_node_id)
            })
            .collect();

        let skipped_edges = total_edges - edges.len();
        if skipped_edges > 0 {
            warn!(skipped_edges, "ignored edges referencing unknown nodes or looping");
        }

        CampusGraph::from_parts(nodes, edges)
    }
}

impl GraphProvider for SqliteGraphProvider {
    fn node(&self, id: NodeId) -> Result<Option<Node>> {
        let connection = self.connection()?;
        let sql = format!("SELECT {NODE_COLUMNS} FROM nodes n WHERE n.id = ?1");
        let row = connection.query_row(&sql, [id], read_node_row).optional()?;
        row.map(NodeRow::into_node).transpose()
    }

    fn neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        let connection = self.connection()?;
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM edges e \
             WHERE e.from_node_id = ?1 OR e.to_node_id = ?1 ORDER BY e.id"
        );
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map([id], read_edge_row)?;
        collect_edges(rows)
    }

    fn accessible_neighbor_edges(&self, id: NodeId) -> Result<Vec<Edge>> {
        let connection = self.connection()?;
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM edges e \
             JOIN nodes n ON n.id = CASE WHEN e.from_node_id = ?1 THEN e.to_node_id ELSE e.from_node_id END \
             WHERE (e.from_node_id = ?1 OR e.to_node_id = ?1) \
               AND COALESCE(n.is_accessible, 1) = 1 \
               AND lower(e.type) NOT IN ('stairs', 'staircase') \
             ORDER BY e.id"
        );
        let mut stmt = connection.prepare(&sql)?;
        let rows = stmt.query_map([id], read_edge_row)?;
        collect_edges(rows)
    }
}

/// Create the `nodes` and `edges` tables when they do not exist yet.
pub fn create_schema(connection: &Connection) -> Result<()> {
    connection.execute_batch(SCHEMA)?;
    Ok(())
}

fn verify_schema(connection: &Connection) -> Result<()> {
    for table in ["nodes", "edges"] {
        if !table_exists(connection, table)? {
            return Err(Error::MissingTable { table });
        }
    }
    Ok(())
}

fn table_exists(connection: &Connection, table: &str) -> Result<bool> {
    let mut stmt = connection
        .prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1 LIMIT 1")?;
    let mut rows = stmt.query([table])?;
    Ok(rows.next()?.is_some())
}

fn insert_node(connection: &Connection, node: &Node) -> Result<()> {
    connection.execute(
        "INSERT INTO nodes (id, name, type, floor_id, building_id, x, y, is_accessible, qr_code_payload, attributes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            node.id,
            node.name,
            node.kind.as_str(),
            node.floor_id,
            node.building_id,
            node.position.x,
            node.position.y,
            node.accessible,
            node.scan_code,
            encode_attributes(&node.attributes)?,
        ],
    )?;
    Ok(())
}

fn insert_edge(connection: &Connection, edge: &Edge) -> Result<()> {
    edge.validate()?;
    for endpoint in [edge.from_node_id, edge.to_node_id] {
        let exists = connection
            .query_row("SELECT 1 FROM nodes WHERE id = ?1", [endpoint], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(Error::DanglingEdge {
                edge: edge.id,
                node: endpoint,
            });
        }
    }

    connection.execute(
        "INSERT INTO edges (id, from_node_id, to_node_id, weight, type, instructions, attributes) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            edge.id,
            edge.from_node_id,
            edge.to_node_id,
            edge.weight,
            edge.kind.as_str(),
            edge.instruction,
            encode_attributes(&edge.attributes)?,
        ],
    )?;
    Ok(())
}

fn encode_attributes(attributes: &Attributes) -> Result<Option<String>> {
    if attributes.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(attributes)?))
}

fn decode_attributes(raw: Option<String>) -> Result<Attributes> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(Attributes::new()),
        Some(text) => Ok(serde_json::from_str(text)?),
    }
}

struct NodeRow {
    id: NodeId,
    name: Option<String>,
    kind: String,
    floor_id: Option<FloorId>,
    building_id: Option<BuildingId>,
    x: Option<f64>,
    y: Option<f64>,
    accessible: Option<bool>,
    scan_code: Option<String>,
    attributes: Option<String>,
}

impl NodeRow {
    fn into_node(self) -> Result<Node> {
        Ok(Node {
            id: self.id,
            name: self.name,
            kind: self.kind.parse()?,
            floor_id: self.floor_id,
            building_id: self.building_id,
            position: Position {
                x: self.x,
                y: self.y,
            },
            // NULL follows the column default; the accessible edge query agrees.
            accessible: self.accessible.unwrap_or(true),
            scan_code: self.scan_code,
            attributes: decode_attributes(self.attributes)?,
        })
    }
}

fn read_node_row(row: &Row<'_>) -> rusqlite::Result<NodeRow> {
    Ok(NodeRow {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        floor_id: row.get(3)?,
        building_id: row.get(4)?,
        x: row.get(5)?,
        y: row.get(6)?,
        accessible: row.get(7)?,
        scan_code: row.get(8)?,
        attributes: row.get(9)?,
    })
}

struct EdgeRow {
    id: i64,
    from_node_id: NodeId,
    to_node_id: NodeId,
    weight: Option<f64>,
    kind: String,
    instruction: Option<String>,
    attributes: Option<String>,
}

impl EdgeRow {
    fn into_edge(self) -> Result<Edge> {
        Ok(Edge {
            id: self.id,
            from_node_id: self.from_node_id,
            to_node_id: self.to_node_id,
            weight: self.weight,
            kind: self.kind.parse()?,
            instruction: self.instruction,
            attributes: decode_attributes(self.attributes)?,
        })
    }
}

fn read_edge_row(row: &Row<'_>) -> rusqlite::Result<EdgeRow> {
    Ok(EdgeRow {
        id: row.get(0)?,
        from_node_id: row.get(1)?,
        to_node_id: row.get(2)?,
        weight: row.get(3)?,
        kind: row.get(4)?,
        instruction: row.get(5)?,
        attributes: row.get(6)?,
    })
}

fn collect_nodes(
    rows: impl Iterator<Item = rusqlite::Result<NodeRow>>,
) -> Result<Vec<Node>> {
    rows.map(|row| row.map_err(Error::from).and_then(NodeRow::into_node))
        .collect()
}

fn collect_edges(
    rows: impl Iterator<Item = rusqlite::Result<EdgeRow>>,
) -> Result<Vec<Edge>> {
    rows.map(|row| row.map_err(Error::from).and_then(EdgeRow::into_edge))
        .collect()
}
