use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Numeric identifier for a navigational node.
pub type NodeId = i64;
/// Numeric identifier for a stored edge.
pub type EdgeId = i64;
/// Identifier of a floor plan.
pub type FloorId = i64;
/// Identifier of a building.
pub type BuildingId = i64;

/// Free-form attribute bag attached to nodes and edges.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Attribute key that may flag an edge as not wheelchair-traversable.
pub const EDGE_ACCESSIBLE_ATTRIBUTE: &str = "is_accessible";

/// Planar coordinates of a node. Either axis may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// Position with both axes unknown.
    pub fn unknown() -> Self {
        Self { x: None, y: None }
    }

    /// Both coordinates, or `None` when either axis is unknown.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }

    /// Calculate the Euclidean distance to another position, when both are known.
    pub fn distance_to(&self, other: &Self) -> Option<f64> {
        let (x1, y1) = self.coordinates()?;
        let (x2, y2) = other.coordinates()?;
        let dx = x1 - x2;
        let dy = y1 - y2;
        Some((dx * dx + dy * dy).sqrt())
    }
}

/// Category of a navigational node.
///
/// Deserialisation goes through [`FromStr`], so the storage vocabulary
/// (`FOOD_COURT`, `EMERGENCY_EXIT`, ...) is accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Room,
    /// Point of interest, checkpoint or corridor junction.
    Checkpoint,
    /// Entrance or exit, including emergency exits.
    Entrance,
    /// Food court, bathroom or other service point.
    ServicePoint,
    Staircase,
    Elevator,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Room => "room",
            NodeKind::Checkpoint => "checkpoint",
            NodeKind::Entrance => "entrance",
            NodeKind::ServicePoint => "service_point",
            NodeKind::Staircase => "staircase",
            NodeKind::Elevator => "elevator",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let kind = match value.trim().to_ascii_lowercase().as_str() {
            "room" => NodeKind::Room,
            "checkpoint" | "point_of_interest" | "junction" => NodeKind::Checkpoint,
            "entrance" | "exit" | "emergency_exit" => NodeKind::Entrance,
            "service_point" | "food_court" | "bathroom" => NodeKind::ServicePoint,
            "staircase" => NodeKind::Staircase,
            "elevator" => NodeKind::Elevator,
            _ => {
                return Err(Error::UnknownCategory {
                    entity: "node",
                    value: value.to_string(),
                })
            }
        };
        Ok(kind)
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Self>().map_err(de::Error::custom)
    }
}

/// Category of a connective edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Walkway,
    Stairs,
    Elevator,
    Door,
    OutdoorPath,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Walkway => "walkway",
            EdgeKind::Stairs => "stairs",
            EdgeKind::Elevator => "elevator",
            EdgeKind::Door => "door",
            EdgeKind::OutdoorPath => "outdoor_path",
        }
    }

    /// Whether the edge changes floor (stairs or elevator).
    pub fn is_floor_transition(self) -> bool {
        matches!(self, EdgeKind::Stairs | EdgeKind::Elevator)
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let kind = match value.trim().to_ascii_lowercase().as_str() {
            "walkway" | "hallway" => EdgeKind::Walkway,
            "stairs" | "staircase" => EdgeKind::Stairs,
            "elevator" => EdgeKind::Elevator,
            "door" => EdgeKind::Door,
            "outdoor_path" => EdgeKind::OutdoorPath,
            _ => {
                return Err(Error::UnknownCategory {
                    entity: "edge",
                    value: value.to_string(),
                })
            }
        };
        Ok(kind)
    }
}

impl<'de> Deserialize<'de> for EdgeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Self>().map_err(de::Error::custom)
    }
}

fn default_accessible() -> bool {
    true
}

/// Navigational point on the campus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<FloorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
    #[serde(default)]
    pub position: Position,
    /// Wheelchair-traversable.
    #[serde(default = "default_accessible")]
    pub accessible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_code: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl Node {
    /// Accessible node with unknown position and no floor/building.
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            name: None,
            kind,
            floor_id: None,
            building_id: None,
            position: Position::unknown(),
            accessible: true,
            scan_code: None,
            attributes: Attributes::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    pub fn on_floor(mut self, floor: FloorId) -> Self {
        self.floor_id = Some(floor);
        self
    }

    pub fn in_building(mut self, building: BuildingId) -> Self {
        self.building_id = Some(building);
        self
    }

    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn with_scan_code(mut self, payload: impl Into<String>) -> Self {
        self.scan_code = Some(payload.into());
        self
    }

    /// Name for display, falling back to `#<id>`.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id),
        }
    }
}

/// Directed connective record between two nodes.
///
/// Stored once per connection; the campus graph is logically bidirectional,
/// so traversal from `to_node_id` goes through [`crate::normalize`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(alias = "type")]
    pub kind: EdgeKind,
    #[serde(default, alias = "instructions", skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: Attributes,
}

impl Edge {
    pub fn new(id: EdgeId, from: NodeId, to: NodeId, kind: EdgeKind) -> Self {
        Self {
            id,
            from_node_id: from,
            to_node_id: to,
            weight: None,
            kind,
            instruction: None,
            attributes: Attributes::new(),
        }
    }

    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Stored weight, defaulting to 1 when unset.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    /// Accessibility flag carried in the attribute bag; absent means accessible.
    pub fn is_flagged_accessible(&self) -> bool {
        self.attributes
            .get(EDGE_ACCESSIBLE_ATTRIBUTE)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(true)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from_node_id == self.to_node_id
    }

    /// Endpoint opposite to `node`, or `None` when `node` is not an endpoint.
    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if self.from_node_id == node {
            Some(self.to_node_id)
        } else if self.to_node_id == node {
            Some(self.from_node_id)
        } else {
            None
        }
    }

    /// Reject self-loops and non-positive weights.
    pub fn validate(&self) -> Result<()> {
        if self.is_self_loop() {
            return Err(Error::SelfLoopEdge {
                edge: self.id,
                node: self.from_node_id,
            });
        }
        if let Some(weight) = self.weight {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(Error::InvalidWeight {
                    edge: self.id,
                    weight,
                });
            }
        }
        Ok(())
    }
}
