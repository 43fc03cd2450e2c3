use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{BuildingId, EdgeKind, FloorId, NodeId};
use crate::route::RouteResult;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteEndpoint {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteEndpoint {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Step taken during traversal of a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<EdgeKind>,
    pub instruction: String,
    pub distance: f64,
    pub duration_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<FloorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
}

impl RouteStep {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

/// Flattened, serialisable view of a [`RouteResult`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub accessible_requested: bool,
    pub accessibility_compatible: bool,
    pub hops: usize,
    pub total_distance: f64,
    pub total_duration_seconds: u64,
    pub floors: Vec<FloorId>,
    pub buildings: Vec<BuildingId>,
    pub start: RouteEndpoint,
    pub goal: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`RouteResult`] into a structured summary.
    pub fn from_route(route: &RouteResult, accessible_requested: bool) -> Result<Self> {
        let (Some(first), Some(last)) = (route.path.first(), route.path.last()) else {
            return Err(Error::EmptyRoute);
        };

        let steps = route
            .path
            .iter()
            .enumerate()
            .map(|(index, step)| RouteStep {
                index,
                id: step.node.id,
                name: step.node.name.clone(),
                via: step.edge.as_ref().map(|edge| edge.kind),
                instruction: step.instruction.clone(),
                distance: step.distance,
                duration_seconds: step.duration_seconds,
                floor_id: step.node.floor_id,
                building_id: step.node.building_id,
            })
            .collect();

        Ok(Self {
            accessible_requested,
            accessibility_compatible: route.accessibility_compatible,
            hops: route.hop_count(),
            total_distance: route.total_distance,
            total_duration_seconds: route.total_duration_seconds,
            floors: route.floors_involved.iter().copied().collect(),
            buildings: route.buildings_involved.iter().copied().collect(),
            start: RouteEndpoint {
                id: first.node.id,
                name: first.node.name.clone(),
            },
            goal: RouteEndpoint {
                id: last.node.id,
                name: last.node.name.clone(),
            },
            steps,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, {:.1} units, ~{})",
            self.start.display_name(),
            self.goal.display_name(),
            self.hops,
            self.total_distance,
            format_duration(self.total_duration_seconds)
        );
        let _ = writeln!(
            buffer,
            "Accessible: {}{}",
            yes_no(self.accessibility_compatible),
            if self.accessible_requested {
                " (requested)"
            } else {
                ""
            }
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: {} ({}) - {}",
                step.index,
                step.display_name(),
                step.id,
                step.instruction
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ ({} hops, {:.1} units, ~{})",
            self.start.display_name(),
            self.goal.display_name(),
            self.hops,
            self.total_distance,
            format_duration(self.total_duration_seconds)
        );
        if !self.floors.is_empty() {
            let floors = self
                .floors
                .iter()
                .map(|floor| floor.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(buffer, "Floors: {floors}");
        }
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "* {:>2}. **{}** (`{}`) {}",
                step.index,
                step.display_name(),
                step.id,
                step.instruction
            );
        }
        buffer
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Format whole seconds as `45s` or `3m 05s`.
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else {
        format!("{}m {:02}s", seconds / 60, seconds % 60)
    }
}
