//! Orientation of stored edges relative to the direction of travel.
//!
//! Providers may hand back an edge stored as `B -> A` while the search is
//! expanding `A`. Such an edge is flipped to `A -> B` and its instruction
//! text rewritten so that wording matches the direction actually walked.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::model::{Edge, Node, NodeId};

static CLIMB_STAIRS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bclimb stairs from (.+) to (.+)").expect("valid regex"));
static DESCEND_STAIRS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bdescend stairs from (.+) to (.+)").expect("valid regex"));
static ELEVATOR_BETWEEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btake elevator from (.+) to (.+)").expect("valid regex"));
static WALK_TO_FROM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bwalk to (.+) from (.+)").expect("valid regex"));
static TURN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bturn (.+) to (.+)").expect("valid regex"));
static FROM_TO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfrom (.+) to (.+)").expect("valid regex"));

/// Names of a stored edge's endpoints, used to retarget destination-only
/// instructions such as "Walk to Library".
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointNames<'a> {
    /// Name of the node the edge is stored as leaving.
    pub stored_from: Option<&'a str>,
    /// Name of the node the edge is stored as reaching.
    pub stored_to: Option<&'a str>,
}

/// An edge oriented away from the node being expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedEdge {
    edge: Edge,
    reversed: bool,
}

impl OrientedEdge {
    /// Node reached by walking this edge.
    pub fn target(&self) -> NodeId {
        self.edge.to_node_id
    }

    /// Whether the stored record was traversed against its orientation.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn edge(&self) -> &Edge {
        &self.edge
    }

    /// Finish normalisation once both endpoint nodes are known, rewriting the
    /// instruction when the edge was reversed.
    pub fn into_edge(mut self, origin: &Node, destination: &Node) -> Edge {
        if self.reversed {
            let names = EndpointNames {
                stored_from: destination.name.as_deref(),
                stored_to: origin.name.as_deref(),
            };
            self.edge.instruction = self
                .edge
                .instruction
                .as_deref()
                .map(|text| reverse_instruction(text, names));
        }
        self.edge
    }
}

/// Orient `edge` so that it leaves `origin`.
///
/// Returns `None` when `origin` is not an endpoint of the edge, or the edge
/// is a self-loop.
pub fn orient_edge(mut edge: Edge, origin: NodeId) -> Option<OrientedEdge> {
    if edge.is_self_loop() {
        return None;
    }
    if edge.from_node_id == origin {
        return Some(OrientedEdge {
            edge,
            reversed: false,
        });
    }
    if edge.to_node_id == origin {
        std::mem::swap(&mut edge.from_node_id, &mut edge.to_node_id);
        return Some(OrientedEdge {
            edge,
            reversed: true,
        });
    }
    None
}

/// Rewrite an instruction for travel against the stored direction.
///
/// The first matching phrase wins. Text that matches no directional phrase
/// is returned unchanged.
pub fn reverse_instruction(text: &str, names: EndpointNames<'_>) -> String {
    let rules: [(&Regex, fn(&Captures<'_>) -> String); 6] = [
        (&*CLIMB_STAIRS, |c: &Captures<'_>| {
            format!("Descend stairs from {} to {}", &c[2], &c[1])
        }),
        (&*DESCEND_STAIRS, |c: &Captures<'_>| {
            format!("Climb stairs from {} to {}", &c[2], &c[1])
        }),
        (&*ELEVATOR_BETWEEN, |c: &Captures<'_>| {
            format!("Take elevator from {} to {}", &c[2], &c[1])
        }),
        (&*WALK_TO_FROM, |c: &Captures<'_>| {
            format!("Walk to {} from {}", &c[2], &c[1])
        }),
        (&*TURN, |c: &Captures<'_>| {
            format!("Walk from {} and turn opposite direction", &c[2])
        }),
        (&*FROM_TO, |c: &Captures<'_>| format!("from {} to {}", &c[2], &c[1])),
    ];
    for (pattern, rewrite) in rules {
        if pattern.is_match(text) {
            return pattern
                .replace(text, |caps: &Captures<'_>| match_case(&caps[0], rewrite(caps)))
                .into_owned();
        }
    }
    retarget_destination(text, names).unwrap_or_else(|| text.to_string())
}

/// Give `replacement` the same leading-letter case as the phrase it replaces.
fn match_case(matched: &str, replacement: String) -> String {
    let lower = matched.chars().next().is_some_and(char::is_lowercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if lower => first.to_lowercase().chain(chars).collect(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Walk to B" becomes "Walk to A" when B and A are the stored endpoints.
fn retarget_destination(text: &str, names: EndpointNames<'_>) -> Option<String> {
    let (Some(old_target), Some(new_target)) = (names.stored_to, names.stored_from) else {
        return None;
    };
    let suffix = format!(" to {old_target}");
    let stem = text.strip_suffix(&suffix)?;
    Some(format!("{stem} to {new_target}"))
}
