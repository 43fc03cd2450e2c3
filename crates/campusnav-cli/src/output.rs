//! Output formatting for routes and node listings.

use std::fmt::Write;

use anyhow::Result;
use campusnav_lib::{Node, RouteRenderMode, RouteSummary};
use clap::ValueEnum;

/// Presentation format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one line per step.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

/// Render a route summary.
pub fn render_route(summary: &RouteSummary, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => summary.render(RouteRenderMode::PlainText),
        OutputFormat::Rich => summary.render(RouteRenderMode::RichText),
        OutputFormat::Json => json_line(summary)?,
    })
}

/// Render a single node.
pub fn render_node(node: &Node, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return json_line(node);
    }

    let mut buffer = String::new();
    let _ = writeln!(buffer, "{} ({})", node.display_name(), node.id);
    let _ = writeln!(buffer, "  kind: {}", node.kind);
    if let Some(building) = node.building_id {
        let _ = writeln!(buffer, "  building: {building}");
    }
    if let Some(floor) = node.floor_id {
        let _ = writeln!(buffer, "  floor: {floor}");
    }
    if let Some((x, y)) = node.position.coordinates() {
        let _ = writeln!(buffer, "  position: ({x:.1}, {y:.1})");
    }
    let _ = writeln!(buffer, "  accessible: {}", if node.accessible { "yes" } else { "no" });
    if let Some(code) = &node.scan_code {
        let _ = writeln!(buffer, "  scan code: {code}");
    }
    Ok(buffer)
}

/// Render a list of nodes, one per line.
pub fn render_nodes(nodes: &[Node], format: OutputFormat) -> Result<String> {
    let mut buffer = String::new();
    match format {
        OutputFormat::Json => return json_line(nodes),
        OutputFormat::Text => {
            for node in nodes {
                let _ = writeln!(
                    buffer,
                    "{:>6}  {:<14} {}",
                    node.id,
                    node.kind.as_str(),
                    node.display_name()
                );
            }
        }
        OutputFormat::Rich => {
            for node in nodes {
                let _ = writeln!(
                    buffer,
                    "* **{}** (`{}`) _{}_{}",
                    node.display_name(),
                    node.id,
                    node.kind,
                    if node.accessible { "" } else { " (not accessible)" }
                );
            }
        }
    }
    if nodes.is_empty() && format != OutputFormat::Json {
        buffer.push_str("No nodes found\n");
    }
    Ok(buffer)
}

fn json_line<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}
