//! Per-frame visual-state resolution.
//!
//! `resolve_node` and `resolve_edge` are pure functions called once per
//! element on every render pass, so they must stay cheap and
//! allocation-free. All interaction state arrives as one explicit
//! immutable [`InteractionState`] snapshot; the resolver never reads or
//! mutates anything shared.
//!
//! Resolution is priority-ordered and first-match-wins:
//!
//! 1. **Blast radius** — impact emphasis; unmapped elements keep their
//!    default presentation (emphasis only, no suppression of the rest)
//! 2. **Highlight set** — only when no blast map is present
//! 3. **Selection** — only when neither of the above is present
//! 4. **Default** — builder-assigned attributes
//!
//! Label and edge-kind visibility apply afterwards as an independent
//! hidden gate, whatever rule matched. Hidden is a separate boolean so a
//! renderer can skip the element entirely.

use std::collections::{HashMap, HashSet};

use crate::builder::style::Color;
use crate::builder::PositionedGraph;
use crate::filter::{EdgeKindFilter, LabelFilter};

/// Fraction of the original color kept when dimming non-members of the
/// highlight set.
const HIGHLIGHT_DIM_KEEP: f32 = 0.3;

/// Fraction kept when dimming everything outside a selection.
const SELECTION_DIM_KEEP: f32 = 0.25;

/// Fraction kept for edges unrelated to the blast radius.
const BLAST_EDGE_DIM_KEEP: f32 = 0.15;

/// Width multiplier for edges connecting two blast-mapped nodes.
const BLAST_EDGE_WIDTH: f32 = 3.0;

/// Width multiplier for edges touching the selected node.
const SELECTION_EDGE_WIDTH: f32 = 4.0;

/// Top of the z-order space.
const Z_TOP: i32 = 3;

/// Mid z-order for secondary emphasis (neighbors, highlight members).
const Z_MID: i32 = 2;

/// Theme parameters consumed by dimming.
///
/// The background is an explicit parameter rather than a hard-coded dark
/// constant so light themes dim toward their own canvas color.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Canvas background color; dimming blends element colors toward it
    pub background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::new(0x0b, 0x0e, 0x14),
        }
    }
}

/// Immutable snapshot of global interaction state for one render pass.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    /// Node id to impact depth, seeded from the latest impact report.
    /// Non-empty wins the priority order outright.
    pub blast_radius: HashMap<String, u32>,
    /// Node ids to emphasize (search hits, hovered community, ...)
    pub highlight: HashSet<String>,
    /// The selected node id, if any
    pub selected: Option<String>,
    /// Node-kind allow-set; `None` disables the gate
    pub labels: Option<LabelFilter>,
    /// Edge-kind allow-set; `None` disables the gate
    pub edge_kinds: Option<EdgeKindFilter>,
    /// Focus neighborhood; elements outside it are hidden. `None`
    /// disables the gate
    pub focus: Option<HashSet<String>>,
}

impl InteractionState {
    /// Drop every per-interaction override, keeping the visibility gates.
    pub fn clear_emphasis(&mut self) {
        self.blast_radius.clear();
        self.highlight.clear();
        self.selected = None;
    }
}

/// Resolved per-frame attributes for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeAttributes {
    /// Render color
    pub color: Color,
    /// Render size
    pub size: f32,
    /// Paint order; higher paints on top
    pub z_order: i32,
    /// Whether the renderer should skip this node entirely
    pub hidden: bool,
}

/// Resolved per-frame attributes for an edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeAttributes {
    /// Render color
    pub color: Color,
    /// Stroke width
    pub width: f32,
    /// Paint order; higher paints on top
    pub z_order: i32,
    /// Whether the renderer should skip this edge entirely
    pub hidden: bool,
}

/// Blast tier color: depth 1 red, depth 2 orange, deeper yellow.
fn blast_color(depth: u32) -> Color {
    match depth {
        0 | 1 => Color::new(0xef, 0x44, 0x44),
        2 => Color::new(0xf9, 0x73, 0x16),
        _ => Color::new(0xea, 0xb3, 0x08),
    }
}

/// Blast tier size multiplier; shallower impact is bigger.
fn blast_size(depth: u32) -> f32 {
    match depth {
        0 | 1 => 2.0,
        2 => 1.6,
        _ => 1.3,
    }
}

/// Blast tier z-order: `3 - depth`, so shallower impact paints on top.
#[allow(clippy::cast_possible_wrap)]
fn blast_z(depth: u32) -> i32 {
    Z_TOP - depth.min(3) as i32
}

/// Resolve the render attributes for the node at `index`.
#[must_use]
pub fn resolve_node(
    graph: &PositionedGraph,
    index: usize,
    state: &InteractionState,
    theme: &Theme,
) -> NodeAttributes {
    let node = graph.node(index);
    let mut attrs = NodeAttributes {
        color: node.color,
        size: node.size,
        z_order: 0,
        hidden: false,
    };

    if !state.blast_radius.is_empty() {
        // Emphasis only: nodes outside the map keep their defaults.
        if let Some(&depth) = state.blast_radius.get(&node.node.id) {
            attrs.color = blast_color(depth);
            attrs.size = node.size * blast_size(depth);
            attrs.z_order = blast_z(depth);
        }
    } else if !state.highlight.is_empty() {
        if state.highlight.contains(&node.node.id) {
            attrs.size = node.size * 1.5;
            attrs.z_order = Z_MID;
        } else {
            attrs.color = node.color.blend_toward(theme.background, HIGHLIGHT_DIM_KEEP);
            attrs.size = node.size * 0.5;
        }
    } else if let Some(selected) = state.selected.as_deref() {
        if node.node.id == selected {
            attrs.size = node.size * 1.8;
            attrs.z_order = Z_TOP;
        } else if graph
            .node_index(selected)
            .is_some_and(|sel| graph.is_adjacent(sel, index))
        {
            attrs.size = node.size * 1.3;
            attrs.z_order = Z_MID;
        } else {
            attrs.color = node.color.blend_toward(theme.background, SELECTION_DIM_KEEP);
            attrs.size = node.size * 0.6;
        }
    }

    if let Some(labels) = &state.labels {
        if !labels.allows(node.node.kind) {
            attrs.hidden = true;
        }
    }
    if let Some(focus) = &state.focus {
        if !focus.contains(&node.node.id) {
            attrs.hidden = true;
        }
    }

    attrs
}

/// Resolve the render attributes for the edge at `index`.
#[must_use]
pub fn resolve_edge(
    graph: &PositionedGraph,
    index: usize,
    state: &InteractionState,
    theme: &Theme,
) -> EdgeAttributes {
    let edge = &graph.edges()[index];
    let source_id = &graph.node(edge.source).node.id;
    let target_id = &graph.node(edge.target).node.id;
    let mut attrs = EdgeAttributes {
        color: edge.color,
        width: edge.width,
        z_order: 0,
        hidden: false,
    };

    if !state.blast_radius.is_empty() {
        let source_depth = state.blast_radius.get(source_id);
        let target_depth = state.blast_radius.get(target_id);
        match (source_depth, target_depth) {
            (Some(_), Some(_)) => {
                attrs.color = blast_color(1);
                attrs.width = edge.width * BLAST_EDGE_WIDTH;
                attrs.z_order = Z_MID;
            }
            (None, None) => {
                attrs.color = edge.color.blend_toward(theme.background, BLAST_EDGE_DIM_KEEP);
            }
            // One mapped endpoint: neither emphasized nor suppressed.
            _ => {}
        }
    } else if !state.highlight.is_empty() {
        if state.highlight.contains(source_id) && state.highlight.contains(target_id) {
            attrs.width = edge.width * 1.5;
            attrs.z_order = Z_MID;
        } else {
            attrs.color = edge.color.blend_toward(theme.background, HIGHLIGHT_DIM_KEEP);
            attrs.width = edge.width * 0.5;
        }
    } else if let Some(selected) = state.selected.as_deref() {
        if source_id == selected || target_id == selected {
            attrs.width = edge.width * SELECTION_EDGE_WIDTH;
            attrs.z_order = Z_TOP;
        } else {
            attrs.color = edge.color.blend_toward(theme.background, SELECTION_DIM_KEEP);
            attrs.width = edge.width * 0.5;
        }
    }

    if let Some(edge_kinds) = &state.edge_kinds {
        if !edge_kinds.allows(edge.kind) {
            attrs.hidden = true;
        }
    }
    if let Some(focus) = &state.focus {
        if !focus.contains(source_id) || !focus.contains(target_id) {
            attrs.hidden = true;
        }
    }

    attrs
}
