//! Graph construction: raw payload in, positioned and styled graph out.
//!
//! The builder follows a "best effort" philosophy: a pathological payload
//! never raises. Duplicate ids, dangling edges, self-edges, and malformed
//! confidences are dropped or clamped, counted in `BuildStats`, and the
//! graph renders whatever valid subset remains.
//!
//! The built graph is an arena: nodes live in one flat vector, identity is
//! resolved through an id index, and relationships are index lists. The
//! layout walk and every later traversal (focus, impact, adjacency checks)
//! run on indices without chasing pointers.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::{Community, EdgeKind, GraphData, Node, Process};

mod layout;
pub mod style;

use style::Color;

/// Curvature range assigned to edges to reduce multi-edge visual overlap.
///
/// Purely cosmetic; curvature must never feed into any other computation.
const CURVATURE_RANGE: std::ops::Range<f32> = 0.12..0.20;

/// Default layout seed. Builds with the same seed and payload produce
/// identical coordinates.
const DEFAULT_LAYOUT_SEED: u64 = 0x5eed_c0de;

/// Tuning knobs for graph construction.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    /// Seed for layout jitter and edge curvature
    pub seed: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_LAYOUT_SEED,
        }
    }
}

/// Accounting from one build: what was kept, what was dropped, and why.
///
/// Data problems are counted here instead of being raised as errors.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Nodes added to the arena
    pub nodes_added: usize,
    /// Nodes dropped because their id was already present (first wins)
    pub duplicate_nodes: usize,
    /// Edges retained and styled
    pub edges_added: usize,
    /// Edges dropped because an endpoint was missing from the node set
    pub dangling_edges: usize,
    /// Edges dropped because source and target were the same node
    pub self_edges: usize,
    /// Edges dropped because their `(source, target)` pair was already
    /// present (first wins)
    pub duplicate_edges: usize,
    /// Confidences outside `[0, 1]` that were clamped on ingest
    pub clamped_confidences: usize,
    /// How long the build took
    pub duration: Duration,
}

/// A node with builder-assigned presentation.
///
/// Created once per build; `x`/`y` are thereafter owned by the external
/// physics refinement.
#[derive(Debug, Clone)]
pub struct PositionedNode {
    /// The underlying raw node
    pub node: Node,
    /// Seeded x coordinate
    pub x: f32,
    /// Seeded y coordinate
    pub y: f32,
    /// Render size, density-scaled
    pub size: f32,
    /// Builder-assigned color (kind table or community palette)
    pub color: Color,
    /// Community ordinal, derived from `MEMBER_OF` edges
    pub community: Option<usize>,
}

/// An edge with builder-assigned presentation. Endpoints are arena indices.
#[derive(Debug, Clone)]
pub struct StyledEdge {
    /// Arena index of the source node
    pub source: usize,
    /// Arena index of the target node
    pub target: usize,
    /// Relation kind
    pub kind: EdgeKind,
    /// Clamped extraction confidence
    pub confidence: f32,
    /// Ordinal within a process, for `STEP_IN_PROCESS` edges
    pub step: Option<u32>,
    /// Per-kind style color
    pub color: Color,
    /// Per-kind style width
    pub width: f32,
    /// Cosmetic curvature offset in `0.12..0.20`
    pub curvature: f32,
}

/// A positioned, attributed, index-addressable graph.
#[derive(Debug, Clone, Default)]
pub struct PositionedGraph {
    nodes: Vec<PositionedNode>,
    edges: Vec<StyledEdge>,
    index: HashMap<String, usize>,
    neighbors: Vec<Vec<usize>>,
    communities: Vec<Community>,
    processes: Vec<Process>,
}

impl PositionedGraph {
    /// Number of nodes in the arena.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of retained edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All positioned nodes, in arena order.
    #[must_use]
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// All styled edges.
    #[must_use]
    pub fn edges(&self) -> &[StyledEdge] {
        &self.edges
    }

    /// Resolve a node id to its arena index.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The node at an arena index.
    #[must_use]
    pub fn node(&self, index: usize) -> &PositionedNode {
        &self.nodes[index]
    }

    /// Arena indices adjacent to `index`, in either edge direction.
    #[must_use]
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    /// Whether two arena indices share an edge in either direction.
    #[must_use]
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].contains(&b)
    }

    /// Find a node by display name, preferring symbol kinds.
    ///
    /// Falls back to the first name match of any kind so containers can
    /// still be targeted explicitly.
    #[must_use]
    pub fn find_symbol(&self, name: &str) -> Option<usize> {
        let mut fallback = None;
        for (i, positioned) in self.nodes.iter().enumerate() {
            if positioned.node.name == name {
                if positioned.node.kind.is_symbol() {
                    return Some(i);
                }
                if fallback.is_none() {
                    fallback = Some(i);
                }
            }
        }
        fallback
    }

    /// Community metadata, in payload order (the ordinal space used by
    /// `PositionedNode::community`).
    #[must_use]
    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    /// Process metadata, in payload order.
    #[must_use]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Overwrite a node's coordinates.
    ///
    /// This is the write path for the external physics refinement; nothing
    /// inside the engine moves nodes after seeding.
    pub fn set_position(&mut self, index: usize, x: f32, y: f32) {
        self.nodes[index].x = x;
        self.nodes[index].y = y;
    }
}

/// Converts a raw payload into a `PositionedGraph` with deterministic
/// initial coordinates.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: BuildConfig,
}

impl GraphBuilder {
    /// Create a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with an explicit configuration.
    #[must_use]
    pub fn with_config(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Build a positioned graph from a raw payload.
    ///
    /// Never fails: a pathological input (zero nodes, all edges dangling)
    /// yields an empty or partial graph plus the stats explaining what was
    /// dropped.
    #[must_use]
    pub fn build(&self, data: GraphData) -> (PositionedGraph, BuildStats) {
        let start = Instant::now();
        let mut stats = BuildStats::default();
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        // Node ingest: first insert wins.
        let mut nodes: Vec<Node> = Vec::with_capacity(data.nodes.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(data.nodes.len());
        for node in data.nodes {
            if index.contains_key(&node.id) {
                stats.duplicate_nodes += 1;
                debug!(id = %node.id, "Duplicate node id ignored");
                continue;
            }
            index.insert(node.id.clone(), nodes.len());
            nodes.push(node);
        }
        stats.nodes_added = nodes.len();

        // Edge ingest: endpoints must exist, no self-edges, first
        // (source, target) pair wins, confidence clamped into [0, 1].
        struct RetainedEdge {
            source: usize,
            target: usize,
            kind: EdgeKind,
            confidence: f32,
            step: Option<u32>,
        }
        let mut retained: Vec<RetainedEdge> = Vec::with_capacity(data.edges.len());
        let mut seen_pairs: HashSet<(usize, usize)> = HashSet::with_capacity(data.edges.len());
        for edge in data.edges {
            let (Some(&source), Some(&target)) =
                (index.get(&edge.source_id), index.get(&edge.target_id))
            else {
                stats.dangling_edges += 1;
                continue;
            };
            if source == target {
                stats.self_edges += 1;
                continue;
            }
            if !seen_pairs.insert((source, target)) {
                stats.duplicate_edges += 1;
                continue;
            }
            let confidence = if (0.0..=1.0).contains(&edge.confidence) {
                edge.confidence
            } else {
                stats.clamped_confidences += 1;
                if edge.confidence.is_nan() {
                    0.0
                } else {
                    edge.confidence.clamp(0.0, 1.0)
                }
            };
            retained.push(RetainedEdge {
                source,
                target,
                kind: edge.kind,
                confidence,
                step: edge.step,
            });
        }

        // Community membership from MEMBER_OF edges; first membership wins.
        let community_ordinals: HashMap<&str, usize> = data
            .communities
            .iter()
            .enumerate()
            .map(|(ordinal, c)| (c.id.as_str(), ordinal))
            .collect();
        let mut community_of: Vec<Option<usize>> = vec![None; nodes.len()];
        for edge in &retained {
            if edge.kind == EdgeKind::MemberOf && community_of[edge.source].is_none() {
                community_of[edge.source] = community_ordinals
                    .get(nodes[edge.target].id.as_str())
                    .copied();
            }
        }

        // Containment tree for the placement walk; first parent wins.
        let mut parent: Vec<Option<usize>> = vec![None; nodes.len()];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for edge in &retained {
            if edge.kind.is_containment() {
                children[edge.source].push(edge.target);
                if parent[edge.target].is_none() {
                    parent[edge.target] = Some(edge.source);
                }
            }
        }

        let positions = layout::seed_positions(
            &nodes,
            &community_of,
            &parent,
            &children,
            data.communities.len(),
            &mut rng,
        );

        // Styling: density-scaled sizes, kind colors, community palette.
        let scale = style::density_scale(nodes.len());
        let positioned: Vec<PositionedNode> = nodes
            .into_iter()
            .zip(positions)
            .zip(community_of)
            .map(|((node, point), community)| {
                let color = match community {
                    Some(ordinal) if node.kind.is_symbol() => style::community_color(ordinal),
                    _ => style::node_color(node.kind),
                };
                PositionedNode {
                    size: style::base_size(node.kind) * scale,
                    color,
                    x: point.x,
                    y: point.y,
                    community,
                    node,
                }
            })
            .collect();

        let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); positioned.len()];
        let edges: Vec<StyledEdge> = retained
            .into_iter()
            .map(|edge| {
                let (color, width) = style::edge_style(edge.kind);
                neighbors[edge.source].push(edge.target);
                neighbors[edge.target].push(edge.source);
                StyledEdge {
                    source: edge.source,
                    target: edge.target,
                    kind: edge.kind,
                    confidence: edge.confidence,
                    step: edge.step,
                    color,
                    width,
                    curvature: rng.random_range(CURVATURE_RANGE),
                }
            })
            .collect();
        stats.edges_added = edges.len();
        stats.duration = start.elapsed();

        debug!(
            nodes = stats.nodes_added,
            edges = stats.edges_added,
            dropped_dangling = stats.dangling_edges,
            dropped_duplicate = stats.duplicate_nodes + stats.duplicate_edges,
            dropped_self = stats.self_edges,
            clamped = stats.clamped_confidences,
            elapsed = ?stats.duration,
            "Graph build completed"
        );

        (
            PositionedGraph {
                nodes: positioned,
                edges,
                index,
                neighbors,
                communities: data.communities,
                processes: data.processes,
            },
            stats,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, NodeKind};

    fn node(id: &str, kind: NodeKind) -> Node {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            file_path: None,
            start_line: None,
            language: None,
        }
    }

    fn edge(source: &str, target: &str, kind: EdgeKind) -> Edge {
        Edge {
            source_id: source.to_string(),
            target_id: target.to_string(),
            kind,
            confidence: 1.0,
            step: None,
        }
    }

    fn community(id: &str) -> Community {
        Community {
            id: id.to_string(),
            label: id.to_string(),
            cohesion: 0.5,
            symbol_count: 1,
        }
    }

    #[test]
    fn zero_nodes_yields_empty_graph() {
        let (graph, stats) = GraphBuilder::new().build(GraphData::default());

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(stats.nodes_added, 0);
    }

    #[test]
    fn built_graph_has_no_dangling_edges() {
        let data = GraphData {
            nodes: vec![node("a", NodeKind::File), node("b", NodeKind::Function)],
            edges: vec![
                edge("a", "b", EdgeKind::Defines),
                edge("a", "ghost", EdgeKind::Contains),
                edge("ghost", "b", EdgeKind::Calls),
            ],
            ..GraphData::default()
        };

        let (graph, stats) = GraphBuilder::new().build(data);

        assert_eq!(stats.dangling_edges, 2);
        for styled in graph.edges() {
            assert!(styled.source < graph.node_count());
            assert!(styled.target < graph.node_count());
        }
    }

    #[test]
    fn duplicate_node_id_keeps_first_insert() {
        let mut second = node("a", NodeKind::Class);
        second.name = "shadow".to_string();
        let data = GraphData {
            nodes: vec![node("a", NodeKind::File), second],
            ..GraphData::default()
        };

        let (graph, stats) = GraphBuilder::new().build(data);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(stats.duplicate_nodes, 1);
        let idx = graph.node_index("a").expect("node should exist");
        assert_eq!(graph.node(idx).node.kind, NodeKind::File);
        assert_eq!(graph.node(idx).node.name, "a");
    }

    #[test]
    fn duplicate_edge_pair_keeps_first_but_reverse_survives() {
        let data = GraphData {
            nodes: vec![node("a", NodeKind::Function), node("b", NodeKind::Function)],
            edges: vec![
                edge("a", "b", EdgeKind::Calls),
                edge("a", "b", EdgeKind::Uses),
                edge("b", "a", EdgeKind::Calls),
            ],
            ..GraphData::default()
        };

        let (graph, stats) = GraphBuilder::new().build(data);

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(stats.duplicate_edges, 1);
        assert_eq!(graph.edges()[0].kind, EdgeKind::Calls);
    }

    #[test]
    fn self_edges_are_dropped() {
        let data = GraphData {
            nodes: vec![node("a", NodeKind::Function)],
            edges: vec![edge("a", "a", EdgeKind::Calls)],
            ..GraphData::default()
        };

        let (graph, stats) = GraphBuilder::new().build(data);

        assert_eq!(graph.edge_count(), 0);
        assert_eq!(stats.self_edges, 1);
    }

    #[test]
    fn out_of_range_confidence_is_clamped_not_rejected() {
        let mut high = edge("a", "b", EdgeKind::Calls);
        high.confidence = 3.5;
        let mut low = edge("b", "a", EdgeKind::Calls);
        low.confidence = -0.25;
        let data = GraphData {
            nodes: vec![node("a", NodeKind::Function), node("b", NodeKind::Function)],
            edges: vec![high, low],
            ..GraphData::default()
        };

        let (graph, stats) = GraphBuilder::new().build(data);

        assert_eq!(stats.clamped_confidences, 2);
        assert!((graph.edges()[0].confidence - 1.0).abs() < f32::EPSILON);
        assert!(graph.edges()[1].confidence.abs() < f32::EPSILON);
    }

    #[test]
    fn community_symbol_takes_palette_color() {
        let data = GraphData {
            nodes: vec![
                node("c0", NodeKind::Community),
                node("f", NodeKind::Function),
                node("g", NodeKind::Function),
            ],
            edges: vec![edge("f", "c0", EdgeKind::MemberOf)],
            communities: vec![community("c0")],
            ..GraphData::default()
        };

        let (graph, _) = GraphBuilder::new().build(data);

        let member = graph.node_index("f").expect("node should exist");
        let loner = graph.node_index("g").expect("node should exist");
        assert_eq!(graph.node(member).community, Some(0));
        assert_eq!(graph.node(member).color, style::community_color(0));
        assert_eq!(graph.node(loner).community, None);
        assert_eq!(graph.node(loner).color, style::node_color(NodeKind::Function));
    }

    #[test]
    fn membership_on_non_symbol_does_not_recolor() {
        // Files can carry MEMBER_OF edges in noisy payloads; only symbol
        // kinds take the palette color.
        let data = GraphData {
            nodes: vec![node("c0", NodeKind::Community), node("f", NodeKind::File)],
            edges: vec![edge("f", "c0", EdgeKind::MemberOf)],
            communities: vec![community("c0")],
            ..GraphData::default()
        };

        let (graph, _) = GraphBuilder::new().build(data);

        let idx = graph.node_index("f").expect("node should exist");
        assert_eq!(graph.node(idx).color, style::node_color(NodeKind::File));
    }

    #[test]
    fn small_graph_sizes_are_unscaled() {
        let data = GraphData {
            nodes: vec![node("a", NodeKind::Package)],
            ..GraphData::default()
        };

        let (graph, _) = GraphBuilder::new().build(data);

        let idx = graph.node_index("a").expect("node should exist");
        assert!((graph.node(idx).size - style::base_size(NodeKind::Package)).abs() < f32::EPSILON);
    }

    #[test]
    fn curvature_stays_in_cosmetic_range() {
        let nodes: Vec<Node> = (0..20)
            .map(|i| node(&format!("n{i}"), NodeKind::Function))
            .collect();
        let edges: Vec<Edge> = (0..19)
            .map(|i| edge(&format!("n{i}"), &format!("n{}", i + 1), EdgeKind::Calls))
            .collect();
        let data = GraphData {
            nodes,
            edges,
            ..GraphData::default()
        };

        let (graph, _) = GraphBuilder::new().build(data);

        for styled in graph.edges() {
            assert!(styled.curvature >= 0.12 && styled.curvature < 0.20);
        }
    }

    #[test]
    fn same_seed_and_payload_build_identically() {
        let data = GraphData {
            nodes: vec![
                node("root", NodeKind::Folder),
                node("file", NodeKind::File),
                node("f", NodeKind::Function),
            ],
            edges: vec![
                edge("root", "file", EdgeKind::Contains),
                edge("file", "f", EdgeKind::Defines),
            ],
            ..GraphData::default()
        };

        let builder = GraphBuilder::with_config(BuildConfig { seed: 17 });
        let (a, _) = builder.build(data.clone());
        let (b, _) = builder.build(data);

        for (left, right) in a.nodes().iter().zip(b.nodes()) {
            assert!((left.x - right.x).abs() < f32::EPSILON);
            assert!((left.y - right.y).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn adjacency_is_bidirectional() {
        let data = GraphData {
            nodes: vec![node("a", NodeKind::Function), node("b", NodeKind::Function)],
            edges: vec![edge("a", "b", EdgeKind::Calls)],
            ..GraphData::default()
        };

        let (graph, _) = GraphBuilder::new().build(data);

        let a = graph.node_index("a").expect("node should exist");
        let b = graph.node_index("b").expect("node should exist");
        assert!(graph.is_adjacent(a, b));
        assert!(graph.is_adjacent(b, a));
    }

    #[test]
    fn find_symbol_prefers_symbol_kinds_over_name_collisions() {
        let mut folder = node("dir", NodeKind::Folder);
        folder.name = "auth".to_string();
        let mut func = node("fn", NodeKind::Function);
        func.name = "auth".to_string();
        let data = GraphData {
            nodes: vec![folder, func],
            ..GraphData::default()
        };

        let (graph, _) = GraphBuilder::new().build(data);

        let found = graph.find_symbol("auth").expect("name should resolve");
        assert_eq!(graph.node(found).node.kind, NodeKind::Function);
    }
}
