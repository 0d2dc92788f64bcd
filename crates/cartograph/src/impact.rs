//! Blast-radius impact analysis.
//!
//! Answers "what breaks if I change this symbol" by walking dependency
//! edges (`CALLS`, `IMPORTS`, `EXTENDS`, `IMPLEMENTS`) upstream from a
//! target: the nodes that point at the target, recursively, bucketed by
//! dependency distance. Standard BFS visited-set semantics give the
//! minimum-depth invariant: a symbol reachable at depth 1 and depth 3 is
//! reported only at depth 1.
//!
//! Risk classification thresholds are an upstream policy, so they are
//! injectable via [`RiskPolicy`] rather than baked in.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::PositionedGraph;
use crate::error::{Error, Result};
use crate::types::EdgeKind;

/// Which way to walk the dependency edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactDirection {
    /// Nodes that depend on the target, recursively ("what breaks")
    Upstream,
    /// Nodes the target depends on, recursively ("what this needs")
    Downstream,
}

/// Parameters for one impact analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactOptions {
    /// Traversal direction
    pub direction: ImpactDirection,
    /// Traversal halts at this depth
    pub max_depth: u32,
    /// Edges below this confidence are excluded from traversal entirely
    pub confidence_floor: f32,
}

impl Default for ImpactOptions {
    fn default() -> Self {
        Self {
            direction: ImpactDirection::Upstream,
            max_depth: 3,
            confidence_floor: 0.5,
        }
    }
}

/// Risk classification of a change to the analyzed symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Risk {
    /// Few or no dependents
    Low,
    /// A handful of dependents or one affected flow
    Medium,
    /// Many dependents or several affected flows
    High,
    /// Change ripples across flows and communities
    Critical,
}

impl Risk {
    /// Stable string representation (matches the wire format).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// Maps impact counts to a risk classification.
///
/// The exact thresholds are an external policy decision; inject whatever
/// the product currently uses.
pub trait RiskPolicy {
    /// Classify from the counts of direct dependents, affected processes,
    /// and affected communities.
    fn classify(
        &self,
        direct_dependents: usize,
        affected_processes: usize,
        affected_communities: usize,
    ) -> Risk;
}

/// Provisional default thresholds.
///
/// The numbers below are placeholders pending the real product policy,
/// not recovered constants; swap in your own [`RiskPolicy`] to change
/// them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRiskPolicy;

impl RiskPolicy for DefaultRiskPolicy {
    fn classify(
        &self,
        direct_dependents: usize,
        affected_processes: usize,
        affected_communities: usize,
    ) -> Risk {
        if direct_dependents >= 25 || affected_processes >= 5 || affected_communities >= 4 {
            Risk::Critical
        } else if direct_dependents >= 10 || affected_processes >= 3 || affected_communities >= 3 {
            Risk::High
        } else if direct_dependents >= 3 || affected_processes >= 1 || affected_communities >= 2 {
            Risk::Medium
        } else {
            Risk::Low
        }
    }
}

/// A symbol affected by the analyzed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactedSymbol {
    /// Node id
    pub id: String,
    /// Display name
    pub name: String,
}

/// Affected symbols at one dependency distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepthBucket {
    /// Dependency distance from the target (1 = direct dependents)
    pub depth: u32,
    /// Symbols first discovered at this depth
    pub symbols: Vec<ImpactedSymbol>,
}

/// An execution flow touching at least one affected symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactedProcess {
    /// Process id
    pub id: String,
    /// Human-readable label
    pub label: String,
}

/// The result of one impact analysis.
///
/// Created per request and replaced wholesale by the next one; its
/// `depth_map` is the sole input that seeds the resolver's blast-radius
/// highlight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Analyzed node id
    pub target: String,
    /// Analyzed symbol name
    pub target_name: String,
    /// Risk classification
    pub risk: Risk,
    /// Affected symbols grouped by dependency distance, shallowest first
    pub by_depth: Vec<DepthBucket>,
    /// Execution flows containing affected symbols
    pub affected_processes: Vec<ImpactedProcess>,
    /// Community ids containing affected symbols
    pub affected_communities: Vec<String>,
}

impl ImpactReport {
    /// Flatten the buckets into a `node id -> minimum depth` map.
    #[must_use]
    pub fn depth_map(&self) -> HashMap<String, u32> {
        let mut map = HashMap::new();
        for bucket in &self.by_depth {
            for symbol in &bucket.symbols {
                map.entry(symbol.id.clone()).or_insert(bucket.depth);
            }
        }
        map
    }

    /// Symbols directly depending on the target (depth 1).
    #[must_use]
    pub fn direct_dependents(&self) -> usize {
        self.by_depth
            .iter()
            .find(|b| b.depth == 1)
            .map_or(0, |b| b.symbols.len())
    }

    /// Total affected symbols across all depths.
    #[must_use]
    pub fn total_affected(&self) -> usize {
        self.by_depth.iter().map(|b| b.symbols.len()).sum()
    }
}

/// The fetch boundary for impact data.
///
/// The UI talks to this trait; in production it may be backed by the
/// indexing service, in-process it is backed by [`ImpactAnalyzer`]. A
/// failure surfaces as a user-visible error string and leaves the
/// blast-radius map empty.
pub trait ImpactProvider {
    /// Analyze the impact of changing `target_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolNotFound`] for an unknown name, or
    /// [`Error::Impact`] when the underlying provider fails.
    fn fetch_impact(&self, target_name: &str, options: &ImpactOptions) -> Result<ImpactReport>;
}

/// Breadth-first impact analysis over a built graph.
pub struct ImpactAnalyzer<'a, P: RiskPolicy = DefaultRiskPolicy> {
    graph: &'a PositionedGraph,
    policy: P,
}

impl<'a> ImpactAnalyzer<'a> {
    /// Create an analyzer with the default risk policy.
    #[must_use]
    pub fn new(graph: &'a PositionedGraph) -> Self {
        Self {
            graph,
            policy: DefaultRiskPolicy,
        }
    }
}

impl<'a, P: RiskPolicy> ImpactAnalyzer<'a, P> {
    /// Create an analyzer with an injected risk policy.
    #[must_use]
    pub fn with_policy(graph: &'a PositionedGraph, policy: P) -> Self {
        Self { graph, policy }
    }

    /// Analyze the impact of changing the symbol named `target_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SymbolNotFound`] if no node carries that name.
    pub fn analyze(&self, target_name: &str, options: &ImpactOptions) -> Result<ImpactReport> {
        let target = self
            .graph
            .find_symbol(target_name)
            .ok_or_else(|| Error::SymbolNotFound(target_name.to_string()))?;

        let floor = options.confidence_floor.clamp(0.0, 1.0);
        let affected = self.traverse(target, floor, options);

        // Bucket by depth, shallowest first; symbols sorted by name within
        // a bucket for deterministic reports.
        let max_depth = affected.values().copied().max().unwrap_or(0);
        let mut by_depth: Vec<DepthBucket> = Vec::new();
        for depth in 1..=max_depth {
            let mut symbols: Vec<ImpactedSymbol> = affected
                .iter()
                .filter(|&(_, &d)| d == depth)
                .map(|(&index, _)| {
                    let node = &self.graph.node(index).node;
                    ImpactedSymbol {
                        id: node.id.clone(),
                        name: node.name.clone(),
                    }
                })
                .collect();
            symbols.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
            if !symbols.is_empty() {
                by_depth.push(DepthBucket { depth, symbols });
            }
        }

        let (affected_processes, affected_communities) = self.cross_reference(&affected);

        let risk = if by_depth.is_empty() {
            // Zero upstream dependents is LOW by definition.
            Risk::Low
        } else {
            let direct = by_depth.first().map_or(0, |b| {
                if b.depth == 1 { b.symbols.len() } else { 0 }
            });
            self.policy
                .classify(direct, affected_processes.len(), affected_communities.len())
        };

        let node = &self.graph.node(target).node;
        debug!(
            target = %node.name,
            affected = affected.len(),
            processes = affected_processes.len(),
            communities = affected_communities.len(),
            risk = risk.as_str(),
            "Impact analysis completed"
        );

        Ok(ImpactReport {
            target: node.id.clone(),
            target_name: node.name.clone(),
            risk,
            by_depth,
            affected_processes,
            affected_communities,
        })
    }

    /// BFS over dependency edges at or above the confidence floor.
    ///
    /// Returns `arena index -> minimum depth` for every affected node
    /// (the target itself is excluded).
    fn traverse(&self, target: usize, floor: f32, options: &ImpactOptions) -> HashMap<usize, u32> {
        let mut dependency_graph: DiGraph<usize, f32> = DiGraph::new();
        let petgraph_index: Vec<NodeIndex> = (0..self.graph.node_count())
            .map(|arena| dependency_graph.add_node(arena))
            .collect();
        for edge in self.graph.edges() {
            if edge.kind.is_dependency() && edge.confidence >= floor {
                dependency_graph.add_edge(
                    petgraph_index[edge.source],
                    petgraph_index[edge.target],
                    edge.confidence,
                );
            }
        }

        // Upstream means "who points at the target": walk incoming edges.
        let walk_direction = match options.direction {
            ImpactDirection::Upstream => Direction::Incoming,
            ImpactDirection::Downstream => Direction::Outgoing,
        };

        let mut depths: HashMap<usize, u32> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        visited.insert(petgraph_index[target]);
        let mut queue: VecDeque<(NodeIndex, u32)> = VecDeque::new();
        queue.push_back((petgraph_index[target], 0));

        while let Some((index, depth)) = queue.pop_front() {
            if depth == options.max_depth {
                continue;
            }
            for neighbor in dependency_graph.neighbors_directed(index, walk_direction) {
                if visited.insert(neighbor) {
                    depths.insert(dependency_graph[neighbor], depth + 1);
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        depths
    }

    /// Cross-reference affected symbols against process and community
    /// membership, preserving payload order for deterministic reports.
    fn cross_reference(
        &self,
        affected: &HashMap<usize, u32>,
    ) -> (Vec<ImpactedProcess>, Vec<String>) {
        let mut process_ids: HashSet<&str> = HashSet::new();
        for edge in self.graph.edges() {
            if edge.kind == EdgeKind::StepInProcess && affected.contains_key(&edge.source) {
                process_ids.insert(self.graph.node(edge.target).node.id.as_str());
            }
        }
        let processes: Vec<ImpactedProcess> = self
            .graph
            .processes()
            .iter()
            .filter(|p| process_ids.contains(p.id.as_str()))
            .map(|p| ImpactedProcess {
                id: p.id.clone(),
                label: p.label.clone(),
            })
            .collect();

        let community_ordinals: HashSet<usize> = affected
            .keys()
            .filter_map(|&index| self.graph.node(index).community)
            .collect();
        let communities: Vec<String> = self
            .graph
            .communities()
            .iter()
            .enumerate()
            .filter(|(ordinal, _)| community_ordinals.contains(ordinal))
            .map(|(_, c)| c.id.clone())
            .collect();

        (processes, communities)
    }
}

impl<P: RiskPolicy> ImpactProvider for ImpactAnalyzer<'_, P> {
    fn fetch_impact(&self, target_name: &str, options: &ImpactOptions) -> Result<ImpactReport> {
        self.analyze(target_name, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::types::{Community, Edge, GraphData, Node, NodeKind, Process, ProcessKind};
    use rstest::rstest;

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

    fn call(source: &str, target: &str) -> Edge {
        Edge {
            source_id: source.to_string(),
            target_id: target.to_string(),
            kind: EdgeKind::Calls,
            confidence: 1.0,
            step: None,
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

    /// Callers point *at* their callee:
    ///
    /// ```text
    ///   a ──> target <── b
    ///   ^
    ///   └── c (c calls a, and also calls target directly)
    /// ```
    fn diamond_graph() -> PositionedGraph {
        let data = GraphData {
            nodes: vec![
                node("target", NodeKind::Function),
                node("a", NodeKind::Function),
                node("b", NodeKind::Function),
                node("c", NodeKind::Function),
            ],
            edges: vec![
                call("a", "target"),
                call("b", "target"),
                call("c", "a"),
                call("c", "target"),
            ],
            ..GraphData::default()
        };
        GraphBuilder::new().build(data).0
    }

    #[test]
    fn upstream_walk_finds_direct_and_transitive_callers() {
        let graph = diamond_graph();
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze("target", &ImpactOptions::default())
            .expect("target should resolve");

        assert_eq!(report.by_depth.len(), 1);
        assert_eq!(report.by_depth[0].depth, 1);
        // a, b, and c all reach the target at depth 1 (c directly).
        assert_eq!(report.by_depth[0].symbols.len(), 3);
    }

    #[test]
    fn min_depth_invariant_keeps_first_discovery() {
        // c reaches target at depth 1 (direct call) and depth 2 (via a);
        // it must be reported only once, at depth 1.
        let graph = diamond_graph();
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze("target", &ImpactOptions::default())
            .expect("target should resolve");

        let map = report.depth_map();
        assert_eq!(map.get("c"), Some(&1));
        assert_eq!(report.total_affected(), 3);
    }

    #[test]
    fn no_dependents_is_empty_and_low() {
        let data = GraphData {
            nodes: vec![node("leaf", NodeKind::Function), node("x", NodeKind::Function)],
            edges: vec![call("leaf", "x")],
            ..GraphData::default()
        };
        let (graph, _) = GraphBuilder::new().build(data);
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze("leaf", &ImpactOptions::default())
            .expect("target should resolve");

        assert!(report.by_depth.is_empty());
        assert_eq!(report.risk, Risk::Low);
        assert!(report.depth_map().is_empty());
    }

    #[test]
    fn unknown_symbol_is_an_error() {
        let graph = diamond_graph();
        let analyzer = ImpactAnalyzer::new(&graph);

        let result = analyzer.analyze("ghost", &ImpactOptions::default());

        assert!(matches!(result, Err(Error::SymbolNotFound(_))));
    }

    #[test]
    fn low_confidence_edges_are_excluded_from_traversal() {
        let mut shaky = call("a", "target");
        shaky.confidence = 0.3;
        let data = GraphData {
            nodes: vec![node("target", NodeKind::Function), node("a", NodeKind::Function)],
            edges: vec![shaky],
            ..GraphData::default()
        };
        let (graph, _) = GraphBuilder::new().build(data);
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze("target", &ImpactOptions::default())
            .expect("target should resolve");

        assert!(report.by_depth.is_empty());
        assert_eq!(report.risk, Risk::Low);
    }

    #[test]
    fn traversal_halts_at_max_depth() {
        // d -> c -> b -> a -> target, all calls.
        let data = GraphData {
            nodes: vec![
                node("target", NodeKind::Function),
                node("a", NodeKind::Function),
                node("b", NodeKind::Function),
                node("c", NodeKind::Function),
                node("d", NodeKind::Function),
            ],
            edges: vec![
                call("a", "target"),
                call("b", "a"),
                call("c", "b"),
                call("d", "c"),
            ],
            ..GraphData::default()
        };
        let (graph, _) = GraphBuilder::new().build(data);
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze(
                "target",
                &ImpactOptions {
                    max_depth: 2,
                    ..ImpactOptions::default()
                },
            )
            .expect("target should resolve");

        assert_eq!(report.total_affected(), 2);
        assert!(report.depth_map().get("c").is_none());
        assert!(report.depth_map().get("d").is_none());
    }

    #[test]
    fn non_dependency_edges_do_not_propagate_impact() {
        let data = GraphData {
            nodes: vec![node("target", NodeKind::Function), node("peer", NodeKind::Function)],
            edges: vec![edge("peer", "target", EdgeKind::Uses)],
            ..GraphData::default()
        };
        let (graph, _) = GraphBuilder::new().build(data);
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze("target", &ImpactOptions::default())
            .expect("target should resolve");

        assert!(report.by_depth.is_empty());
    }

    #[test]
    fn downstream_walk_reverses_the_direction() {
        let graph = diamond_graph();
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze(
                "c",
                &ImpactOptions {
                    direction: ImpactDirection::Downstream,
                    ..ImpactOptions::default()
                },
            )
            .expect("target should resolve");

        // c calls a and target; a calls target (already seen at depth 1).
        assert_eq!(report.total_affected(), 2);
        assert_eq!(report.depth_map().get("target"), Some(&1));
    }

    #[test]
    fn affected_processes_and_communities_are_cross_referenced() {
        let mut step = edge("a", "proc", EdgeKind::StepInProcess);
        step.step = Some(1);
        let data = GraphData {
            nodes: vec![
                node("target", NodeKind::Function),
                node("a", NodeKind::Function),
                node("proc", NodeKind::Process),
                node("comm", NodeKind::Community),
            ],
            edges: vec![
                call("a", "target"),
                step,
                edge("a", "comm", EdgeKind::MemberOf),
            ],
            communities: vec![Community {
                id: "comm".to_string(),
                label: "auth".to_string(),
                cohesion: 0.9,
                symbol_count: 1,
            }],
            processes: vec![Process {
                id: "proc".to_string(),
                label: "login flow".to_string(),
                kind: ProcessKind::CrossCommunity,
                step_count: 3,
            }],
            ..GraphData::default()
        };
        let (graph, _) = GraphBuilder::new().build(data);
        let analyzer = ImpactAnalyzer::new(&graph);

        let report = analyzer
            .analyze("target", &ImpactOptions::default())
            .expect("target should resolve");

        assert_eq!(report.affected_processes.len(), 1);
        assert_eq!(report.affected_processes[0].label, "login flow");
        assert_eq!(report.affected_communities, vec!["comm".to_string()]);
        // One direct dependent plus one affected process crosses the
        // default MEDIUM threshold.
        assert_eq!(report.risk, Risk::Medium);
    }

    #[rstest]
    #[case(0, 0, 0, Risk::Low)]
    #[case(2, 0, 1, Risk::Low)]
    #[case(3, 0, 0, Risk::Medium)]
    #[case(0, 1, 0, Risk::Medium)]
    #[case(0, 0, 2, Risk::Medium)]
    #[case(10, 0, 0, Risk::High)]
    #[case(0, 3, 0, Risk::High)]
    #[case(0, 0, 3, Risk::High)]
    #[case(25, 0, 0, Risk::Critical)]
    #[case(0, 5, 0, Risk::Critical)]
    #[case(0, 0, 4, Risk::Critical)]
    fn default_policy_thresholds(
        #[case] direct: usize,
        #[case] processes: usize,
        #[case] communities: usize,
        #[case] expected: Risk,
    ) {
        assert_eq!(DefaultRiskPolicy.classify(direct, processes, communities), expected);
    }
}
