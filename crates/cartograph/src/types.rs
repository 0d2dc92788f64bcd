//! Domain types for the cartograph engine.
//!
//! These types mirror the payload produced by the indexing service:
//! - **Raw graph**: `Node`, `Edge`, `Community`, `Process`, bundled as `GraphData`
//! - **Kind enums**: `NodeKind`, `EdgeKind`, `ProcessKind`
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Kinds | Enums not Strings | Type-safe; style tables are exhaustive matches |
//! | Node identity | `id` string | Matches the indexing service; arena index is internal |
//! | Membership | Derived from edges | `MEMBER_OF`/`STEP_IN_PROCESS` are the source of truth |
//! | Unknown kinds | `Unknown` catch-all | A noisy payload must still build |

use serde::{Deserialize, Serialize};

/// The kind of a graph node: structural container, code symbol, or metadata.
///
/// Structural kinds anchor the layout (they seed the placement spiral);
/// symbol kinds participate in community clustering and impact analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Directory in the source tree
    Folder,
    /// Source file
    File,
    /// Package / workspace member
    Package,
    /// Module (Rust, Python) or equivalent
    Module,
    /// Namespace (C#, C++)
    Namespace,
    /// Free function
    Function,
    /// Method on a type
    Method,
    /// Class
    Class,
    /// Interface
    Interface,
    /// Struct
    Struct,
    /// Trait
    Trait,
    /// Enum type
    Enum,
    /// Record type
    Record,
    /// Delegate (C#)
    Delegate,
    /// Variable or field
    Variable,
    /// Detected community (metadata node)
    Community,
    /// Recorded execution flow (metadata node)
    Process,
    /// Kind not recognized by this version of the engine
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Whether this node is a structural container (folder/package/module/namespace).
    ///
    /// Structural nodes are laid out on the primary placement spiral and act
    /// as BFS roots for positioning their contents. Files are contents, not
    /// containers, for layout purposes.
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Folder | Self::Package | Self::Module | Self::Namespace
        )
    }

    /// Whether this node is a code symbol (function, class, trait, ...).
    ///
    /// Symbol nodes with a community membership cluster around their
    /// community's center instead of their structural parent.
    #[must_use]
    pub fn is_symbol(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Class
                | Self::Method
                | Self::Interface
                | Self::Struct
                | Self::Trait
                | Self::Enum
                | Self::Record
                | Self::Delegate
        )
    }

    /// Stable string representation (matches the wire format).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::File => "file",
            Self::Package => "package",
            Self::Module => "module",
            Self::Namespace => "namespace",
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Trait => "trait",
            Self::Enum => "enum",
            Self::Record => "record",
            Self::Delegate => "delegate",
            Self::Variable => "variable",
            Self::Community => "community",
            Self::Process => "process",
            Self::Unknown => "unknown",
        }
    }
}

/// The relation kind of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// Structural containment (folder contains file)
    Contains,
    /// Definition site (file defines symbol)
    Defines,
    /// Import of another module/file
    Imports,
    /// Function or method call
    Calls,
    /// Class inheritance
    Extends,
    /// Interface/trait implementation
    Implements,
    /// Symbol belongs to a community
    MemberOf,
    /// Symbol is one step of an execution flow, ordered by `step`
    StepInProcess,
    /// General usage (type reference, field access)
    Uses,
    /// Method override
    Overrides,
    /// Decorator/attribute application
    Decorates,
}

impl EdgeKind {
    /// Whether this edge expresses structural containment.
    ///
    /// Containment edges build the `parent -> children` map that drives
    /// BFS placement; they never participate in impact traversal.
    #[must_use]
    pub fn is_containment(self) -> bool {
        matches!(self, Self::Contains | Self::Defines)
    }

    /// Whether this edge expresses a code dependency.
    ///
    /// Only dependency edges are traversed by impact analysis.
    #[must_use]
    pub fn is_dependency(self) -> bool {
        matches!(
            self,
            Self::Calls | Self::Imports | Self::Extends | Self::Implements
        )
    }

    /// Stable string representation (matches the wire format).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::Defines => "DEFINES",
            Self::Imports => "IMPORTS",
            Self::Calls => "CALLS",
            Self::Extends => "EXTENDS",
            Self::Implements => "IMPLEMENTS",
            Self::MemberOf => "MEMBER_OF",
            Self::StepInProcess => "STEP_IN_PROCESS",
            Self::Uses => "USES",
            Self::Overrides => "OVERRIDES",
            Self::Decorates => "DECORATES",
        }
    }
}

/// A raw graph node as delivered by the indexing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable identity; duplicates are ignored on insert (first wins)
    pub id: String,
    /// Display name
    pub name: String,
    /// Symbol or container kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Source path, relative to the repository root. Metadata nodes
    /// (communities, processes) have none.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Line of the definition site (1-indexed)
    #[serde(default)]
    pub start_line: Option<u32>,
    /// Source language, if known
    #[serde(default)]
    pub language: Option<String>,
}

/// A raw graph edge as delivered by the indexing service.
///
/// An edge is only retained if both endpoints exist in the node set;
/// self-edges and duplicate `(source, target)` pairs are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Id of the source node
    pub source_id: String,
    /// Id of the target node
    pub target_id: String,
    /// Relation kind
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Extraction confidence in `[0, 1]`; out-of-range values are clamped
    /// on ingest rather than rejected
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// Ordinal within a process, for `STEP_IN_PROCESS` edges
    #[serde(default)]
    pub step: Option<u32>,
}

fn default_confidence() -> f32 {
    1.0
}

/// A detected cluster of related symbols, used for grouping and coloring.
///
/// Membership is not stored here; it is derived from `MEMBER_OF` edges
/// (source = symbol, target = community node).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    /// Stable identity; referenced by `MEMBER_OF` edge targets
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Cluster cohesion in `[0, 1]`
    pub cohesion: f32,
    /// Number of member symbols reported upstream
    pub symbol_count: usize,
}

/// Whether a process spans community boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessKind {
    /// Steps cross at least one community boundary
    CrossCommunity,
    /// All steps stay within one community
    IntraCommunity,
}

/// A recorded execution flow: an ordered sequence of symbol invocations.
///
/// Step membership is derived from `STEP_IN_PROCESS` edges carrying an
/// ordinal `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Stable identity; referenced by `STEP_IN_PROCESS` edge targets
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Process scope
    #[serde(rename = "type")]
    pub kind: ProcessKind,
    /// Number of steps reported upstream
    pub step_count: usize,
}

/// The raw payload consumed from the indexing service.
///
/// All fields default to empty so a partial payload still builds; the
/// graph must always render whatever valid subset remains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    /// Raw nodes
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Raw edges
    #[serde(default)]
    pub edges: Vec<Edge>,
    /// Detected communities
    #[serde(default)]
    pub communities: Vec<Community>,
    /// Recorded execution flows
    #[serde(default)]
    pub processes: Vec<Process>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_kinds_are_containers_only() {
        assert!(NodeKind::Folder.is_structural());
        assert!(NodeKind::Package.is_structural());
        assert!(NodeKind::Module.is_structural());
        assert!(NodeKind::Namespace.is_structural());

        // Files hold symbols but are placed like contents, not containers.
        assert!(!NodeKind::File.is_structural());
        assert!(!NodeKind::Function.is_structural());
        assert!(!NodeKind::Community.is_structural());
    }

    #[test]
    fn symbol_kinds_exclude_structure_and_metadata() {
        assert!(NodeKind::Function.is_symbol());
        assert!(NodeKind::Trait.is_symbol());
        assert!(NodeKind::Delegate.is_symbol());

        assert!(!NodeKind::Folder.is_symbol());
        assert!(!NodeKind::File.is_symbol());
        assert!(!NodeKind::Variable.is_symbol());
        assert!(!NodeKind::Process.is_symbol());
    }

    #[test]
    fn dependency_kinds_match_impact_traversal_set() {
        assert!(EdgeKind::Calls.is_dependency());
        assert!(EdgeKind::Imports.is_dependency());
        assert!(EdgeKind::Extends.is_dependency());
        assert!(EdgeKind::Implements.is_dependency());

        assert!(!EdgeKind::Contains.is_dependency());
        assert!(!EdgeKind::MemberOf.is_dependency());
        assert!(!EdgeKind::Uses.is_dependency());
    }

    #[test]
    fn node_parses_from_service_payload() {
        let json = r#"{
            "id": "sym:auth.login",
            "name": "login",
            "type": "function",
            "filePath": "services/auth/src/login.ts",
            "startLine": 42,
            "language": "typescript"
        }"#;

        let node: Node = serde_json::from_str(json).expect("node should parse");
        assert_eq!(node.kind, NodeKind::Function);
        assert_eq!(node.file_path.as_deref(), Some("services/auth/src/login.ts"));
        assert_eq!(node.start_line, Some(42));
    }

    #[test]
    fn unknown_node_kind_parses_as_unknown() {
        let json = r#"{"id": "x", "name": "x", "type": "hologram"}"#;

        let node: Node = serde_json::from_str(json).expect("node should parse");
        assert_eq!(node.kind, NodeKind::Unknown);
    }

    #[test]
    fn edge_parses_screaming_snake_kind() {
        let json = r#"{
            "sourceId": "a",
            "targetId": "b",
            "type": "STEP_IN_PROCESS",
            "confidence": 0.9,
            "step": 3
        }"#;

        let edge: Edge = serde_json::from_str(json).expect("edge should parse");
        assert_eq!(edge.kind, EdgeKind::StepInProcess);
        assert_eq!(edge.step, Some(3));
    }

    #[test]
    fn edge_confidence_defaults_to_one() {
        let json = r#"{"sourceId": "a", "targetId": "b", "type": "CALLS"}"#;

        let edge: Edge = serde_json::from_str(json).expect("edge should parse");
        assert!((edge.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn graph_data_defaults_missing_sections() {
        let data: GraphData = serde_json::from_str("{}").expect("empty payload should parse");

        assert!(data.nodes.is_empty());
        assert!(data.edges.is_empty());
        assert!(data.communities.is_empty());
        assert!(data.processes.is_empty());
    }
}
