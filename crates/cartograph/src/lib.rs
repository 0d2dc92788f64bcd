//! # Cartograph: Code Knowledge Graph Engine
//!
//! Cartograph turns a raw symbol/relationship payload from an indexing
//! service into a positioned, styled, filterable, impact-analyzable graph
//! consumed by a force-directed renderer. It is a pure in-memory
//! transform between a fetch boundary and a render boundary.
//!
//! ## Design Philosophy
//!
//! - **Engine, not renderer** - seeds coordinates and resolves attributes;
//!   physics refinement and painting are external collaborators
//! - **Best effort construction** - dangling edges, duplicate ids, and
//!   malformed confidences are dropped or clamped and counted, never raised
//! - **Deterministic seeding** - a fixed seed yields identical initial
//!   coordinates, jitter included
//! - **Pure per-frame resolution** - visual state is a function of an
//!   explicit immutable snapshot, cheap enough to run per element per tick
//! - **Embeddable** - library first, CLI second
//!
//! ## Quick Start
//!
//! ```
//! use cartograph::{GraphBuilder, GraphData};
//!
//! let payload: GraphData = serde_json::from_str(r#"{
//!     "nodes": [
//!         {"id": "file", "name": "auth.ts", "type": "file"},
//!         {"id": "fn", "name": "login", "type": "function"}
//!     ],
//!     "edges": [
//!         {"sourceId": "file", "targetId": "fn", "type": "DEFINES"}
//!     ]
//! }"#)?;
//!
//! let (graph, stats) = GraphBuilder::new().build(payload);
//! assert_eq!(stats.nodes_added, 2);
//! assert_eq!(graph.edge_count(), 1);
//! # Ok::<(), serde_json::Error>(())
//! ```

pub mod builder;
pub mod error;
pub mod filter;
pub mod impact;
pub mod resolver;
pub mod session;
pub mod types;

pub use builder::style::{community_color, density_scale, Color};
pub use builder::{
    BuildConfig, BuildStats, GraphBuilder, PositionedGraph, PositionedNode, StyledEdge,
};
pub use error::{Error, Result};
pub use filter::{
    detect_packages, focus_set, scope_to_prefix, EdgeKindFilter, LabelFilter, PackageCandidate,
};
pub use impact::{
    DefaultRiskPolicy, DepthBucket, ImpactAnalyzer, ImpactDirection, ImpactOptions,
    ImpactProvider, ImpactReport, ImpactedProcess, ImpactedSymbol, Risk, RiskPolicy,
};
pub use resolver::{
    resolve_edge, resolve_node, EdgeAttributes, InteractionState, NodeAttributes, Theme,
};
pub use session::{refinement_budget, GraphSession, PhysicsDriver};
pub use types::{
    Community, Edge, EdgeKind, GraphData, Node, NodeKind, Process, ProcessKind,
};
