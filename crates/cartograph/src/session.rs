//! Single-threaded graph session lifecycle.
//!
//! The session owns the positioned graph and the interaction state, and
//! controls the lifecycle of the external physics refinement: starting is
//! explicit, and the refinement always runs under a time budget that
//! scales with node count, after which it is force-stopped. The timeout
//! is a designed terminal state, not a failure.
//!
//! Swapping in a new graph always stops any in-flight refinement before
//! rebuilding, so two layouts can never race on the same positions.
//! Impact requests carry a generation counter: a newer request supersedes
//! any prior one unconditionally, because only the latest result is ever
//! rendered.

use std::time::Duration;

use tracing::{debug, warn};

use crate::builder::{BuildStats, GraphBuilder, PositionedGraph};
use crate::impact::ImpactReport;
use crate::resolver::InteractionState;
use crate::types::GraphData;

/// Budget at the small-graph end (under 1,000 nodes).
const BUDGET_FLOOR: Duration = Duration::from_secs(20);

/// Budget at the large-graph end (10,000 nodes and above).
const BUDGET_CEILING: Duration = Duration::from_secs(45);

/// Node count below which the floor budget applies.
const SMALL_GRAPH: usize = 1_000;

/// Node count at which the ceiling budget applies.
const LARGE_GRAPH: usize = 10_000;

/// Time budget for the physics refinement of a graph with `node_count`
/// nodes: 20 s under 1,000 nodes, 45 s at 10,000 and above, linear in
/// between.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn refinement_budget(node_count: usize) -> Duration {
    if node_count < SMALL_GRAPH {
        return BUDGET_FLOOR;
    }
    if node_count >= LARGE_GRAPH {
        return BUDGET_CEILING;
    }
    let span = (BUDGET_CEILING - BUDGET_FLOOR).as_secs_f64();
    let fraction = (node_count - SMALL_GRAPH) as f64 / (LARGE_GRAPH - SMALL_GRAPH) as f64;
    BUDGET_FLOOR + Duration::from_secs_f64(span * fraction)
}

/// Lifecycle handle to the external physics refinement.
///
/// The engine never runs physics itself; it only starts and stops the
/// collaborator that does.
pub trait PhysicsDriver {
    /// Begin refining positions; the driver must stop itself once the
    /// budget elapses.
    fn start(&mut self, budget: Duration);

    /// Force-stop refinement. Idempotent.
    fn stop(&mut self);
}

/// Owns a built graph, its interaction state, and the refinement
/// lifecycle. All methods run on the single UI thread between render
/// ticks; no locking anywhere.
pub struct GraphSession {
    graph: PositionedGraph,
    stats: BuildStats,
    state: InteractionState,
    driver: Option<Box<dyn PhysicsDriver>>,
    refining: bool,
    impact_generation: u64,
    impact: Option<ImpactReport>,
    impact_error: Option<String>,
}

impl GraphSession {
    /// Build a session from a raw payload.
    #[must_use]
    pub fn new(data: GraphData, builder: &GraphBuilder) -> Self {
        let (graph, stats) = builder.build(data);
        Self {
            graph,
            stats,
            state: InteractionState::default(),
            driver: None,
            refining: false,
            impact_generation: 0,
            impact: None,
            impact_error: None,
        }
    }

    /// Attach the physics refinement driver.
    #[must_use]
    pub fn with_driver(mut self, driver: Box<dyn PhysicsDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// The current positioned graph.
    #[must_use]
    pub fn graph(&self) -> &PositionedGraph {
        &self.graph
    }

    /// Mutable access for the physics refinement write path.
    #[must_use]
    pub fn graph_mut(&mut self) -> &mut PositionedGraph {
        &mut self.graph
    }

    /// Accounting from the most recent build.
    #[must_use]
    pub fn build_stats(&self) -> &BuildStats {
        &self.stats
    }

    /// The interaction-state snapshot the resolver reads each frame.
    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Mutable interaction state (selection, highlights, filters).
    #[must_use]
    pub fn state_mut(&mut self) -> &mut InteractionState {
        &mut self.state
    }

    /// Explicitly start the physics refinement under the node-count
    /// budget.
    pub fn start_refinement(&mut self) {
        let budget = refinement_budget(self.graph.node_count());
        if let Some(driver) = self.driver.as_mut() {
            debug!(nodes = self.graph.node_count(), ?budget, "Starting refinement");
            driver.start(budget);
            self.refining = true;
        }
    }

    /// Force-stop any in-flight refinement. Reaching the budget and being
    /// stopped here are the same designed terminal state.
    pub fn stop_refinement(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.stop();
        }
        self.refining = false;
    }

    /// Whether a refinement was started and not yet stopped.
    #[must_use]
    pub fn is_refining(&self) -> bool {
        self.refining
    }

    /// Replace the graph with a new payload.
    ///
    /// Any in-flight refinement is stopped first so two layouts never race
    /// on the same positions. Interaction state and impact data refer to
    /// the old node set and are discarded.
    pub fn swap_graph(&mut self, data: GraphData, builder: &GraphBuilder) {
        if self.refining {
            warn!("Swapping graph with refinement in flight, stopping it first");
        }
        self.stop_refinement();
        let (graph, stats) = builder.build(data);
        self.graph = graph;
        self.stats = stats;
        self.state = InteractionState::default();
        self.impact = None;
        self.impact_error = None;
    }

    /// Current position of a node, for the renderer's camera animation.
    #[must_use]
    pub fn focus_node(&self, id: &str) -> Option<(f32, f32)> {
        let index = self.graph.node_index(id)?;
        let node = self.graph.node(index);
        Some((node.x, node.y))
    }

    /// Register a new impact request and get its generation token.
    ///
    /// Issuing a new request supersedes any prior one unconditionally; no
    /// cancellation is needed because only the latest result is accepted.
    pub fn begin_impact(&mut self) -> u64 {
        self.impact_generation += 1;
        self.impact_generation
    }

    /// Deliver a completed impact report.
    ///
    /// Accepted only if `generation` is the latest request; a stale result
    /// is dropped and `false` is returned. Acceptance replaces the prior
    /// report wholesale and seeds the blast-radius map.
    pub fn complete_impact(&mut self, generation: u64, report: ImpactReport) -> bool {
        if generation != self.impact_generation {
            debug!(
                generation,
                latest = self.impact_generation,
                "Dropping stale impact result"
            );
            return false;
        }
        self.state.blast_radius = report.depth_map();
        self.impact = Some(report);
        self.impact_error = None;
        true
    }

    /// Deliver an impact failure.
    ///
    /// The message is kept for display; the blast-radius map is left
    /// empty so the rest of the graph renders untouched.
    pub fn fail_impact(&mut self, generation: u64, message: impl Into<String>) -> bool {
        if generation != self.impact_generation {
            return false;
        }
        self.state.blast_radius.clear();
        self.impact = None;
        self.impact_error = Some(message.into());
        true
    }

    /// The latest accepted impact report, if any.
    #[must_use]
    pub fn impact(&self) -> Option<&ImpactReport> {
        self.impact.as_ref()
    }

    /// The latest impact failure message, if any.
    #[must_use]
    pub fn impact_error(&self) -> Option<&str> {
        self.impact_error.as_deref()
    }

    /// Discard the impact report and its blast-radius emphasis, e.g. when
    /// the user closes the overlay or clears highlights.
    pub fn clear_impact(&mut self) {
        self.impact = None;
        self.impact_error = None;
        self.state.blast_radius.clear();
    }
}
