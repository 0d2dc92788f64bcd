//! Deterministic initial placement.
//!
//! Seeding happens once per build; the external physics refinement then
//! takes ownership of the coordinates. The goal here is a good starting
//! point, not a final layout:
//!
//! 1. Structural nodes (folders, packages, modules, namespaces) go on a
//!    golden-angle spiral, which spreads them with near-uniform density
//!    regardless of count.
//! 2. Community cluster centers go on a second, tighter spiral.
//! 3. A breadth-first walk down the containment tree places symbols near
//!    their community center and everything else near its structural
//!    parent.
//! 4. Whatever the walk never reaches falls back to the origin.
//!
//! All randomness flows from one seeded `StdRng`, so a fixed seed yields
//! identical coordinates across builds.

use std::collections::VecDeque;
use std::f32::consts::{PI, TAU};

use rand::Rng;
use rand::rngs::StdRng;

use crate::types::Node;

/// Golden angle in radians: `pi * (3 - sqrt(5))`.
const GOLDEN_ANGLE: f32 = PI * (3.0 - 2.236_068);

/// Global spread radius per sqrt(node count).
const SPREAD: f32 = 40.0;

/// Relative radius of the community-center spiral.
const COMMUNITY_SPIRAL_SCALE: f32 = 0.8;

/// Multiplicative jitter applied to spiral positions.
const SPIRAL_JITTER: f32 = 0.15;

/// Jitter scale (per sqrt(node count)) around community centers.
const COMMUNITY_JITTER: f32 = 1.5;

/// Jitter scale (per sqrt(node count)) around structural parents.
const PARENT_JITTER: f32 = 3.0;

/// Fraction of the spread radius used for the near-origin fallback.
const ORIGIN_FALLBACK: f32 = 0.5;

/// A seeded 2D coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Point {
    pub x: f32,
    pub y: f32,
}

/// Seed a position for every node.
///
/// `community_of` maps arena index to community ordinal, `parent` and
/// `children` encode the containment tree (`CONTAINS`/`DEFINES` edges) as
/// arena index lists. Returns one point per node, in arena order.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn seed_positions(
    nodes: &[Node],
    community_of: &[Option<usize>],
    parent: &[Option<usize>],
    children: &[Vec<usize>],
    community_count: usize,
    rng: &mut StdRng,
) -> Vec<Point> {
    let node_count = nodes.len();
    if node_count == 0 {
        return Vec::new();
    }

    let spread = (node_count as f32).sqrt() * SPREAD;
    let scale = (node_count as f32).sqrt();
    let mut positions: Vec<Option<Point>> = vec![None; node_count];

    // Structural nodes on the primary spiral.
    let structural: Vec<usize> = (0..node_count)
        .filter(|&i| nodes[i].kind.is_structural())
        .collect();
    for (ordinal, &idx) in structural.iter().enumerate() {
        positions[idx] = Some(jittered(
            spiral_point(ordinal, structural.len(), spread),
            rng,
        ));
    }

    // Community cluster centers on a second, tighter spiral.
    let centers: Vec<Point> = (0..community_count)
        .map(|ordinal| spiral_point(ordinal, community_count, spread * COMMUNITY_SPIRAL_SCALE))
        .collect();

    // Breadth-first walk from the structural nodes' children.
    let mut queue: VecDeque<usize> = structural
        .iter()
        .flat_map(|&idx| children[idx].iter().copied())
        .collect();
    while let Some(idx) = queue.pop_front() {
        if positions[idx].is_some() {
            continue;
        }

        let community = community_of[idx].filter(|_| nodes[idx].kind.is_symbol());
        positions[idx] = Some(match community {
            Some(ordinal) => offset(centers[ordinal], scale * COMMUNITY_JITTER, rng),
            None => match parent[idx].and_then(|p| positions[p]) {
                Some(anchor) => offset(anchor, scale * PARENT_JITTER, rng),
                None => near_origin(spread, rng),
            },
        });

        queue.extend(children[idx].iter().copied());
    }

    // Orphans the walk never reached.
    positions
        .into_iter()
        .map(|p| p.unwrap_or_else(|| near_origin(spread, rng)))
        .collect()
}

/// Point `ordinal` of a golden-angle spiral holding `count` points within
/// `radius`. The `sqrt` radius progression keeps density near-uniform.
#[allow(clippy::cast_precision_loss)]
fn spiral_point(ordinal: usize, count: usize, radius: f32) -> Point {
    debug_assert!(ordinal < count);
    let angle = ordinal as f32 * GOLDEN_ANGLE;
    let r = radius * ((ordinal + 1) as f32 / count as f32).sqrt();
    Point {
        x: r * angle.cos(),
        y: r * angle.sin(),
    }
}

/// Multiplicative per-axis jitter, +/-15%.
fn jittered(point: Point, rng: &mut StdRng) -> Point {
    Point {
        x: point.x * (1.0 + rng.random_range(-SPIRAL_JITTER..SPIRAL_JITTER)),
        y: point.y * (1.0 + rng.random_range(-SPIRAL_JITTER..SPIRAL_JITTER)),
    }
}

/// Uniform per-axis offset in `[-scale, scale]` around an anchor.
fn offset(anchor: Point, scale: f32, rng: &mut StdRng) -> Point {
    Point {
        x: anchor.x + rng.random_range(-scale..scale),
        y: anchor.y + rng.random_range(-scale..scale),
    }
}

/// A point within `ORIGIN_FALLBACK * spread` of the origin.
fn near_origin(spread: f32, rng: &mut StdRng) -> Point {
    let angle = rng.random_range(0.0..TAU);
    let r = rng.random_range(0.0..spread * ORIGIN_FALLBACK);
    Point {
        x: r * angle.cos(),
        y: r * angle.sin(),
    }
}
