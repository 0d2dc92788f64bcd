//! Path-prefix package scoping and monorepo package auto-detection.
//!
//! Scoping builds a *new* filtered payload rather than toggling hidden
//! flags, because the renderer and physics refinement should only ever
//! see the scoped node set.
//!
//! Retention rules:
//! - a node without a file path (community/process metadata) is retained
//!   unconditionally;
//! - a non-structural node whose path starts with the prefix is retained;
//! - any node reachable from a retained node along `MEMBER_OF` or
//!   `STEP_IN_PROCESS` edges is transitively re-included;
//! - only edges with both endpoints surviving are kept.
//!
//! Structural ancestors outside the prefix are *not* pulled back in via
//! `CONTAINS`/`DEFINES`, so a scoped package's folder/namespace
//! breadcrumbs vanish from the filtered view. Flagged for product review;
//! preserved as-is.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::types::{EdgeKind, GraphData};

/// Directory names that mark a monorepo package root.
const KNOWN_PACKAGE_DIRS: [&str; 9] = [
    "packages", "apps", "services", "libs", "lib", "modules", "cli", "tools", "plugins",
];

/// Minimum distinct member files for a top-level directory to count as a
/// fallback package candidate.
const FALLBACK_MIN_FILES: usize = 5;

/// Minimum candidates for scoping to be offered at all. Below this the
/// facility is disabled — a capability gate, not an error.
const MIN_CANDIDATES: usize = 2;

/// A detected package prefix and how many distinct files it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCandidate {
    /// Path prefix, always ending in `/`
    pub prefix: String,
    /// Distinct file paths under the prefix
    pub file_count: usize,
}

/// Auto-detect package scoping candidates from node file paths.
///
/// Scans for known monorepo directory names first; if fewer than two
/// distinct candidates are found, falls back to top-level directories with
/// at least five member files. If still fewer than two, returns an empty
/// vector and scoping is simply not offered.
#[must_use]
pub fn detect_packages(data: &GraphData) -> Vec<PackageCandidate> {
    let paths: HashSet<&str> = data
        .nodes
        .iter()
        .filter_map(|n| n.file_path.as_deref())
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in &paths {
        if let Some(prefix) = monorepo_prefix(path) {
            *counts.entry(prefix).or_insert(0) += 1;
        }
    }

    if counts.len() < MIN_CANDIDATES {
        counts.clear();
        for path in &paths {
            if let Some(prefix) = top_level_prefix(path) {
                *counts.entry(prefix).or_insert(0) += 1;
            }
        }
        counts.retain(|_, &mut count| count >= FALLBACK_MIN_FILES);
        if counts.len() < MIN_CANDIDATES {
            debug!(
                candidates = counts.len(),
                "Too few package candidates, scoping disabled"
            );
            return Vec::new();
        }
    }

    let mut candidates: Vec<PackageCandidate> = counts
        .into_iter()
        .map(|(prefix, file_count)| PackageCandidate { prefix, file_count })
        .collect();
    candidates.sort_by(|a, b| b.file_count.cmp(&a.file_count).then(a.prefix.cmp(&b.prefix)));
    candidates
}

/// The `known-dir/child/` prefix of a path, if any component is a known
/// monorepo directory name with a child directory under it.
fn monorepo_prefix(path: &str) -> Option<String> {
    let components: Vec<&str> = path.split('/').collect();
    // The last component is the file name, never part of a prefix.
    for i in 0..components.len().saturating_sub(2) {
        if KNOWN_PACKAGE_DIRS.contains(&components[i]) {
            let mut prefix = components[..=i + 1].join("/");
            prefix.push('/');
            return Some(prefix);
        }
    }
    None
}

/// The `first-component/` prefix of a path with at least one directory.
fn top_level_prefix(path: &str) -> Option<String> {
    let (first, rest) = path.split_once('/')?;
    if first.is_empty() || rest.is_empty() {
        return None;
    }
    Some(format!("{first}/"))
}

/// Build a new payload scoped to a path prefix.
///
/// Idempotent: scoping an already-scoped payload by the same prefix is a
/// no-op.
#[must_use]
pub fn scope_to_prefix(data: &GraphData, prefix: &str) -> GraphData {
    let id_to_index: HashMap<&str, usize> = data
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        // first insert wins, matching builder identity semantics
        .rev()
        .collect();

    // Direct retention by prefix (metadata nodes unconditionally).
    let mut retained: HashSet<usize> = HashSet::new();
    for (i, node) in data.nodes.iter().enumerate() {
        match node.file_path.as_deref() {
            None => {
                retained.insert(i);
            }
            Some(path) => {
                if !node.kind.is_structural() && path.starts_with(prefix) {
                    retained.insert(i);
                }
            }
        }
    }

    // Transitive re-inclusion along membership edges, so community and
    // process metadata stays consistent with the scoped symbol set.
    let mut membership_out: HashMap<usize, Vec<usize>> = HashMap::new();
    for edge in &data.edges {
        if matches!(edge.kind, EdgeKind::MemberOf | EdgeKind::StepInProcess) {
            if let (Some(&source), Some(&target)) = (
                id_to_index.get(edge.source_id.as_str()),
                id_to_index.get(edge.target_id.as_str()),
            ) {
                membership_out.entry(source).or_default().push(target);
            }
        }
    }
    let mut queue: VecDeque<usize> = retained.iter().copied().collect();
    while let Some(index) = queue.pop_front() {
        if let Some(targets) = membership_out.get(&index) {
            for &target in targets {
                if retained.insert(target) {
                    queue.push_back(target);
                }
            }
        }
    }

    let retained_ids: HashSet<&str> = retained
        .iter()
        .map(|&i| data.nodes[i].id.as_str())
        .collect();

    let nodes = data
        .nodes
        .iter()
        .enumerate()
        .filter(|(i, _)| retained.contains(i))
        .map(|(_, n)| n.clone())
        .collect();
    let edges: Vec<_> = data
        .edges
        .iter()
        .filter(|e| {
            retained_ids.contains(e.source_id.as_str()) && retained_ids.contains(e.target_id.as_str())
        })
        .cloned()
        .collect();

    // Metadata entries survive if their node survived or a surviving
    // membership edge still references them.
    let referenced: HashSet<&str> = edges
        .iter()
        .filter(|e| matches!(e.kind, EdgeKind::MemberOf | EdgeKind::StepInProcess))
        .map(|e| e.target_id.as_str())
        .collect();
    let communities = data
        .communities
        .iter()
        .filter(|c| retained_ids.contains(c.id.as_str()) || referenced.contains(c.id.as_str()))
        .cloned()
        .collect();
    let processes = data
        .processes
        .iter()
        .filter(|p| retained_ids.contains(p.id.as_str()) || referenced.contains(p.id.as_str()))
        .cloned()
        .collect();

    GraphData {
        nodes,
        edges,
        communities,
        processes,
    }
}
