//! Whole-network statistics for a character graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Number of characters, isolated ones included.
//! - **edge_count**: Number of undirected weighted edges.
//! - **density**: `2m / (n(n-1))`. Zero for graphs with 0 or 1 node.
//! - **transitivity**: `3 * triangles / connected triples`. Zero when the
//!   graph holds no triangle.
//! - **clustering**: Mean over all nodes of the weighted local clustering
//!   coefficient, where a triangle contributes the geometric mean of its
//!   three edge weights divided by the graph's maximum weight.
//! - **is_connected**: Whether the graph forms a single component. An empty
//!   graph is not connected.
//! - **assortativity**: Attribute assortativity per demographic attribute;
//!   `None` when any node lacks the attribute or the coefficient is
//!   undefined.

use petgraph::algo::connected_components;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::build::{CharacterGraph, NodeAttribute};
use crate::metrics::assortativity::attribute_assortativity;

// ---------------------------------------------------------------------------
// NetworkStats
// ---------------------------------------------------------------------------

/// Summary statistics for one book's character graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub transitivity: f64,
    /// Weighted average clustering coefficient.
    pub clustering: f64,
    pub is_connected: bool,
    pub gender_assortativity: Option<f64>,
    pub descent_assortativity: Option<f64>,
    pub age_assortativity: Option<f64>,
    pub education_assortativity: Option<f64>,
}

impl NetworkStats {
    /// Compute all statistics for `cg`.
    #[must_use]
    #[instrument(skip(cg), fields(book_id = %cg.book_id))]
    pub fn from_graph(cg: &CharacterGraph) -> Self {
        let adj = cg.adjacency();
        let n = cg.node_count();
        let m = cg.edge_count();
        let stats = Self {
            node_count: n,
            edge_count: m,
            density: density(n, m),
            transitivity: transitivity(&adj),
            clustering: average_clustering(&adj),
            is_connected: n > 0 && connected_components(&cg.graph) == 1,
            gender_assortativity: attribute_assortativity(cg, NodeAttribute::Gender),
            descent_assortativity: attribute_assortativity(cg, NodeAttribute::Descent),
            age_assortativity: attribute_assortativity(cg, NodeAttribute::Age),
            education_assortativity: attribute_assortativity(cg, NodeAttribute::Education),
        };
        debug!(
            nodes = stats.node_count,
            edges = stats.edge_count,
            density = stats.density,
            transitivity = stats.transitivity,
            clustering = stats.clustering,
            connected = stats.is_connected,
            "network statistics"
        );
        stats
    }
}

#[allow(clippy::cast_precision_loss)]
fn density(n: usize, m: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    (2 * m) as f64 / (n * (n - 1)) as f64
}

/// Weight of edge `a`-`b`; neighbour lists are sorted by index.
fn weight_of(adj: &[Vec<(usize, f64)>], a: usize, b: usize) -> Option<f64> {
    adj[a]
        .binary_search_by_key(&b, |&(v, _)| v)
        .ok()
        .map(|pos| adj[a][pos].1)
}

#[allow(clippy::cast_precision_loss)]
fn transitivity(adj: &[Vec<(usize, f64)>]) -> f64 {
    let mut closed = 0usize;
    let mut triples = 0usize;
    for nbrs in adj {
        let d = nbrs.len();
        triples += d * d.saturating_sub(1);
        for (i, &(j, _)) in nbrs.iter().enumerate() {
            for &(k, _) in &nbrs[i + 1..] {
                if weight_of(adj, j, k).is_some() {
                    closed += 2;
                }
            }
        }
    }
    if closed == 0 {
        return 0.0;
    }
    closed as f64 / triples as f64
}

#[allow(clippy::cast_precision_loss)]
fn average_clustering(adj: &[Vec<(usize, f64)>]) -> f64 {
    if adj.is_empty() {
        return 0.0;
    }
    let max_weight = adj
        .iter()
        .flatten()
        .map(|&(_, w)| w)
        .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |m| m.max(w))))
        .unwrap_or(1.0);

    let total: f64 = adj
        .iter()
        .map(|nbrs| {
            let d = nbrs.len();
            if d < 2 {
                return 0.0;
            }
            let mut weighted = 0.0;
            for (i, &(j, wij)) in nbrs.iter().enumerate() {
                for &(k, wik) in &nbrs[i + 1..] {
                    if let Some(wjk) = weight_of(adj, j, k) {
                        weighted += (wij * wjk * wik / max_weight.powi(3)).cbrt();
                    }
                }
            }
            2.0 * weighted / (d * (d - 1)) as f64
        })
        .sum();
    total / adj.len() as f64
}
