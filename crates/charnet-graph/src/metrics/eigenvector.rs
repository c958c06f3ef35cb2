//! Eigenvector centrality by symmetric eigen-decomposition.
//!
//! # Overview
//!
//! A character is central when it is tied to other central characters. The
//! scores are the entries of the dominant eigenvector of the weighted
//! adjacency matrix.
//!
//! # Algorithm
//!
//! The character graph is undirected, so its adjacency matrix is symmetric
//! and a dense symmetric eigen-solver gives the exact answer without power
//! iteration:
//!
//! 1. Build the `n x n` weighted adjacency matrix.
//! 2. Decompose it with [`SymmetricEigen`] and take the eigenvector of the
//!    largest eigenvalue.
//! 3. Flip its sign so the entries sum to a non-negative value and scale it
//!    to unit L2 norm.
//!
//! A graph without edges has no dominant direction; every node then scores
//! `1/sqrt(n)`.

use std::collections::BTreeMap;

use charnet_core::CharacterId;
use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, instrument};

use crate::graph::CharacterGraph;

#[must_use]
#[instrument(skip(cg), fields(book_id = %cg.book_id))]
#[allow(clippy::cast_precision_loss)]
pub fn eigenvector_centrality(cg: &CharacterGraph) -> BTreeMap<CharacterId, f64> {
    let n = cg.node_count();
    if n == 0 {
        return BTreeMap::new();
    }
    if cg.edge_count() == 0 {
        let uniform = 1.0 / (n as f64).sqrt();
        return cg.character_ids().into_iter().map(|id| (id, uniform)).collect();
    }

    let mut adjacency = DMatrix::zeros(n, n);
    for edge in cg.graph.raw_edges() {
        let (a, b) = (edge.source().index(), edge.target().index());
        adjacency[(a, b)] = edge.weight;
        adjacency[(b, a)] = edge.weight;
    }

    let eigen = SymmetricEigen::new(adjacency);
    let dominant = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i);
    debug!(eigenvalue = eigen.eigenvalues[dominant], "dominant eigenvalue");

    let vector = eigen.eigenvectors.column(dominant);
    let sign = if vector.sum() < 0.0 { -1.0 } else { 1.0 };
    let norm = vector.norm();
    let scores: Vec<f64> = vector.iter().map(|x| sign * x / norm).collect();
    cg.by_character(&scores)
}
