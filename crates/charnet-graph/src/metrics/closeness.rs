//! Closeness centrality with edge weight as distance.
//!
//! For a character `v` reaching `r - 1` others at total distance `D`,
//! closeness is `(r-1)/D`, scaled by `(r-1)/(n-1)` so that characters in
//! small components do not outrank well-connected ones (Wasserman and
//! Faust). A character that reaches nobody scores 0.

use std::collections::BTreeMap;

use charnet_core::CharacterId;
use petgraph::algo::dijkstra;
use tracing::instrument;

use crate::graph::CharacterGraph;

#[must_use]
#[instrument(skip(cg), fields(book_id = %cg.book_id))]
#[allow(clippy::cast_precision_loss)]
pub fn closeness_centrality(cg: &CharacterGraph) -> BTreeMap<CharacterId, f64> {
    let n = cg.node_count();
    let scores: Vec<f64> = cg
        .graph
        .node_indices()
        .map(|start| {
            let distances = dijkstra(&cg.graph, start, None, |e| *e.weight());
            let total: f64 = distances.values().sum();
            let reached = distances.len().saturating_sub(1) as f64;
            if total > 0.0 && n > 1 {
                (reached / total) * (reached / (n - 1) as f64)
            } else {
                0.0
            }
        })
        .collect();
    cg.by_character(&scores)
}
