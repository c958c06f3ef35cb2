//! Degree centrality: the fraction of other characters a character
//! interacts with. Edge weights are ignored.

use std::collections::BTreeMap;

use charnet_core::CharacterId;

use crate::graph::CharacterGraph;

/// Compute degree centrality, `deg(v) / (n - 1)`.
///
/// A graph with a single node gives that node 1.0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(cg: &CharacterGraph) -> BTreeMap<CharacterId, f64> {
    let n = cg.node_count();
    if n <= 1 {
        return cg.character_ids().into_iter().map(|id| (id, 1.0)).collect();
    }
    let scale = 1.0 / (n - 1) as f64;
    let scores: Vec<f64> = cg
        .adjacency()
        .iter()
        .map(|nbrs| nbrs.len() as f64 * scale)
        .collect();
    cg.by_character(&scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{graph, id};

    #[test]
    fn star_center_has_full_degree() {
        let cg = graph(4, &[(1, 2, 0.1), (1, 3, 0.1), (1, 4, 0.1)]);
        let d = degree_centrality(&cg);
        assert!((d[&id(1)] - 1.0).abs() < 1e-10);
        assert!((d[&id(2)] - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn single_node_scores_one() {
        let cg = graph(1, &[]);
        assert!((degree_centrality(&cg)[&id(1)] - 1.0).abs() < 1e-10);
    }
}
