//! Katz centrality by power iteration.
//!
//! Iterates `x <- alpha * A x + beta` from `x = 0` until the summed absolute
//! change drops below `n * tolerance`, then scales `x` to unit L2 norm.
//! With the small normalized weights of character graphs the iteration
//! contracts quickly; failing to converge within `max_iter` rounds is an
//! error, not a silent approximation.

use std::collections::BTreeMap;

use anyhow::bail;
use charnet_core::CharacterId;
use charnet_core::config::AnalysisConfig;
use tracing::{debug, instrument};

use crate::graph::CharacterGraph;

/// Attenuation, baseline and stopping rule for [`katz_centrality`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KatzParams {
    pub alpha: f64,
    pub beta: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for KatzParams {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for KatzParams {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            alpha: config.katz_alpha,
            beta: config.katz_beta,
            max_iter: config.katz_max_iter,
            tolerance: config.katz_tolerance,
        }
    }
}

/// Compute Katz centrality for every character.
///
/// # Errors
///
/// Returns an error if the iteration has not converged after
/// `params.max_iter` rounds.
#[instrument(skip(cg), fields(book_id = %cg.book_id))]
#[allow(clippy::cast_precision_loss)]
pub fn katz_centrality(cg: &CharacterGraph, params: &KatzParams) -> anyhow::Result<BTreeMap<CharacterId, f64>> {
    let adj = cg.adjacency();
    let n = adj.len();
    if n == 0 {
        return Ok(BTreeMap::new());
    }

    let mut x = vec![0.0; n];
    for iteration in 1..=params.max_iter {
        let mut next = vec![0.0; n];
        for (v, nbrs) in adj.iter().enumerate() {
            for &(w, weight) in nbrs {
                next[w] += x[v] * weight;
            }
        }
        for value in &mut next {
            *value = params.alpha.mul_add(*value, params.beta);
        }
        let change: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;

        if change < n as f64 * params.tolerance {
            let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            let scale = if norm > 0.0 { 1.0 / norm } else { 1.0 };
            for value in &mut x {
                *value *= scale;
            }
            debug!(iterations = iteration, "katz converged");
            return Ok(cg.by_character(&x));
        }
    }
    bail!(
        "katz centrality for book {} did not converge within {} iterations",
        cg.book_id,
        params.max_iter
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{graph, id};

    #[test]
    fn star_matches_closed_form() {
        // c = 0.3 l + 1, l = 0.1 c + 1  =>  c / l = 13 / 11.
        let cg = graph(4, &[(1, 2, 1.0), (1, 3, 1.0), (1, 4, 1.0)]);
        let k = katz_centrality(&cg, &KatzParams::default()).expect("converges");
        let norm = (169.0_f64 + 3.0 * 121.0).sqrt();
        assert!((k[&id(1)] - 13.0 / norm).abs() < 1e-5);
        assert!((k[&id(2)] - 11.0 / norm).abs() < 1e-5);
    }

    #[test]
    fn edgeless_graph_is_uniform() {
        let k = katz_centrality(&graph(2, &[]), &KatzParams::default()).expect("converges");
        assert!((k[&id(1)] - 1.0 / 2.0_f64.sqrt()).abs() < 1e-10);
        assert!(katz_centrality(&graph(0, &[]), &KatzParams::default())
            .expect("empty")
            .is_empty());
    }

    #[test]
    fn divergence_is_an_error() {
        let params = KatzParams {
            alpha: 1.0,
            max_iter: 50,
            ..KatzParams::default()
        };
        let cg = graph(3, &[(1, 2, 1.0), (2, 3, 1.0), (1, 3, 1.0)]);
        let err = katz_centrality(&cg, &params).expect_err("diverges");
        assert!(err.to_string().contains("did not converge"));
    }
}
