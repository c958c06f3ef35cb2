//! Betweenness centrality via Brandes' algorithm on weighted edges.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a character lies on shortest
//! paths between two other characters. High-betweenness characters are the
//! go-betweens of a novel: removing them would split the cast.
//!
//! # Algorithm
//!
//! Brandes (2001) with Dijkstra instead of BFS, reading the normalized edge
//! weight as a distance:
//!
//! 1. For each source `s`, run Dijkstra to settle nodes in distance order,
//!    counting shortest paths (`sigma`) and recording predecessors. Paths of
//!    exactly equal length are all counted.
//! 2. Accumulate dependency scores in reverse settlement order.
//! 3. Sum the dependencies across all sources.
//!
//! Every unordered pair is visited from both ends, and the sum is scaled by
//! `1 / ((n-1)(n-2))` for graphs with more than two nodes. Smaller graphs
//! are left unscaled (all scores are 0 there anyway).
//!
//! Complexity: O(V * E log V).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use charnet_core::CharacterId;
use tracing::instrument;

use crate::graph::CharacterGraph;

/// Min-heap entry: smallest distance first, then insertion order.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    dist: f64,
    seq: usize,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Compute normalized weighted betweenness centrality for every character.
///
/// Isolated characters score 0.0.
#[must_use]
#[instrument(skip(cg), fields(book_id = %cg.book_id))]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_centrality(cg: &CharacterGraph) -> BTreeMap<CharacterId, f64> {
    let adj = cg.adjacency();
    let n = adj.len();
    let mut cb = vec![0.0; n];

    for s in 0..n {
        // Settlement order; popped in reverse for accumulation.
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0; n];
        sigma[s] = 1.0;

        // Tentative and settled distances.
        let mut seen: Vec<Option<f64>> = vec![None; n];
        let mut settled = vec![false; n];
        seen[s] = Some(0.0);

        let mut heap = BinaryHeap::new();
        let mut seq = 0;
        heap.push(Frontier { dist: 0.0, seq, node: s });

        while let Some(Frontier { dist, node: v, .. }) = heap.pop() {
            if settled[v] {
                continue;
            }
            settled[v] = true;
            stack.push(v);

            for &(w, weight) in &adj[v] {
                let vw = dist + weight;
                if settled[w] {
                    continue;
                }
                match seen[w] {
                    Some(current) if vw > current => {}
                    // Float equality is intended: ties are exact sums.
                    #[allow(clippy::float_cmp)]
                    Some(current) if vw == current => {
                        sigma[w] += sigma[v];
                        predecessors[w].push(v);
                    }
                    _ => {
                        seen[w] = Some(vw);
                        seq += 1;
                        heap.push(Frontier { dist: vw, seq, node: w });
                        sigma[w] = sigma[v];
                        predecessors[w] = vec![v];
                    }
                }
            }
        }

        let mut delta = vec![0.0; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                if sigma[w] > 0.0 {
                    delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
                }
            }
            if w != s {
                cb[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for score in &mut cb {
            *score *= scale;
        }
    }
    cg.by_character(&cb)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
