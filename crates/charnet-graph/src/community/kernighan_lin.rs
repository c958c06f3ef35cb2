//! Kernighan–Lin bisection.
//!
//! # Algorithm
//!
//! 1. Shuffle the nodes with a seeded RNG and put the first `n/2` on side A,
//!    the rest on side B.
//! 2. One pass: repeatedly take the unlocked node of A and the unlocked node
//!    of B whose move most reduces the weighted cut, lock both, and update
//!    the gains of their neighbours. This yields a sequence of swap pairs
//!    with a running total cost.
//! 3. Apply the prefix of swaps with the lowest total cost. Stop when no
//!    prefix has negative cost or after `max_iter` passes.
//!
//! Ties between candidates go to the one whose gain was recorded first, so
//! the result depends only on the graph and the seed.

use std::collections::BTreeSet;

use charnet_core::CharacterId;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::graph::CharacterGraph;

/// Two disjoint communities covering every character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bisection {
    pub community_a: BTreeSet<CharacterId>,
    pub community_b: BTreeSet<CharacterId>,
}

/// Gains of the unlocked nodes on one side, popped lowest cost first.
#[derive(Debug, Default)]
struct GainQueue {
    /// `(node, cost, stamp)`; the stamp breaks ties by insertion order.
    entries: Vec<(usize, f64, u64)>,
    stamp: u64,
}

impl GainQueue {
    fn insert(&mut self, node: usize, cost: f64) {
        self.stamp += 1;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.0 == node) {
            *entry = (node, cost, self.stamp);
        } else {
            self.entries.push((node, cost, self.stamp));
        }
    }

    fn get(&self, node: usize) -> Option<f64> {
        self.entries.iter().find(|e| e.0 == node).map(|e| e.1)
    }

    fn pop(&mut self) -> Option<(usize, f64)> {
        let best = self
            .entries
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.1.total_cmp(&b.1).then(a.2.cmp(&b.2)))
            .map(|(i, _)| i)?;
        let (node, cost, _) = self.entries.swap_remove(best);
        Some((node, cost))
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One pass over the current split; returns `(total_cost, (a, b))` per swap.
fn sweep(adj: &[Vec<(usize, f64)>], side: &[bool]) -> Vec<(f64, (usize, usize))> {
    // queues[false] holds side A, queues[true] side B.
    let mut queues = [GainQueue::default(), GainQueue::default()];
    for (u, nbrs) in adj.iter().enumerate() {
        let external_minus_internal: f64 = nbrs
            .iter()
            .map(|&(v, w)| if side[v] { w } else { -w })
            .sum();
        let cost = if side[u] {
            external_minus_internal
        } else {
            -external_minus_internal
        };
        queues[usize::from(side[u])].insert(u, cost);
    }

    let update = |queues: &mut [GainQueue; 2], from: usize, x: usize| {
        for &(y, w) in &adj[x] {
            let to = usize::from(side[y]);
            if let Some(cost) = queues[to].get(y) {
                let delta = if to == from { -w } else { w };
                queues[to].insert(y, 2.0f64.mul_add(delta, cost));
            }
        }
    };

    let mut swaps = Vec::new();
    let mut total = 0.0;
    while !queues[0].is_empty() && !queues[1].is_empty() {
        let Some((u, cost_u)) = queues[0].pop() else { break };
        update(&mut queues, 0, u);
        let Some((v, cost_v)) = queues[1].pop() else { break };
        update(&mut queues, 1, v);
        total += cost_u + cost_v;
        swaps.push((total, (u, v)));
    }
    swaps
}

/// Split the characters of `cg` into two communities, minimizing the weight
/// of the edges between them.
#[must_use]
#[instrument(skip(cg), fields(book_id = %cg.book_id))]
pub fn kernighan_lin_bisection(cg: &CharacterGraph, max_iter: usize, seed: u64) -> Bisection {
    let ids = cg.character_ids();
    let n = ids.len();
    let source_adj = cg.adjacency();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut labels: Vec<usize> = (0..n).collect();
    labels.shuffle(&mut rng);
    let mut position = vec![0; n];
    for (pos, &label) in labels.iter().enumerate() {
        position[label] = pos;
    }
    // Adjacency in shuffled positions.
    let adj: Vec<Vec<(usize, f64)>> = labels
        .iter()
        .map(|&label| {
            source_adj[label]
                .iter()
                .map(|&(v, w)| (position[v], w))
                .collect()
        })
        .collect();

    let mut side: Vec<bool> = (0..n).map(|pos| pos >= n / 2).collect();
    let mut passes = 0;
    for _ in 0..max_iter {
        let swaps = sweep(&adj, &side);
        let Some((best, (min_cost, _))) = swaps
            .iter()
            .enumerate()
            .min_by(|(i, a), (j, b)| a.0.total_cmp(&b.0).then(i.cmp(j)))
        else {
            break;
        };
        if *min_cost >= 0.0 {
            break;
        }
        for &(_, (u, v)) in &swaps[..=best] {
            side[u] = true;
            side[v] = false;
        }
        passes += 1;
    }

    let mut bisection = Bisection::default();
    for (pos, &label) in labels.iter().enumerate() {
        if side[pos] {
            bisection.community_b.insert(ids[label]);
        } else {
            bisection.community_a.insert(ids[label]);
        }
    }
    debug!(
        passes,
        community_a = ?bisection.community_a,
        community_b = ?bisection.community_b,
        "bisected"
    );
    bisection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{graph, id};
    use proptest::prelude::*;

    fn cut_weight(cg: &CharacterGraph, b: &Bisection) -> f64 {
        cg.graph
            .raw_edges()
            .iter()
            .filter(|e| {
                let a = cg.graph[e.source()].id;
                let z = cg.graph[e.target()].id;
                b.community_a.contains(&a) != b.community_a.contains(&z)
            })
            .map(|e| e.weight)
            .sum()
    }

    fn two_triangles() -> CharacterGraph {
        graph(
            6,
            &[
                (1, 2, 1.0),
                (2, 3, 1.0),
                (1, 3, 1.0),
                (4, 5, 1.0),
                (5, 6, 1.0),
                (4, 6, 1.0),
                (3, 4, 0.1),
            ],
        )
    }

    #[test]
    fn separates_two_triangles() {
        let cg = two_triangles();
        for seed in 0..8 {
            let b = kernighan_lin_bisection(&cg, 10, seed);
            assert!((cut_weight(&cg, &b) - 0.1).abs() < 1e-10, "seed {seed}: {b:?}");
            let left: BTreeSet<_> = [id(1), id(2), id(3)].into();
            assert!(b.community_a == left || b.community_b == left);
        }
    }

    #[test]
    fn same_seed_same_split() {
        let cg = two_triangles();
        assert_eq!(kernighan_lin_bisection(&cg, 10, 7), kernighan_lin_bisection(&cg, 10, 7));
    }

    #[test]
    fn tiny_graphs() {
        let empty = kernighan_lin_bisection(&graph(0, &[]), 10, 0);
        assert!(empty.community_a.is_empty() && empty.community_b.is_empty());
        let single = kernighan_lin_bisection(&graph(1, &[]), 10, 0);
        assert!(single.community_a.is_empty());
        assert_eq!(single.community_b.len(), 1);
    }

    proptest! {
        #[test]
        fn bisection_partitions_all_nodes(
            n in 0u32..12,
            edges in prop::collection::vec((1u32..12, 1u32..12, 0.01f64..1.0), 0..30),
            seed in any::<u64>(),
        ) {
            let edges: Vec<_> = edges.into_iter().filter(|&(a, b, _)| a <= n && b <= n).collect();
            let cg = graph(n, &edges);
            let b = kernighan_lin_bisection(&cg, 10, seed);
            prop_assert!(b.community_a.is_disjoint(&b.community_b));
            prop_assert_eq!(b.community_a.len() + b.community_b.len(), n as usize);
            prop_assert_eq!(b.community_a.len(), n as usize / 2);
        }
    }
}
