//! Weighted, directed interaction model of one book.
//!
//! # Overview
//!
//! Raw weights accumulate per ordered `(source, target)` pair. Every pair
//! with a weight also has a relation label, `"none"` unless an explicit
//! relation was recorded. Normalized weights are derived from the raw
//! weights and the book's word count, and are rebuilt from scratch on every
//! [`NetworkModel::normalize`] call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, ErrorCode, Result};
use crate::model::{BookId, CharacterId};

/// Relation label recorded for a weighted pair without an explicit relation.
pub const NO_RELATION: &str = "none";

/// How sub-document weights are folded into the parent network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    /// Weights of the same pair add up across sub-documents.
    #[default]
    Sum,
    /// The largest weight reported for a pair wins.
    Max,
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sum => f.write_str("sum"),
            Self::Max => f.write_str("max"),
        }
    }
}

type Adjacency<T> = BTreeMap<CharacterId, BTreeMap<CharacterId, T>>;

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkModel {
    book_id: BookId,
    weights: Adjacency<u64>,
    relation_types: Adjacency<String>,
    normalized: Adjacency<f64>,
}

impl NetworkModel {
    #[must_use]
    pub const fn new(book_id: BookId) -> Self {
        Self {
            book_id,
            weights: BTreeMap::new(),
            relation_types: BTreeMap::new(),
            normalized: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn book_id(&self) -> BookId {
        self.book_id
    }

    /// Accumulate `amount` into the weight of `source -> target`.
    ///
    /// A relation entry is created (as [`NO_RELATION`]) when the pair has
    /// none yet.
    pub fn add_weight(&mut self, source: CharacterId, target: CharacterId, amount: u64) {
        self.ensure_relation(source, target);
        *self
            .weights
            .entry(source)
            .or_default()
            .entry(target)
            .or_insert(0) += amount;
    }

    /// Record an explicit relation label (lover, friend, family, ...).
    ///
    /// The label survives later [`add_weight`](Self::add_weight) calls.
    pub fn set_relation(&mut self, source: CharacterId, target: CharacterId, label: impl Into<String>) {
        self.relation_types
            .entry(source)
            .or_default()
            .insert(target, label.into());
    }

    fn ensure_relation(&mut self, source: CharacterId, target: CharacterId) {
        self.relation_types
            .entry(source)
            .or_default()
            .entry(target)
            .or_insert_with(|| NO_RELATION.to_string());
    }

    /// Raw weight of `source -> target`, 0 when absent.
    #[must_use]
    pub fn weight(&self, source: CharacterId, target: CharacterId) -> u64 {
        self.weights
            .get(&source)
            .and_then(|targets| targets.get(&target))
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn relation(&self, source: CharacterId, target: CharacterId) -> Option<&str> {
        self.relation_types
            .get(&source)
            .and_then(|targets| targets.get(&target))
            .map(String::as_str)
    }

    #[must_use]
    pub fn normalized_weight(&self, source: CharacterId, target: CharacterId) -> Option<f64> {
        self.normalized
            .get(&source)
            .and_then(|targets| targets.get(&target))
            .copied()
    }

    /// All `(source, target, raw weight)` triples in id order.
    pub fn edges(&self) -> impl Iterator<Item = (CharacterId, CharacterId, u64)> + '_ {
        self.weights.iter().flat_map(|(&source, targets)| {
            targets.iter().map(move |(&target, &w)| (source, target, w))
        })
    }

    /// All `(source, target, normalized weight)` triples in id order.
    pub fn normalized_edges(&self) -> impl Iterator<Item = (CharacterId, CharacterId, f64)> + '_ {
        self.normalized.iter().flat_map(|(&source, targets)| {
            targets.iter().map(move |(&target, &w)| (source, target, w))
        })
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.weights.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Fold the raw weights of `child` into this model.
    ///
    /// Explicit relation labels of the child replace this model's label for
    /// the same pair; `"none"` never overwrites an explicit label.
    pub fn compose(&mut self, child: &Self, policy: Composition) {
        for (source, target, weight) in child.edges() {
            match policy {
                Composition::Sum => self.add_weight(source, target, weight),
                Composition::Max => {
                    self.ensure_relation(source, target);
                    let slot = self
                        .weights
                        .entry(source)
                        .or_default()
                        .entry(target)
                        .or_insert(0);
                    *slot = (*slot).max(weight);
                }
            }
            if let Some(label) = child.relation(source, target) {
                if label != NO_RELATION {
                    self.set_relation(source, target, label);
                }
            }
        }
        debug!(
            book_id = %self.book_id,
            child = %child.book_id,
            %policy,
            edges = self.edge_count(),
            "composed sub-document network"
        );
    }

    /// Recompute the normalized weights as `weight / word_count`.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when `word_count` is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn normalize(&mut self, word_count: usize) -> Result<()> {
        if word_count == 0 {
            return Err(Error::precondition(
                self.book_id,
                ErrorCode::ZeroWordCount,
                "cannot normalize weights of a book without words",
            ));
        }
        let denominator = word_count as f64;
        self.normalized = self
            .weights
            .iter()
            .map(|(&source, targets)| {
                let row = targets
                    .iter()
                    .map(|(&target, &w)| (target, w as f64 / denominator))
                    .collect();
                (source, row)
            })
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(n: u32) -> CharacterId {
        CharacterId::new(n)
    }

    fn model() -> NetworkModel {
        NetworkModel::new(BookId::new(10))
    }

    #[test]
    fn weights_accumulate() {
        let mut m = model();
        m.add_weight(id(1), id(2), 3);
        m.add_weight(id(1), id(2), 2);
        assert_eq!(m.weight(id(1), id(2)), 5);
        assert_eq!(m.weight(id(2), id(1)), 0);
        assert_eq!(m.relation(id(1), id(2)), Some(NO_RELATION));
        assert_eq!(m.relation(id(2), id(1)), None);
    }

    #[test]
    fn explicit_relation_survives_new_weight() {
        let mut m = model();
        m.set_relation(id(1), id(2), "lover");
        m.add_weight(id(1), id(2), 1);
        assert_eq!(m.relation(id(1), id(2)), Some("lover"));
    }

    #[test]
    fn normalize_divides_by_word_count() {
        let mut m = model();
        m.add_weight(id(1), id(2), 5);
        m.normalize(100).expect("non-zero word count");
        let w = m.normalized_weight(id(1), id(2)).expect("normalized");
        assert!((w - 0.05).abs() < 1e-10);
    }

    #[test]
    fn normalize_rejects_zero_word_count() {
        let mut m = model();
        m.add_weight(id(1), id(2), 5);
        let err = m.normalize(0).expect_err("zero word count");
        assert_eq!(err.code(), ErrorCode::ZeroWordCount);
        assert_eq!(err.book_id(), Some("10"));
    }

    #[test]
    fn normalize_recomputes_after_new_weights() {
        let mut m = model();
        m.add_weight(id(1), id(2), 1);
        m.normalize(10).expect("normalize");
        m.add_weight(id(1), id(2), 1);
        m.normalize(10).expect("normalize");
        let w = m.normalized_weight(id(1), id(2)).expect("normalized");
        assert!((w - 0.2).abs() < 1e-10);
    }

    #[test]
    fn compose_sums_overlapping_pairs() {
        let mut parent = model();
        let mut a = NetworkModel::new(BookId::new(10).sub_document(1));
        let mut b = NetworkModel::new(BookId::new(10).sub_document(2));
        a.add_weight(id(1), id(2), 2);
        b.add_weight(id(1), id(2), 3);
        b.add_weight(id(2), id(3), 1);
        parent.compose(&a, Composition::Sum);
        parent.compose(&b, Composition::Sum);
        assert_eq!(parent.weight(id(1), id(2)), 5);
        assert_eq!(parent.weight(id(2), id(3)), 1);
        assert_eq!(parent.relation(id(2), id(3)), Some(NO_RELATION));
    }

    #[test]
    fn compose_max_keeps_largest() {
        let mut parent = model();
        let mut a = model();
        let mut b = model();
        a.add_weight(id(1), id(2), 2);
        b.add_weight(id(1), id(2), 3);
        parent.compose(&a, Composition::Max);
        parent.compose(&b, Composition::Max);
        assert_eq!(parent.weight(id(1), id(2)), 3);
    }

    #[test]
    fn compose_keeps_explicit_relation_over_none() {
        let mut parent = model();
        let mut a = model();
        let mut b = model();
        a.add_weight(id(1), id(2), 1);
        a.set_relation(id(1), id(2), "friend");
        b.add_weight(id(1), id(2), 1);
        parent.compose(&a, Composition::Sum);
        parent.compose(&b, Composition::Sum);
        assert_eq!(parent.relation(id(1), id(2)), Some("friend"));
    }

    fn arb_model() -> impl Strategy<Value = NetworkModel> {
        proptest::collection::vec((1u32..6, 1u32..6, 1u64..50), 0..20).prop_map(|triples| {
            let mut m = model();
            for (s, t, w) in triples {
                m.add_weight(id(s), id(t), w);
            }
            m
        })
    }

    proptest! {
        #[test]
        fn normalize_is_pure(mut m in arb_model(), wc in 1usize..10_000) {
            m.normalize(wc).expect("normalize");
            let first: Vec<_> = m.normalized_edges().collect();
            m.normalize(wc).expect("normalize");
            let second: Vec<_> = m.normalized_edges().collect();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn compose_is_commutative(a in arb_model(), b in arb_model(), max in any::<bool>()) {
            let policy = if max { Composition::Max } else { Composition::Sum };
            let mut ab = model();
            ab.compose(&a, policy);
            ab.compose(&b, policy);
            let mut ba = model();
            ba.compose(&b, policy);
            ba.compose(&a, policy);
            prop_assert_eq!(ab.edges().collect::<Vec<_>>(), ba.edges().collect::<Vec<_>>());
        }

        #[test]
        fn compose_is_associative(a in arb_model(), b in arb_model(), c in arb_model()) {
            let mut left = model();
            left.compose(&a, Composition::Sum);
            left.compose(&b, Composition::Sum);
            left.compose(&c, Composition::Sum);

            let mut bc = model();
            bc.compose(&b, Composition::Sum);
            bc.compose(&c, Composition::Sum);
            let mut right = model();
            right.compose(&a, Composition::Sum);
            right.compose(&bc, Composition::Sum);

            prop_assert_eq!(left.edges().collect::<Vec<_>>(), right.edges().collect::<Vec<_>>());
        }
    }
}
