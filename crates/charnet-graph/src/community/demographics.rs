//! Demographic frequency distributions of a book and its two communities.
//!
//! Catalogue codes are mapped onto fixed category lists. A code outside a
//! list (or a missing attribute) is not counted anywhere.

use std::collections::BTreeSet;

use charnet_core::CharacterId;
use serde::Serialize;

use crate::community::kernighan_lin::Bisection;
use crate::graph::CharacterGraph;
use crate::graph::build::NodeAttribute;

/// `(code, category label)` in output order.
pub type Categories = &'static [(&'static str, &'static str)];

pub const GENDER: Categories = &[("1", "male"), ("2", "female"), ("99", "unknown")];
pub const DESCENT: Categories = &[("0", "non-migrant"), ("1", "migrant"), ("99", "unknown")];
pub const EDUCATION: Categories = &[("1", "high education"), ("2", "low education"), ("99", "unknown")];
pub const AGE: Categories = &[
    ("1", "<25"),
    ("2", "26-35"),
    ("3", "36-45"),
    ("4", "46-55"),
    ("5", "56-64"),
    ("6", "65+"),
    ("99", "unknown"),
];

/// Attributes in output order, with their category lists.
pub const TALLIED: [(NodeAttribute, Categories); 4] = [
    (NodeAttribute::Gender, GENDER),
    (NodeAttribute::Descent, DESCENT),
    (NodeAttribute::Education, EDUCATION),
    (NodeAttribute::Age, AGE),
];

/// Counts per category, in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub counts: Vec<u64>,
}

impl Distribution {
    fn tally<'a>(
        cg: &CharacterGraph,
        members: impl IntoIterator<Item = &'a CharacterId>,
        attribute: NodeAttribute,
        categories: Categories,
    ) -> Self {
        let mut counts = vec![0; categories.len()];
        for id in members {
            let Some(code) = cg.node(*id).and_then(|n| n.attribute(attribute)) else {
                continue;
            };
            if let Some(slot) = categories.iter().position(|(c, _)| *c == code.trim()) {
                counts[slot] += 1;
            }
        }
        Self { counts }
    }
}

/// Book, community A and community B distributions of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeTally {
    pub attribute: &'static str,
    pub book: Distribution,
    pub community_a: Distribution,
    pub community_b: Distribution,
}

/// Distributions for gender, descent, education and age, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityTallies {
    pub tallies: Vec<AttributeTally>,
}

impl CommunityTallies {
    /// Tally the demographics of the whole cast and of each community.
    #[must_use]
    pub fn from_bisection(cg: &CharacterGraph, bisection: &Bisection) -> Self {
        let everyone: BTreeSet<&CharacterId> = bisection
            .community_a
            .iter()
            .chain(&bisection.community_b)
            .collect();
        let tallies = TALLIED
            .iter()
            .map(|&(attribute, categories)| AttributeTally {
                attribute: attribute.as_str(),
                book: Distribution::tally(cg, everyone.iter().copied(), attribute, categories),
                community_a: Distribution::tally(cg, &bisection.community_a, attribute, categories),
                community_b: Distribution::tally(cg, &bisection.community_b, attribute, categories),
            })
            .collect();
        Self { tallies }
    }

    /// All counts flattened into one row: per attribute the book counts,
    /// then community A, then community B.
    #[must_use]
    pub fn row(&self) -> Vec<u64> {
        self.tallies
            .iter()
            .flat_map(|t| {
                t.book
                    .counts
                    .iter()
                    .chain(&t.community_a.counts)
                    .chain(&t.community_b.counts)
                    .copied()
            })
            .collect()
    }

    /// Column names matching [`CommunityTallies::row`].
    #[must_use]
    pub fn header() -> Vec<String> {
        TALLIED
            .iter()
            .flat_map(|&(attribute, categories)| {
                ["book", "community_a", "community_b"].into_iter().flat_map(move |scope| {
                    categories
                        .iter()
                        .map(move |(_, label)| format!("{}_{scope}_{label}", attribute.as_str()))
                })
            })
            .collect()
    }
}
