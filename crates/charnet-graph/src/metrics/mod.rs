//! Centrality metrics for character graphs.
//!
//! # Overview
//!
//! Each metric answers a different question about a character's place in
//! the novel:
//!
//! - **Degree** (`degree`): With how many others does the character
//!   interact at all?
//! - **Betweenness** (`betweenness`): Does the character bridge groups that
//!   otherwise rarely meet?
//! - **Closeness** (`closeness`): How near is the character to everyone
//!   else, reading edge weight as distance?
//! - **Eigenvector** (`eigenvector`): Is the character tied to other
//!   central characters?
//! - **Katz** (`katz`): Eigenvector centrality with a baseline, so that
//!   weakly connected characters still rank.
//!
//! `assortativity` is not a centrality but shares the mixing-matrix
//! machinery used by the network statistics.
//!
//! # Usage
//!
//! All metrics take a [`CharacterGraph`] and return scores keyed by
//! [`CharacterId`]. Isolated characters are always present in the result.
//!
//! ```rust,ignore
//! use charnet_graph::graph::CharacterGraph;
//! use charnet_graph::metrics::{CentralityScores, KatzParams};
//!
//! let cg = CharacterGraph::from_book(&book);
//! let scores = CentralityScores::compute(&cg, &KatzParams::default())?;
//! ```

pub mod assortativity;
pub mod betweenness;
pub mod closeness;
pub mod degree;
pub mod eigenvector;
pub mod katz;

use std::collections::BTreeMap;

use charnet_core::CharacterId;
use serde::Serialize;
use tracing::instrument;

use crate::graph::CharacterGraph;

pub use katz::KatzParams;

/// The five centralities of one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Centrality {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub eigenvector: f64,
    pub katz: f64,
}

/// Centralities of every character of one graph, in catalogue order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CentralityScores {
    pub scores: BTreeMap<CharacterId, Centrality>,
}

impl CentralityScores {
    /// Compute all five centralities.
    ///
    /// # Errors
    ///
    /// Returns an error when Katz centrality does not converge.
    #[instrument(skip(cg, katz_params), fields(book_id = %cg.book_id))]
    pub fn compute(cg: &CharacterGraph, katz_params: &KatzParams) -> anyhow::Result<Self> {
        let degree = degree::degree_centrality(cg);
        let betweenness = betweenness::betweenness_centrality(cg);
        let closeness = closeness::closeness_centrality(cg);
        let eigenvector = eigenvector::eigenvector_centrality(cg);
        let katz = katz::katz_centrality(cg, katz_params)?;

        let score = |m: &BTreeMap<CharacterId, f64>, id: &CharacterId| m.get(id).copied().unwrap_or(0.0);
        let scores = cg
            .character_ids()
            .into_iter()
            .map(|id| {
                let c = Centrality {
                    degree: score(&degree, &id),
                    betweenness: score(&betweenness, &id),
                    closeness: score(&closeness, &id),
                    eigenvector: score(&eigenvector, &id),
                    katz: score(&katz, &id),
                };
                (id, c)
            })
            .collect();
        Ok(Self { scores })
    }

    #[must_use]
    pub fn get(&self, id: CharacterId) -> Option<&Centrality> {
        self.scores.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
