//! Per-book analysis: graph, centralities and the optional extras.

use anyhow::{Result, bail};
use charnet_core::config::AnalysisConfig;
use charnet_core::{Book, BookId};
use tracing::{info, instrument};

use crate::community::{Bisection, CommunityTallies, kernighan_lin_bisection};
use crate::graph::{CharacterGraph, NetworkStats};
use crate::metrics::{CentralityScores, KatzParams};

/// Everything measured for one book.
#[derive(Debug, Clone)]
pub struct BookAnalysis {
    pub book_id: BookId,
    pub word_count: usize,
    pub author_gender: String,
    pub graph: CharacterGraph,
    pub centrality: CentralityScores,
    /// Present when `analysis.network_stats` is on.
    pub stats: Option<NetworkStats>,
    /// Present when `analysis.communities` is on.
    pub communities: Option<(Bisection, CommunityTallies)>,
}

/// Build the graph of a computed book and measure it.
///
/// # Errors
///
/// Fails if the book's network has not been computed, or if Katz
/// centrality does not converge.
#[instrument(skip(book, config), fields(book_id = %book.id))]
pub fn analyze_book(book: &Book, config: &AnalysisConfig) -> Result<BookAnalysis> {
    if !book.is_network_computed() {
        bail!("book {} has no computed network", book.id);
    }
    let graph = CharacterGraph::from_book(book);
    let centrality = CentralityScores::compute(&graph, &KatzParams::from(config))?;

    let stats = config.network_stats.then(|| NetworkStats::from_graph(&graph));
    let communities = config.communities.then(|| {
        let bisection = kernighan_lin_bisection(&graph, config.bisection_max_iter, config.bisection_seed);
        let tallies = CommunityTallies::from_bisection(&graph, &bisection);
        info!(
            community_a = ?bisection.community_a,
            community_b = ?bisection.community_b,
            counts = ?tallies.row(),
            "communities"
        );
        (bisection, tallies)
    });

    if let Some(s) = &stats {
        info!(
            nodes = s.node_count,
            edges = s.edge_count,
            density = s.density,
            transitivity = s.transitivity,
            clustering = s.clustering,
            connected = s.is_connected,
            gender_assortativity = ?s.gender_assortativity,
            "network statistics"
        );
    }

    Ok(BookAnalysis {
        book_id: book.id,
        word_count: book.word_count(),
        author_gender: book.author.gender.clone(),
        graph,
        centrality,
        stats,
        communities,
    })
}
