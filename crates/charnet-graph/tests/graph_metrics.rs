//! Known-topology regression tests for graph metrics.
//!
//! Each test uses a hand-crafted character graph with known properties.
//! Expected values are derived analytically and hardcoded, so any change
//! to an algorithm that shifts them is caught.

use charnet_core::{BookId, CharacterId};
use charnet_graph::community::kernighan_lin_bisection;
use charnet_graph::graph::{CharacterGraph, CharacterNode, NetworkStats};
use charnet_graph::metrics::betweenness::betweenness_centrality;
use charnet_graph::metrics::closeness::closeness_centrality;
use charnet_graph::metrics::degree::degree_centrality;
use charnet_graph::metrics::eigenvector::eigenvector_centrality;
use charnet_graph::metrics::katz::{KatzParams, katz_centrality};
use charnet_graph::metrics::CentralityScores;

// ---------------------------------------------------------------------------
// Helper: build a CharacterGraph from an edge list
// ---------------------------------------------------------------------------

fn id(n: u32) -> CharacterId {
    CharacterId::new(n)
}

fn build_graph(nodes: u32, edges: &[(u32, u32, f64)]) -> CharacterGraph {
    let nodes = (1..=nodes).map(|n| CharacterNode {
        id: id(n),
        name: format!("character {n}"),
        gender: if n % 2 == 0 { "2" } else { "1" }.to_string(),
        author_gender: "1".to_string(),
        descent: None,
        age: None,
        education: None,
    });
    CharacterGraph::from_parts(
        BookId::new(1),
        nodes,
        edges.iter().map(|&(a, b, w)| (id(a), id(b), w)),
    )
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ===========================================================================
// Path: 1 - 2 - 3 - 4, unit weights
// ===========================================================================

fn path4() -> CharacterGraph {
    build_graph(4, &[(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)])
}

#[test]
fn path_degree() {
    let d = degree_centrality(&path4());
    assert_close(d[&id(1)], 1.0 / 3.0);
    assert_close(d[&id(2)], 2.0 / 3.0);
}

#[test]
fn path_betweenness() {
    // 2 lies on 1-3 and 1-4, both directions: 4 / ((n-1)(n-2)) = 4/6.
    let bc = betweenness_centrality(&path4());
    assert_close(bc[&id(1)], 0.0);
    assert_close(bc[&id(2)], 2.0 / 3.0);
    assert_close(bc[&id(3)], 2.0 / 3.0);
    assert_close(bc[&id(4)], 0.0);
}

#[test]
fn path_closeness() {
    let cc = closeness_centrality(&path4());
    assert_close(cc[&id(1)], 3.0 / 6.0);
    assert_close(cc[&id(2)], 3.0 / 4.0);
}

#[test]
fn path_eigenvector() {
    // Dominant eigenvector of P4 is proportional to sin(k*pi/5), k = 1..4.
    let ev = eigenvector_centrality(&path4());
    let pi5 = std::f64::consts::PI / 5.0;
    let norm = 2.5_f64.sqrt();
    assert_close(ev[&id(1)], pi5.sin() / norm);
    assert_close(ev[&id(2)], (2.0 * pi5).sin() / norm);
    assert_close(ev[&id(3)], (3.0 * pi5).sin() / norm);
    assert_close(ev[&id(4)], (4.0 * pi5).sin() / norm);
}

// ===========================================================================
// Complete graph K4, weight 0.5
// ===========================================================================

fn complete4() -> CharacterGraph {
    let mut edges = Vec::new();
    for a in 1..=4 {
        for b in (a + 1)..=4 {
            edges.push((a, b, 0.5));
        }
    }
    build_graph(4, &edges)
}

#[test]
fn complete_graph_is_uniform() {
    let cg = complete4();
    let scores = CentralityScores::compute(&cg, &KatzParams::default()).expect("katz converges");
    for i in 1..=4 {
        let c = scores.get(id(i)).expect("scored");
        assert_close(c.degree, 1.0);
        assert_close(c.betweenness, 0.0);
        assert_close(c.closeness, 2.0);
        assert_close(c.eigenvector, 0.5);
        assert!((c.katz - 0.5).abs() < 1e-6);
    }
}

#[test]
fn complete_graph_statistics() {
    let s = NetworkStats::from_graph(&complete4());
    assert_eq!(s.node_count, 4);
    assert_eq!(s.edge_count, 6);
    assert_close(s.density, 1.0);
    assert_close(s.transitivity, 1.0);
    assert_close(s.clustering, 1.0);
    assert!(s.is_connected);
    // Genders alternate: 2 same-gender edges of 6.
    // e = [[1/6, 1/3], [1/3, 1/6]], a = b = [1/2, 1/2]; r = (1/3 - 1/2) / (1/2).
    assert_close(s.gender_assortativity.expect("gender"), -1.0 / 3.0);
    assert_eq!(s.descent_assortativity, None);
}

// ===========================================================================
// Star: 1 at the center of 2, 3, 4, 5
// ===========================================================================

fn star5() -> CharacterGraph {
    build_graph(5, &[(1, 2, 0.1), (1, 3, 0.1), (1, 4, 0.1), (1, 5, 0.1)])
}

#[test]
fn star_center_carries_all_paths() {
    let bc = betweenness_centrality(&star5());
    assert_close(bc[&id(1)], 1.0);
    for leaf in 2..=5 {
        assert_close(bc[&id(leaf)], 0.0);
    }
}

#[test]
fn star_statistics() {
    let s = NetworkStats::from_graph(&star5());
    assert_close(s.density, 0.4);
    assert_close(s.transitivity, 0.0);
    assert_close(s.clustering, 0.0);
}

#[test]
fn star_katz_ranks_center_first() {
    let k = katz_centrality(&star5(), &KatzParams::default()).expect("converges");
    assert!(k[&id(1)] > k[&id(2)]);
    let norm: f64 = k.values().map(|x| x * x).sum::<f64>().sqrt();
    assert_close(norm, 1.0);
}

// ===========================================================================
// Disconnected: 1-2, 3-4, and isolated 5
// ===========================================================================

#[test]
fn disconnected_graph() {
    let cg = build_graph(5, &[(1, 2, 0.2), (3, 4, 0.2)]);
    let s = NetworkStats::from_graph(&cg);
    assert!(!s.is_connected);
    assert_close(s.density, 0.2);

    let cc = closeness_centrality(&cg);
    // Reaches 1 of 4 others at distance 0.2: 5 * 1/4.
    assert_close(cc[&id(1)], 1.25);
    assert_close(cc[&id(5)], 0.0);

    let d = degree_centrality(&cg);
    assert_close(d[&id(5)], 0.0);
}

// ===========================================================================
// Communities: two weighted cliques joined by a weak edge
// ===========================================================================

#[test]
fn bisection_cuts_the_weak_edge() {
    let cg = build_graph(
        6,
        &[
            (1, 2, 0.3),
            (2, 3, 0.3),
            (1, 3, 0.3),
            (4, 5, 0.3),
            (5, 6, 0.3),
            (4, 6, 0.3),
            (3, 4, 0.01),
        ],
    );
    let b = kernighan_lin_bisection(&cg, 10, 42);
    let left = [id(1), id(2), id(3)].into();
    let right = [id(4), id(5), id(6)].into();
    assert!(
        (b.community_a == left && b.community_b == right)
            || (b.community_a == right && b.community_b == left),
        "{b:?}"
    );
}
