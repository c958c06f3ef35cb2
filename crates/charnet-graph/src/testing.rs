//! Graph fixtures shared by the unit tests.

use charnet_core::{BookId, CharacterId};

use crate::graph::{CharacterGraph, CharacterNode};

pub fn id(n: u32) -> CharacterId {
    CharacterId::new(n)
}

pub fn node(n: u32) -> CharacterNode {
    CharacterNode {
        id: id(n),
        name: format!("c{n}"),
        gender: "1".to_string(),
        author_gender: "1".to_string(),
        descent: None,
        age: None,
        education: None,
    }
}

/// Nodes `1..=n` joined by `(a, b, weight)` edges.
pub fn graph(n: u32, edges: &[(u32, u32, f64)]) -> CharacterGraph {
    graph_of((1..=n).map(node), edges)
}

pub fn graph_of(nodes: impl IntoIterator<Item = CharacterNode>, edges: &[(u32, u32, f64)]) -> CharacterGraph {
    CharacterGraph::from_parts(
        BookId::new(1),
        nodes,
        edges.iter().map(|&(a, b, w)| (id(a), id(b), w)),
    )
}
