//! Build a weighted undirected [`CharacterGraph`] from a computed book.
//!
//! Every catalogued character becomes a node, including characters that
//! never co-occur with anyone. Node indices follow catalogue order, so
//! index `i` is the `i`-th character by ascending [`CharacterId`].
//!
//! The network model is directed: a narrator edge only points away from the
//! narrator, and windowed pairs carry the same weight both ways. The graph
//! keeps one undirected edge per pair, weighted by the larger of the two
//! directed normalized weights.

use std::collections::BTreeMap;

use charnet_core::{Book, BookId, CharacterId};
use petgraph::graph::{NodeIndex, UnGraph};
use tracing::debug;

/// Per-node attributes carried into the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterNode {
    pub id: CharacterId,
    pub name: String,
    pub gender: String,
    /// Gender code of the book's author; the same on every node of a book.
    pub author_gender: String,
    pub descent: Option<String>,
    pub age: Option<String>,
    pub education: Option<String>,
}

impl CharacterNode {
    /// The value of a categorical attribute, if the catalogue supplied it.
    #[must_use]
    pub fn attribute(&self, attribute: NodeAttribute) -> Option<&str> {
        match attribute {
            NodeAttribute::Gender => Some(self.gender.as_str()),
            NodeAttribute::Descent => self.descent.as_deref(),
            NodeAttribute::Age => self.age.as_deref(),
            NodeAttribute::Education => self.education.as_deref(),
        }
    }
}

/// Categorical node attributes used by assortativity and community tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeAttribute {
    Gender,
    Descent,
    Age,
    Education,
}

impl NodeAttribute {
    pub const ALL: [Self; 4] = [Self::Gender, Self::Descent, Self::Age, Self::Education];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Descent => "descent",
            Self::Age => "age",
            Self::Education => "education",
        }
    }
}

// ---------------------------------------------------------------------------
// CharacterGraph
// ---------------------------------------------------------------------------

/// Weighted undirected character graph of one book.
#[derive(Debug, Clone)]
pub struct CharacterGraph {
    pub book_id: BookId,
    pub graph: UnGraph<CharacterNode, f64>,
    pub node_map: BTreeMap<CharacterId, NodeIndex>,
}

impl CharacterGraph {
    /// Build the graph of `book` from its normalized weights.
    ///
    /// A book whose network has not been computed yet produces a graph with
    /// nodes but no edges.
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        let author_gender = book.author.gender.clone();
        let nodes = book.characters().map(|c| CharacterNode {
            id: c.id,
            name: c.name.clone(),
            gender: c.gender.clone(),
            author_gender: author_gender.clone(),
            descent: c.demographics.descent.clone(),
            age: c.demographics.age.clone(),
            education: c.demographics.education.clone(),
        });
        Self::from_parts(book.id, nodes, book.network().normalized_edges())
    }

    /// Build a graph from explicit nodes and directed weighted edges.
    ///
    /// Edges touching unknown characters and self-loops are dropped. Both
    /// directions of a pair collapse onto one edge carrying the larger
    /// weight; non-positive weights leave no edge.
    pub fn from_parts(
        book_id: BookId,
        nodes: impl IntoIterator<Item = CharacterNode>,
        edges: impl IntoIterator<Item = (CharacterId, CharacterId, f64)>,
    ) -> Self {
        let mut sorted: Vec<CharacterNode> = nodes.into_iter().collect();
        sorted.sort_by_key(|n| n.id);
        sorted.dedup_by_key(|n| n.id);

        let mut graph = UnGraph::with_capacity(sorted.len(), 0);
        let mut node_map = BTreeMap::new();
        for node in sorted {
            let id = node.id;
            let idx = graph.add_node(node);
            node_map.insert(id, idx);
        }

        let mut merged: BTreeMap<(CharacterId, CharacterId), f64> = BTreeMap::new();
        let mut dropped = 0usize;
        for (source, target, weight) in edges {
            if source == target || !node_map.contains_key(&source) || !node_map.contains_key(&target) {
                dropped += 1;
                continue;
            }
            if weight <= 0.0 {
                continue;
            }
            let key = if source < target { (source, target) } else { (target, source) };
            let entry = merged.entry(key).or_insert(0.0);
            *entry = entry.max(weight);
        }
        for ((a, b), weight) in merged {
            graph.add_edge(node_map[&a], node_map[&b], weight);
        }

        debug!(
            %book_id,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped,
            "built character graph"
        );
        Self {
            book_id,
            graph,
            node_map,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Character ids in node-index order.
    #[must_use]
    pub fn character_ids(&self) -> Vec<CharacterId> {
        self.graph.node_weights().map(|n| n.id).collect()
    }

    #[must_use]
    pub fn node(&self, id: CharacterId) -> Option<&CharacterNode> {
        self.node_map.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Weight of the edge between `a` and `b`, if any.
    #[must_use]
    pub fn weight_between(&self, a: CharacterId, b: CharacterId) -> Option<f64> {
        let (&ia, &ib) = (self.node_map.get(&a)?, self.node_map.get(&b)?);
        self.graph.find_edge(ia, ib).map(|e| self.graph[e])
    }

    /// Neighbour lists by node index, each sorted by neighbour index.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.node_count()];
        for edge in self.graph.raw_edges() {
            let (a, b) = (edge.source().index(), edge.target().index());
            adj[a].push((b, edge.weight));
            adj[b].push((a, edge.weight));
        }
        for list in &mut adj {
            list.sort_by_key(|&(v, _)| v);
        }
        adj
    }

    /// Key per-node-index scores by character id.
    #[must_use]
    pub fn by_character(&self, scores: &[f64]) -> BTreeMap<CharacterId, f64> {
        self.graph
            .node_weights()
            .zip(scores)
            .map(|(n, &s)| (n.id, s))
            .collect()
    }
}
