//! Attribute assortativity: do characters interact mostly with characters
//! of the same gender, descent, age band or education level?
//!
//! Every undirected edge enters the mixing matrix in both directions. With
//! `e` the mixing matrix normalized to sum 1, `a` its row sums and `b` its
//! column sums, the coefficient is
//!
//! ```text
//! r = (trace(e) - sum(a_i * b_i)) / (1 - sum(a_i * b_i))
//! ```
//!
//! Edge weights are ignored.

use std::collections::BTreeMap;

use tracing::trace;

use crate::graph::CharacterGraph;
use crate::graph::build::NodeAttribute;

/// Assortativity of `attribute`, or `None` when it is undefined.
///
/// Undefined means: some node lacks the attribute, the graph has no edges,
/// or every edge end carries the same value (zero denominator).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn attribute_assortativity(cg: &CharacterGraph, attribute: NodeAttribute) -> Option<f64> {
    let values: Vec<&str> = cg
        .graph
        .node_weights()
        .map(|n| n.attribute(attribute))
        .collect::<Option<_>>()?;
    if cg.edge_count() == 0 {
        return None;
    }

    let mut mixing: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    let mut total = 0.0;
    for edge in cg.graph.raw_edges() {
        let (x, y) = (values[edge.source().index()], values[edge.target().index()]);
        *mixing.entry((x, y)).or_insert(0.0) += 1.0;
        *mixing.entry((y, x)).or_insert(0.0) += 1.0;
        total += 2.0;
    }

    let mut rows: BTreeMap<&str, f64> = BTreeMap::new();
    let mut cols: BTreeMap<&str, f64> = BTreeMap::new();
    let mut trace_sum = 0.0;
    for (&(x, y), &count) in &mixing {
        let p = count / total;
        *rows.entry(x).or_insert(0.0) += p;
        *cols.entry(y).or_insert(0.0) += p;
        if x == y {
            trace_sum += p;
        }
    }
    let expected: f64 = rows
        .iter()
        .map(|(value, a)| a * cols.get(value).copied().unwrap_or(0.0))
        .sum();

    let denominator = 1.0 - expected;
    if denominator.abs() < f64::EPSILON {
        trace!(attribute = attribute.as_str(), "assortativity undefined");
        return None;
    }
    Some((trace_sum - expected) / denominator)
}
