//! Graph construction and whole-network statistics.
//!
//! - [`build`]: one node per character, one undirected edge per nonzero
//!   normalized weight.
//! - [`stats`]: density, transitivity, clustering, connectivity and
//!   attribute assortativity.

pub mod build;
pub mod stats;

pub use build::{CharacterGraph, CharacterNode};
pub use stats::NetworkStats;
