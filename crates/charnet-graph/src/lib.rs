#![forbid(unsafe_code)]
//! charnet-graph library.
//!
//! Turns the normalized [`NetworkModel`](charnet_core::NetworkModel) of a
//! book into a weighted undirected graph and measures it: five centralities
//! per character, whole-network statistics, and a two-way community split
//! with demographic tallies.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Determinism**: Per-character results are keyed by
//!   [`CharacterId`](charnet_core::CharacterId) in `BTreeMap`s, so output
//!   rows come out in catalogue order.

pub mod analysis;
pub mod community;
pub mod graph;
pub mod metrics;
pub mod report;

#[cfg(test)]
mod testing;

pub use analysis::{BookAnalysis, analyze_book};
pub use graph::{CharacterGraph, CharacterNode, NetworkStats};
pub use metrics::CentralityScores;
