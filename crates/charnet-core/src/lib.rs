#![forbid(unsafe_code)]
//! charnet-core library.
//!
//! Builds the weighted character network of a single novel: name variants
//! are rewritten into collision-safe markers, the marked text is split into
//! sentences, and pairwise weights are computed under the rule that fits the
//! book's narrative perspective.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return [`error::Result`]. Data problems
//!   are fatal by default; the batch driver decides whether to abort or skip.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod catalogue;
pub mod config;
pub mod cooccurrence;
pub mod error;
pub mod model;
pub mod namecode;
pub mod network;
pub mod pipeline;
pub mod segment;
pub mod split;

pub use catalogue::Corpus;
pub use config::{Config, load_config};
pub use error::{Error, ErrorCode, Result};
pub use model::{Book, BookId, Character, CharacterId, Perspective};
pub use network::{Composition, NetworkModel};
pub use pipeline::Pipeline;
