//! Books, characters and their identifiers.
//!
//! A [`Book`] owns its [`Character`]s behind `Arc` so that the sub-documents
//! of a multi-perspective novel can share them without copying, and owns
//! exactly one [`NetworkModel`](crate::network::NetworkModel).

mod book;
mod character;
mod ids;
mod perspective;

pub use book::{Author, Book};
pub use character::{Character, Demographics, recode_descent};
pub use ids::{BookId, CharacterId, ParseIdError};
pub use perspective::Perspective;
