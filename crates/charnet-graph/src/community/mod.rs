//! Two-way community detection and demographic tallies.
//!
//! - [`kernighan_lin`]: seeded Kernighan–Lin bisection on edge weight.
//! - [`demographics`]: per-community frequency distributions of gender,
//!   descent, education and age.

pub mod demographics;
pub mod kernighan_lin;

pub use demographics::{CommunityTallies, Distribution};
pub use kernighan_lin::{Bisection, kernighan_lin_bisection};
