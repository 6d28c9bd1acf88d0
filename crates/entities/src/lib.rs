//! Core entity definitions for Friendmap.
//!
//! This crate defines the data types used across the Friendmap application:
//! the [`User`] entity, the popularity scoring formula, and the pure
//! node/edge graph projection consumed by the frontend canvas.

mod graph;
mod popularity;
mod user;

pub use graph::*;
pub use popularity::*;
pub use user::*;
