//! User storage for Friendmap.
//!
//! This crate provides the storage abstraction for user records, including
//! the atomic pairwise update both sides of a friendship are written
//! through. The in-memory backend is the one the server runs on; anything
//! else only needs to implement [`UserStore`].

mod error;
mod memory;
mod traits;

pub use error::*;
pub use memory::*;
pub use traits::*;
