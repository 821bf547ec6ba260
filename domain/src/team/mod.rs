//! Team aggregate: membership, leadership, lifecycle status.

pub mod entities;

pub use entities::{Team, TeamStatus};
