//! Configuration: file schema and multi-source loader.

pub mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use teamforge_application::VotingConfig;

/// Top-level configuration file schema.
///
/// ```toml
/// [voting]
/// max_vote_retries = 5
/// honor_kick_penalty = 10
/// poll_deadline_secs = 86400
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub voting: VotingConfig,
}
