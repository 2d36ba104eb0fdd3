//! Error taxonomy. None of these abort a tick.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The spawner has no prey archetypes to choose from.
    #[error("prey archetype set is empty")]
    EmptyArchetypes,
    /// An optional collaborator (for example the player) is not available yet.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
