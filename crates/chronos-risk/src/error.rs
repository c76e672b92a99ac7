//! Errors raised by risk scoring and its configuration.

use thiserror::Error;

use chronos_core::EntityId;

/// Risk scoring failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// The scored id has no entity.
    #[error("entity not found: {entity_id}")]
    NotFound {
        /// The id that was requested.
        entity_id: EntityId,
    },

    /// The risk configuration is malformed or out of range.
    #[error("invalid risk configuration: {0}")]
    Config(String),
}
