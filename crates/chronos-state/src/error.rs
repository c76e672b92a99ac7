//! Errors raised by the Entity Store and the lifecycle state machine.

use thiserror::Error;

use chronos_core::{CoreError, EntityId};

use crate::lifecycle::EntityStatus;

/// Entity Store / lifecycle failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// No entity carries this id.
    #[error("entity not found: {entity_id}")]
    NotFound {
        /// The id that was looked up.
        entity_id: EntityId,
    },

    /// The requested status is not a legal successor of the current one.
    #[error("illegal transition for {entity_id}: {from} -> {to}")]
    IllegalTransition {
        /// The entity whose transition was rejected.
        entity_id: EntityId,
        /// Current status.
        from: EntityStatus,
        /// Requested status.
        to: EntityStatus,
    },

    /// The submitted attributes are unusable.
    #[error("invalid entity attributes: {reason}")]
    InvalidEntity {
        /// What was wrong.
        reason: String,
    },

    /// A status string did not name a known status.
    #[error("unknown entity status: {0:?}")]
    UnknownStatus(String),

    /// Identifier or jurisdiction validation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}
