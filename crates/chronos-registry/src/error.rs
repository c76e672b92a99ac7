//! # Caller-Facing Errors
//!
//! Every crate below the registry has its own error enum. The registry
//! flattens them into the five kinds callers render: missing entity,
//! refused transition, refused edge, unusable attributes, bad config.

use thiserror::Error;

use chronos_core::{CoreError, EntityId};
use chronos_graph::{EdgeViolation, GraphError};
use chronos_risk::RiskError;
use chronos_state::{EntityStatus, StateError};

/// Registry operation failure. Shared state is never partially updated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No entity carries this id.
    #[error("entity not found: {entity_id}")]
    NotFound {
        /// The id that was requested.
        entity_id: EntityId,
    },

    /// The lifecycle table does not allow `from -> to`.
    #[error("illegal transition for {entity_id}: {from} -> {to}")]
    IllegalTransition {
        /// The entity whose transition was rejected.
        entity_id: EntityId,
        /// Current status.
        from: EntityStatus,
        /// Requested status.
        to: EntityStatus,
    },

    /// The edge was refused.
    #[error("invalid edge {parent} -> {child}: {reason}")]
    InvalidEdge {
        /// Owning entity.
        parent: EntityId,
        /// Owned entity.
        child: EntityId,
        /// What was wrong.
        reason: EdgeViolation,
    },

    /// Submitted attributes are unusable.
    #[error("invalid entity: {reason}")]
    InvalidEntity {
        /// What was wrong.
        reason: String,
    },

    /// Configuration did not parse or validate.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<StateError> for RegistryError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::NotFound { entity_id } => Self::NotFound { entity_id },
            StateError::IllegalTransition {
                entity_id,
                from,
                to,
            } => Self::IllegalTransition {
                entity_id,
                from,
                to,
            },
            StateError::InvalidEntity { reason } => Self::InvalidEntity { reason },
            other @ (StateError::UnknownStatus(_) | StateError::Core(_)) => Self::InvalidEntity {
                reason: other.to_string(),
            },
        }
    }
}

impl From<GraphError> for RegistryError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidEdge {
                parent,
                child,
                reason,
            } => Self::InvalidEdge {
                parent,
                child,
                reason,
            },
        }
    }
}

impl From<RiskError> for RegistryError {
    fn from(err: RiskError) -> Self {
        match err {
            RiskError::NotFound { entity_id } => Self::NotFound { entity_id },
            RiskError::Config(msg) => Self::Config(msg),
        }
    }
}

impl From<CoreError> for RegistryError {
    fn from(err: CoreError) -> Self {
        Self::InvalidEntity {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_errors_flatten() {
        let err: RegistryError = StateError::IllegalTransition {
            entity_id: EntityId::new("acme"),
            from: EntityStatus::Active,
            to: EntityStatus::Pending,
        }
        .into();
        assert_eq!(err.to_string(), "illegal transition for acme: ACTIVE -> PENDING");

        let err: RegistryError = StateError::Core(CoreError::EmptySlug {
            name: "!!".to_string(),
        })
        .into();
        assert!(matches!(err, RegistryError::InvalidEntity { .. }));
    }

    #[test]
    fn test_graph_error_keeps_reason() {
        let err: RegistryError = GraphError::InvalidEdge {
            parent: EntityId::new("a"),
            child: EntityId::new("b"),
            reason: EdgeViolation::PercentageOutOfRange(150.0),
        }
        .into();
        assert!(matches!(
            err,
            RegistryError::InvalidEdge {
                reason: EdgeViolation::PercentageOutOfRange(p),
                ..
            } if p == 150.0
        ));
    }

    #[test]
    fn test_risk_errors_flatten() {
        let err: RegistryError = RiskError::NotFound {
            entity_id: EntityId::new("x"),
        }
        .into();
        assert!(matches!(err, RegistryError::NotFound { .. }));
        let err: RegistryError = RiskError::Config("bad".to_string()).into();
        assert_eq!(err, RegistryError::Config("bad".to_string()));
    }
}
