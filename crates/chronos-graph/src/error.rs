//! Errors raised by ownership edge mutation.

use thiserror::Error;

use chronos_core::EntityId;

/// Why an edge was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdgeViolation {
    /// Parent and child are the same entity.
    #[error("an entity cannot own itself")]
    SelfLoop,

    /// Percentage outside (0, 100] or not a number.
    #[error("percentage {0} is outside (0, 100]")]
    PercentageOutOfRange(f64),

    /// Strict mode: the endpoint names no known entity.
    #[error("endpoint {0} is not a known entity")]
    UnknownEndpoint(EntityId),
}

/// Ownership graph failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The edge was refused; the graph is unchanged.
    #[error("invalid edge {parent} -> {child}: {reason}")]
    InvalidEdge {
        /// Owning entity.
        parent: EntityId,
        /// Owned entity.
        child: EntityId,
        /// What was wrong.
        reason: EdgeViolation,
    },
}
