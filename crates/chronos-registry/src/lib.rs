//! # chronos-registry — The Chronos Core Behind One Lock
//!
//! Hosts (API servers, batch jobs) drive Chronos through a [`Registry`]:
//! a cloneable handle over the Entity Store and the ownership graph that
//! serializes every mutation and gives every scoring pass a consistent
//! snapshot.
//!
//! ```text
//!   callers ──▶ Registry ──▶ RwLock ┬─▶ EntityStore   (chronos-state)
//!                   │               └─▶ OwnershipGraph (chronos-graph)
//!                   └──▶ RiskEngine (chronos-risk), reads under the lock
//! ```
//!
//! Errors from the lower crates are flattened into [`RegistryError`].
//! The registry performs no I/O; persistence is layered on by replaying
//! the same calls against durable storage.

pub mod config;
pub mod error;
pub mod registry;
pub mod view;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use registry::Registry;
pub use view::{GraphNode, GraphView, NodeDetails};

pub use chronos_core::{EntityId, JurisdictionCode};
pub use chronos_graph::{EdgeViolation, OwnershipEdge, OwnershipPercentage};
pub use chronos_risk::{
    FactorCategory, FactorHit, RiskConfig, RiskFactor, RiskLevel, RiskReport, RiskReportEntry,
};
pub use chronos_state::{Entity, EntityAttributes, EntityFilter, EntityStatus, LegalForm};
