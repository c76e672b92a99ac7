//! # chronos-state — Entities and Their Lifecycle
//!
//! Holds the entity records Chronos tracks and the state machine that
//! governs their legal/compliance status.
//!
//! ## Components
//!
//! - **Lifecycle** (`lifecycle.rs`): the closed `EntityStatus` enumeration
//!   and its explicit transition table.
//!
//! ```text
//! PENDING ──▶ ACTIVE ──▶ IN_COMPLIANCE ◀──▶ DELINQUENT
//!               │              │                 │
//!               └──────────────┴────────┬────────┘
//!                                       ▼
//!                                  DISSOLVED (terminal)
//! ```
//!
//! - **Entity** (`entity.rs`): the entity record, its submission type and
//!   the legal-form taxonomy.
//!
//! - **Store** (`store.rs`): id-keyed registry with idempotent upsert,
//!   filtered listing, deletion with id retirement, and status
//!   transitions routed through the lifecycle table.
//!
//! The store is a plain single-owner value. Sharing it between threads is
//! the job of `chronos-registry`, which puts it behind one lock together
//! with the ownership graph.

pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod store;

pub use entity::{Entity, EntityAttributes, LegalForm};
pub use error::StateError;
pub use lifecycle::{EntityStatus, StatusTransitionRecord, TRANSITIONS};
pub use store::{EntityFilter, EntityStore};
