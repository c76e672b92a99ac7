//! # chronos-core — Foundational Types for Chronos
//!
//! Leaf crate of the Chronos workspace. Every other crate depends on
//! `chronos-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `EntityId` and
//!    `JurisdictionCode` have validated constructors. No bare strings for
//!    identifiers cross crate boundaries.
//!
//! 2. **Identifiers derive from names.** An `EntityId` is the slug of the
//!    entity's legal name, produced by an injectable [`Slugger`]. Collision
//!    disambiguation is the Entity Store's job, not the slugger's.
//!
//! 3. **Injectable time.** Nothing reads the wall clock directly; recency
//!    checks and transition logs go through a [`Clock`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `chronos-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod jurisdiction;
pub mod temporal;

pub use error::CoreError;
pub use identity::{DashSlugger, EntityId, EntityResolver, Slugger};
pub use jurisdiction::JurisdictionCode;
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
