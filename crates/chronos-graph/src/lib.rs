//! # chronos-graph — Ownership Graph
//!
//! A purpose-built adjacency map of parent → child ownership edges. Each
//! edge carries the parent's percentage share of the child. At most one
//! edge exists per ordered `(parent, child)` pair; re-upserting replaces
//! the percentage.
//!
//! ## Queries
//!
//! | Query | Cost |
//! |---|---|
//! | `direct_parents` / `direct_children` | O(degree) |
//! | `ancestors` / `descendants` | O(V + E), visited-set BFS |
//! | `chain_length` | O(V) |
//! | `cyclic_nodes` | O(V + E), Tarjan SCC |
//! | `detect_cycles` | O((V + E)(C + 1)), Johnson, C = number of cycles |
//!
//! Every traversal keeps a visited set, so none of them can loop on a
//! cyclic ownership structure.
//!
//! ## Node existence
//!
//! The graph does not own entities. Ids are weak references: an edge may
//! name an id that has no entity (yet, or any more). Callers that want
//! dangling endpoints rejected use [`OwnershipGraph::upsert_edge_strict`].

mod cycles;
pub mod error;
pub mod graph;
pub mod percentage;

pub use error::{EdgeViolation, GraphError};
pub use graph::{OwnershipEdge, OwnershipGraph};
pub use percentage::OwnershipPercentage;
