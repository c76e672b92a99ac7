//! # Error Types
//!
//! Errors raised while constructing core primitives. Higher crates wrap
//! these into their own error enums.

use thiserror::Error;

/// Validation failure for a core primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The entity name produced no usable identifier.
    #[error("entity name {name:?} does not yield a usable identifier")]
    EmptySlug {
        /// The submitted name.
        name: String,
    },

    /// A jurisdiction code failed validation.
    #[error("invalid jurisdiction code {code:?}: {reason}")]
    InvalidJurisdiction {
        /// The submitted code.
        code: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
