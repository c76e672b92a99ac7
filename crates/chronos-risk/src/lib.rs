//! # chronos-risk — Shell-Company Risk Scoring
//!
//! Combines entity attributes from the Entity Store with the live shape of
//! the ownership graph into a score in `[0, 1]` per entity, plus the list
//! of factors that produced it.
//!
//! ## Factors
//!
//! | Category | Trigger | Default weight |
//! |---|---|---|
//! | Structure | legal form is LLC | 0.30 |
//! | Structure | name contains a holding-company pattern | 0.15 |
//! | Structure | status is DELINQUENT | 0.20 |
//! | Structure | formation date missing or recent | 0.10 |
//! | Jurisdiction | shell-friendly jurisdiction | 0.15 |
//! | Jurisdiction | LLC in the premium jurisdiction (DE) | 0.25 |
//! | Ownership | owned, but owns nothing | 0.30 |
//! | Ownership | single-child chain of length ≥ 2 | 0.05 per link, ≤ 0.20 |
//! | Ownership | officers shared with other entities | 0.10 each, ≤ 0.20 |
//! | Ownership | member of an ownership cycle | 0.10 |
//!
//! Factors are evaluated independently; every hit contributes and the sum
//! is clamped to `[0, 1]`. Overlapping signals (LLC, DE, DE-LLC) are
//! counted separately.
//!
//! Scores are recomputed from the current store and graph on every call.
//! Nothing is cached.

pub mod config;
pub mod engine;
pub mod error;
pub mod factor;
pub mod report;

pub use config::{FactorWeights, RiskConfig};
pub use engine::RiskEngine;
pub use error::RiskError;
pub use factor::{FactorCategory, FactorHit, RiskFactor};
pub use report::{DataGap, RiskLevel, RiskReport, RiskReportEntry};
