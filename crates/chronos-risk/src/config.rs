//! # Risk Configuration
//!
//! Every tunable of the scoring policy. Defaults reproduce the reference
//! weights exactly; a YAML document only needs to name what it changes:
//!
//! ```yaml
//! shell_friendly_jurisdictions: [DE, WY, NV, SD]
//! recent_formation_days: 180
//! weights:
//!   llc: 0.25
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use chronos_core::JurisdictionCode;

use crate::error::RiskError;

/// Contribution of each factor to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    /// Legal form is LLC.
    pub llc: f64,
    /// Name matches a holding-company pattern.
    pub holding_name: f64,
    /// Status is DELINQUENT.
    pub delinquent: f64,
    /// Formation date missing or within the recent window.
    pub formation: f64,
    /// Jurisdiction is in the shell-friendly set.
    pub shell_jurisdiction: f64,
    /// LLC formed in the premium jurisdiction, on top of the above.
    pub premium_llc: f64,
    /// Has owners but no subsidiaries.
    pub owned_without_subsidiaries: f64,
    /// Per link of a single-child chain.
    pub chain_step: f64,
    /// Ceiling for the chain bonus.
    pub chain_cap: f64,
    /// Per officer shared with another entity.
    pub shared_officer: f64,
    /// Ceiling for the shared-officer bonus.
    pub shared_officer_cap: f64,
    /// Member of an ownership cycle.
    pub circular_ownership: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            llc: 0.30,
            holding_name: 0.15,
            delinquent: 0.20,
            formation: 0.10,
            shell_jurisdiction: 0.15,
            premium_llc: 0.25,
            owned_without_subsidiaries: 0.30,
            chain_step: 0.05,
            chain_cap: 0.20,
            shared_officer: 0.10,
            shared_officer_cap: 0.20,
            circular_ownership: 0.10,
        }
    }
}

impl FactorWeights {
    fn named(&self) -> [(&'static str, f64); 12] {
        [
            ("llc", self.llc),
            ("holding_name", self.holding_name),
            ("delinquent", self.delinquent),
            ("formation", self.formation),
            ("shell_jurisdiction", self.shell_jurisdiction),
            ("premium_llc", self.premium_llc),
            ("owned_without_subsidiaries", self.owned_without_subsidiaries),
            ("chain_step", self.chain_step),
            ("chain_cap", self.chain_cap),
            ("shared_officer", self.shared_officer),
            ("shared_officer_cap", self.shared_officer_cap),
            ("circular_ownership", self.circular_ownership),
        ]
    }
}

/// Scoring policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Factor weights.
    pub weights: FactorWeights,
    /// Jurisdictions favored for secrecy.
    pub shell_friendly_jurisdictions: BTreeSet<JurisdictionCode>,
    /// Jurisdictions whose LLCs earn the additional premium factor.
    pub premium_llc_jurisdictions: BTreeSet<JurisdictionCode>,
    /// Case-insensitive name substrings that mark a holding company.
    pub holding_name_patterns: Vec<String>,
    /// A formation this many days ago or fewer counts as recent.
    pub recent_formation_days: i64,
    /// Shortest single-child chain that earns the chain bonus.
    pub min_chain_length: usize,
    /// Score at or above which an entity is reported as a shell candidate.
    pub candidate_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            shell_friendly_jurisdictions: codes(&["DE", "WY", "NV"]),
            premium_llc_jurisdictions: codes(&["DE"]),
            holding_name_patterns: vec![
                "holdings".to_string(),
                "group".to_string(),
                "capital".to_string(),
            ],
            recent_formation_days: 365,
            min_chain_length: 2,
            candidate_threshold: 0.20,
        }
    }
}

fn codes(raw: &[&str]) -> BTreeSet<JurisdictionCode> {
    raw.iter()
        .filter_map(|c| JurisdictionCode::new(c).ok())
        .collect()
}

impl RiskConfig {
    /// Parse a YAML document; unspecified fields keep their defaults.
    ///
    /// # Errors
    ///
    /// `Config` if the document does not parse or fails [`validate`](Self::validate).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RiskError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| RiskError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), RiskError> {
        for (name, weight) in self.weights.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RiskError::Config(format!(
                    "weight {name} must be a finite non-negative number, got {weight}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.candidate_threshold) {
            return Err(RiskError::Config(format!(
                "candidate_threshold must be within [0, 1], got {}",
                self.candidate_threshold
            )));
        }
        if self.recent_formation_days < 0 {
            return Err(RiskError::Config(format!(
                "recent_formation_days must not be negative, got {}",
                self.recent_formation_days
            )));
        }
        if self.min_chain_length == 0 {
            return Err(RiskError::Config(
                "min_chain_length must be at least 1".to_string(),
            ));
        }
        if self.holding_name_patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(RiskError::Config(
                "holding_name_patterns must not contain blank patterns".to_string(),
            ));
        }
        Ok(())
    }
}
