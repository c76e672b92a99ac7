//! # Risk Factors
//!
//! One variant per scoring rule. A [`FactorHit`] pairs the factor with
//! its category, the weight it actually contributed, and the sentence
//! shown to analysts.

use serde::{Deserialize, Serialize};

use chronos_core::JurisdictionCode;

/// Which part of the evidence a factor draws on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    /// Legal form, name, status, formation date.
    EntityStructure,
    /// Place of formation.
    Jurisdiction,
    /// Shape of the ownership graph around the entity.
    OwnershipPattern,
}

impl std::fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::EntityStructure => "ENTITY_STRUCTURE",
            Self::Jurisdiction => "JURISDICTION",
            Self::OwnershipPattern => "OWNERSHIP_PATTERN",
        };
        f.write_str(s)
    }
}

/// A triggered scoring rule, with the evidence that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskFactor {
    /// Legal form is LLC.
    LlcStructure,
    /// Name contains a holding-company pattern.
    HoldingCompanyName {
        /// The pattern that matched.
        pattern: String,
    },
    /// Status is DELINQUENT.
    DelinquentStatus,
    /// No formation date on record.
    MissingFormationDate,
    /// Formed within the recent window.
    RecentFormation {
        /// Days since formation.
        age_days: i64,
    },
    /// Formed in a jurisdiction favored for secrecy.
    ShellFriendlyJurisdiction {
        /// The jurisdiction.
        jurisdiction: JurisdictionCode,
    },
    /// LLC formed in a premium jurisdiction.
    PremiumJurisdictionLlc {
        /// The jurisdiction.
        jurisdiction: JurisdictionCode,
    },
    /// Has owners but owns nothing.
    OwnedWithoutSubsidiaries {
        /// Number of direct owners.
        owners: usize,
    },
    /// Sits at the end of a single-child ownership chain.
    PassThroughChain {
        /// Chain length in links.
        length: usize,
    },
    /// Shares officers with other entities.
    SharedOfficers {
        /// The shared officer names, as recorded on this entity.
        officers: Vec<String>,
    },
    /// Member of an ownership cycle.
    CircularOwnership,
}

impl RiskFactor {
    /// The category the factor belongs to.
    pub fn category(&self) -> FactorCategory {
        match self {
            Self::LlcStructure
            | Self::HoldingCompanyName { .. }
            | Self::DelinquentStatus
            | Self::MissingFormationDate
            | Self::RecentFormation { .. } => FactorCategory::EntityStructure,
            Self::ShellFriendlyJurisdiction { .. } | Self::PremiumJurisdictionLlc { .. } => {
                FactorCategory::Jurisdiction
            }
            Self::OwnedWithoutSubsidiaries { .. }
            | Self::PassThroughChain { .. }
            | Self::SharedOfficers { .. }
            | Self::CircularOwnership => FactorCategory::OwnershipPattern,
        }
    }

    /// Analyst-facing description.
    pub fn description(&self) -> String {
        match self {
            Self::LlcStructure => "LLC structure with limited visibility".to_string(),
            Self::HoldingCompanyName { pattern } => {
                format!("Shell pattern: Holding company naming pattern ('{pattern}')")
            }
            Self::DelinquentStatus => "Delinquent filing status".to_string(),
            Self::MissingFormationDate => "Missing formation date".to_string(),
            Self::RecentFormation { age_days } => {
                format!("Recently formed ({age_days} days ago)")
            }
            Self::ShellFriendlyJurisdiction { jurisdiction } => {
                format!("Registered in {jurisdiction}, a jurisdiction favored for secrecy")
            }
            Self::PremiumJurisdictionLlc { jurisdiction } => {
                if jurisdiction.as_str() == "DE" {
                    "Shell pattern: Delaware LLC with limited transparency".to_string()
                } else {
                    format!("Shell pattern: {jurisdiction} LLC with limited transparency")
                }
            }
            Self::OwnedWithoutSubsidiaries { .. } => {
                "Shell pattern: Owned but has no subsidiaries".to_string()
            }
            Self::PassThroughChain { length } => {
                format!("Pass-through ownership chain of {length} links")
            }
            Self::SharedOfficers { officers } => {
                format!("Shares officers with other entities: {}", officers.join(", "))
            }
            Self::CircularOwnership => "Circular ownership structure".to_string(),
        }
    }
}

/// A factor together with the weight it added to the score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorHit {
    /// The triggered rule.
    pub factor: RiskFactor,
    /// Grouping used when presenting the report.
    pub category: FactorCategory,
    /// Weight added, before clamping of the total.
    pub contribution: f64,
    /// Analyst-facing description.
    pub description: String,
}

impl FactorHit {
    pub(crate) fn new(factor: RiskFactor, contribution: f64) -> Self {
        let description = factor.description();
        Self {
            category: factor.category(),
            factor,
            contribution,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn de() -> JurisdictionCode {
        JurisdictionCode::new("DE").unwrap()
    }

    #[test]
    fn test_categories() {
        assert_eq!(RiskFactor::LlcStructure.category(), FactorCategory::EntityStructure);
        assert_eq!(
            RiskFactor::ShellFriendlyJurisdiction { jurisdiction: de() }.category(),
            FactorCategory::Jurisdiction
        );
        assert_eq!(
            RiskFactor::CircularOwnership.category(),
            FactorCategory::OwnershipPattern
        );
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            RiskFactor::ShellFriendlyJurisdiction { jurisdiction: de() }.description(),
            "Registered in DE, a jurisdiction favored for secrecy"
        );
        assert_eq!(
            RiskFactor::PremiumJurisdictionLlc { jurisdiction: de() }.description(),
            "Shell pattern: Delaware LLC with limited transparency"
        );
        assert_eq!(
            RiskFactor::OwnedWithoutSubsidiaries { owners: 1 }.description(),
            "Shell pattern: Owned but has no subsidiaries"
        );
    }

    #[test]
    fn test_serde_tagging() {
        let json = serde_json::to_value(RiskFactor::PassThroughChain { length: 3 }).unwrap();
        assert_eq!(json["kind"], "pass_through_chain");
        assert_eq!(json["length"], 3);
        let hit = FactorHit::new(RiskFactor::DelinquentStatus, 0.2);
        assert_eq!(hit.description, "Delinquent filing status");
        assert_eq!(hit.category, FactorCategory::EntityStructure);
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["category"], "entity_structure");
        assert_eq!(json["factor"]["kind"], "delinquent_status");
    }

    #[test]
    fn test_category_display() {
        assert_eq!(FactorCategory::OwnershipPattern.to_string(), "OWNERSHIP_PATTERN");
    }
}
