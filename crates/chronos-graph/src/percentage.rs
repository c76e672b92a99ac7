//! Ownership share newtype.

use serde::{Deserialize, Serialize};

use crate::error::EdgeViolation;

/// A parent's share of a child, in percent. Always within (0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct OwnershipPercentage(f64);

impl OwnershipPercentage {
    /// Validate a share.
    pub fn new(value: f64) -> Result<Self, EdgeViolation> {
        // NaN fails both comparisons and lands in the error branch.
        if value > 0.0 && value <= 100.0 {
            Ok(Self(value))
        } else {
            Err(EdgeViolation::PercentageOutOfRange(value))
        }
    }

    /// The share as a number in (0, 100].
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for OwnershipPercentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<f64> for OwnershipPercentage {
    type Error = EdgeViolation;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnershipPercentage> for f64 {
    fn from(p: OwnershipPercentage) -> Self {
        p.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(OwnershipPercentage::new(100.0).is_ok());
        assert!(OwnershipPercentage::new(0.01).is_ok());
        assert!(OwnershipPercentage::new(0.0).is_err());
        assert!(OwnershipPercentage::new(-5.0).is_err());
        assert!(OwnershipPercentage::new(150.0).is_err());
        assert!(OwnershipPercentage::new(f64::NAN).is_err());
        assert!(OwnershipPercentage::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_serde_validates() {
        let p: OwnershipPercentage = serde_json::from_str("75.0").unwrap();
        assert_eq!(p.value(), 75.0);
        assert!(serde_json::from_str::<OwnershipPercentage>("150.0").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(OwnershipPercentage::new(100.0).unwrap().to_string(), "100%");
    }
}
