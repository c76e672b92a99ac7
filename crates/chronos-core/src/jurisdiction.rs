//! # Jurisdiction Codes
//!
//! State or country of formation, as a USPS/ISO-style code (`DE`, `WY`,
//! `GB`, `US-DE`). Codes are normalized to uppercase on construction so
//! set membership checks in risk scoring are exact comparisons.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A normalized jurisdiction code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JurisdictionCode(String);

impl JurisdictionCode {
    /// Shortest accepted code length.
    pub const MIN_LEN: usize = 2;
    /// Longest accepted code length.
    pub const MAX_LEN: usize = 6;

    /// Validate and normalize a jurisdiction code.
    ///
    /// # Errors
    ///
    /// Rejects codes outside 2–6 characters after trimming, or containing
    /// anything other than ASCII letters, digits and `-`.
    pub fn new(code: &str) -> Result<Self, CoreError> {
        let normalized = code.trim().to_ascii_uppercase();
        if normalized.len() < Self::MIN_LEN || normalized.len() > Self::MAX_LEN {
            return Err(CoreError::InvalidJurisdiction {
                code: code.to_string(),
                reason: "length must be between 2 and 6 characters",
            });
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(CoreError::InvalidJurisdiction {
                code: code.to_string(),
                reason: "only letters, digits and '-' are allowed",
            });
        }
        Ok(Self(normalized))
    }

    /// Access the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JurisdictionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for JurisdictionCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for JurisdictionCode {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<JurisdictionCode> for String {
    fn from(code: JurisdictionCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(JurisdictionCode::new(" de ").unwrap().as_str(), "DE");
        assert_eq!(JurisdictionCode::new("us-de").unwrap().as_str(), "US-DE");
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(JurisdictionCode::new("D").is_err());
        assert!(JurisdictionCode::new("").is_err());
        assert!(JurisdictionCode::new("DELAWARE").is_err());
    }

    #[test]
    fn test_rejects_bad_characters() {
        let err = JurisdictionCode::new("D E").unwrap_err();
        assert!(matches!(err, CoreError::InvalidJurisdiction { .. }));
    }

    #[test]
    fn test_serde_validates() {
        let code: JurisdictionCode = serde_json::from_str("\"wy\"").unwrap();
        assert_eq!(code.as_str(), "WY");
        assert!(serde_json::from_str::<JurisdictionCode>("\"!!\"").is_err());
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"WY\"");
    }
}
