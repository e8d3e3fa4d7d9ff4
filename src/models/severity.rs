use serde::{Deserialize, Serialize};

/// Disease intensity reported by the classifier.
///
/// Ordered from least to most severe so that comparisons (`>=`) follow the
/// agronomic scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Healthy,
    Mild,
    Moderate,
    Severe,
}

impl SeverityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Healthy => "Healthy",
            SeverityTier::Mild => "Mild",
            SeverityTier::Moderate => "Moderate",
            SeverityTier::Severe => "Severe",
        }
    }

    /// Parses the canonical names plus the legacy low/medium/high scale.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "healthy" | "none" => Some(SeverityTier::Healthy),
            "mild" | "low" => Some(SeverityTier::Mild),
            "moderate" | "medium" => Some(SeverityTier::Moderate),
            "severe" | "high" => Some(SeverityTier::Severe),
            _ => None,
        }
    }

    pub fn all() -> &'static [SeverityTier] {
        &[
            SeverityTier::Healthy,
            SeverityTier::Mild,
            SeverityTier::Moderate,
            SeverityTier::Severe,
        ]
    }

    pub fn needs_treatment(&self) -> bool {
        *self != SeverityTier::Healthy
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_from_str_canonical() {
        assert_eq!(SeverityTier::from_str("Healthy"), Some(SeverityTier::Healthy));
        assert_eq!(SeverityTier::from_str("mild"), Some(SeverityTier::Mild));
        assert_eq!(SeverityTier::from_str("MODERATE"), Some(SeverityTier::Moderate));
        assert_eq!(SeverityTier::from_str(" severe "), Some(SeverityTier::Severe));
    }

    #[test]
    fn severity_from_str_legacy_scale() {
        assert_eq!(SeverityTier::from_str("low"), Some(SeverityTier::Mild));
        assert_eq!(SeverityTier::from_str("medium"), Some(SeverityTier::Moderate));
        assert_eq!(SeverityTier::from_str("High"), Some(SeverityTier::Severe));
    }

    #[test]
    fn severity_from_str_invalid() {
        assert_eq!(SeverityTier::from_str("unknown"), None);
        assert_eq!(SeverityTier::from_str(""), None);
        assert_eq!(SeverityTier::from_str("critical"), None);
    }

    #[test]
    fn severity_round_trip() {
        for tier in SeverityTier::all() {
            let debug_str = format!("{:?}", tier);
            assert_eq!(
                SeverityTier::from_str(&debug_str),
                Some(*tier),
                "Round-trip failed for {:?}",
                tier
            );
        }
    }

    #[test]
    fn severity_ordering() {
        assert!(SeverityTier::Healthy < SeverityTier::Mild);
        assert!(SeverityTier::Mild < SeverityTier::Moderate);
        assert!(SeverityTier::Moderate < SeverityTier::Severe);
        assert!(!SeverityTier::Healthy.needs_treatment());
        assert!(SeverityTier::Mild.needs_treatment());
    }
}
