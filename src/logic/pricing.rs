use super::rules::{first_match, KeywordRule};
use crate::error::{CropGuardError, Result};
use crate::models::RegionBucket;
use serde::{Deserialize, Serialize};

/// Place-name keywords per region, in priority order.
const REGION_RULES: &[KeywordRule<RegionBucket>] = &[
    KeywordRule::new(
        &["punjab", "haryana", "delhi", "rajasthan", "uttar pradesh", "uttarakhand"],
        RegionBucket::North,
    )
    .with_tokens(&["up"]),
    KeywordRule::new(
        &["karnataka", "tamil nadu", "kerala", "andhra", "telangana"],
        RegionBucket::South,
    ),
    KeywordRule::new(
        &["west bengal", "odisha", "bihar", "jharkhand", "assam"],
        RegionBucket::East,
    ),
    KeywordRule::new(&["maharashtra", "gujarat", "goa"], RegionBucket::West),
];

/// Resolves free-text location to a pricing bucket.
///
/// Empty or blank input is `Default`; non-empty text that matches no keyword
/// is `Central`.
pub fn resolve_region(location: &str) -> RegionBucket {
    if location.trim().is_empty() {
        return RegionBucket::Default;
    }

    first_match(REGION_RULES, location)
        .map(|rule| rule.effect)
        .unwrap_or(RegionBucket::Central)
}

/// Price multiplier per region bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPricing {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub central: f64,
    pub default: f64,
}

impl Default for RegionPricing {
    fn default() -> Self {
        Self {
            north: 1.0,
            south: 1.1,
            east: 0.95,
            west: 1.05,
            central: 1.0,
            default: 1.0,
        }
    }
}

impl RegionPricing {
    pub fn multiplier(&self, region: RegionBucket) -> f64 {
        match region {
            RegionBucket::North => self.north,
            RegionBucket::South => self.south,
            RegionBucket::East => self.east,
            RegionBucket::West => self.west,
            RegionBucket::Central => self.central,
            RegionBucket::Default => self.default,
        }
    }

    /// Resolves the location and returns its bucket with the multiplier.
    pub fn for_location(&self, location: &str) -> (RegionBucket, f64) {
        let region = resolve_region(location);
        (region, self.multiplier(region))
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("north", self.north),
            ("south", self.south),
            ("east", self.east),
            ("west", self.west),
            ("central", self.central),
            ("default", self.default),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CropGuardError::InvalidData(format!(
                    "region multiplier '{}' must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
