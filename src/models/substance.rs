use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Qualitative effectiveness rating of a substance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EffectivenessRank {
    Low,
    MediumLow,
    #[default]
    Medium,
    MediumHigh,
    High,
}

impl EffectivenessRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectivenessRank::Low => "Low",
            EffectivenessRank::MediumLow => "Medium-Low",
            EffectivenessRank::Medium => "Medium",
            EffectivenessRank::MediumHigh => "Medium-High",
            EffectivenessRank::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "low" => Some(EffectivenessRank::Low),
            "mediumlow" | "lowmedium" => Some(EffectivenessRank::MediumLow),
            "medium" => Some(EffectivenessRank::Medium),
            "mediumhigh" | "highmedium" => Some(EffectivenessRank::MediumHigh),
            "high" => Some(EffectivenessRank::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for EffectivenessRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference data for one pesticide/fungicide formulation.
///
/// Quantities are in the catalog's mass unit (kg); prices are per unit in the
/// host's currency. `target_diseases` and `target_crops` are derived from the
/// disease profiles when the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceRecord {
    pub name: String,
    pub base_price_per_unit: f64,
    pub base_dosage_per_hectare: f64,
    /// Litres of water per unit of substance
    pub water_ratio_per_unit: f64,
    #[serde(default)]
    pub target_diseases: BTreeSet<String>,
    #[serde(default)]
    pub target_crops: BTreeSet<String>,
    pub safety_interval_days: u32,
    #[serde(default)]
    pub effectiveness: EffectivenessRank,
}

impl SubstanceRecord {
    pub fn new(
        name: impl Into<String>,
        base_price_per_unit: f64,
        base_dosage_per_hectare: f64,
        water_ratio_per_unit: f64,
        safety_interval_days: u32,
        effectiveness: EffectivenessRank,
    ) -> Self {
        Self {
            name: name.into(),
            base_price_per_unit,
            base_dosage_per_hectare,
            water_ratio_per_unit,
            target_diseases: BTreeSet::new(),
            target_crops: BTreeSet::new(),
            safety_interval_days,
            effectiveness,
        }
    }
}
