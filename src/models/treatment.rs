use super::{EffectivenessRank, RegionBucket, SeverityTier};
use crate::error::{CropGuardError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRequest {
    pub crop_type: String,
    pub disease_name: String,
    pub severity: SeverityTier,
    pub farm_size_hectares: f64,
    pub location: Option<String>,
    pub weather: Option<String>,
}

impl TreatmentRequest {
    pub fn new(
        crop_type: impl Into<String>,
        disease_name: impl Into<String>,
        severity: SeverityTier,
        farm_size_hectares: f64,
    ) -> Self {
        Self {
            crop_type: crop_type.into(),
            disease_name: disease_name.into(),
            severity,
            farm_size_hectares,
            location: None,
            weather: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    /// Rejects requests the engine cannot compute a plan for.
    ///
    /// Farm size is never clamped or defaulted.
    pub fn validate(&self) -> Result<()> {
        if self.crop_type.trim().is_empty() {
            return Err(CropGuardError::Validation("crop type is required".into()));
        }
        if self.disease_name.trim().is_empty() {
            return Err(CropGuardError::Validation("disease name is required".into()));
        }
        validate_farm_size(self.farm_size_hectares)
    }

    pub fn location_text(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }

    pub fn weather_text(&self) -> &str {
        self.weather.as_deref().unwrap_or("")
    }
}

pub fn validate_farm_size(farm_size_hectares: f64) -> Result<()> {
    if !farm_size_hectares.is_finite() || farm_size_hectares <= 0.0 {
        return Err(CropGuardError::Validation(format!(
            "farm size must be a positive number of hectares, got {}",
            farm_size_hectares
        )));
    }
    Ok(())
}

/// Why a plan was built from default data instead of the curated catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// No profile for the (crop, disease) pair; the engine-wide default profile was used
    UnknownProfile,
    /// The representative substance is missing from the catalog
    UnknownSubstance(String),
    /// Treatment was needed but the selection produced no primary substance
    NoPrimarySubstance,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackReason::UnknownProfile => write!(f, "unknown crop/disease profile"),
            FallbackReason::UnknownSubstance(name) => write!(f, "unknown substance '{}'", name),
            FallbackReason::NoPrimarySubstance => write!(f, "no primary substance selected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceRate {
    pub name: String,
    pub dosage_per_hectare: f64,
    pub effectiveness: EffectivenessRank,
}

/// Quantities for the representative substance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DosagePlan {
    pub substance: Option<String>,
    pub dosage_per_hectare: f64,
    pub total_amount: f64,
    pub total_water: f64,
    pub unit_price: f64,
    pub region: Option<RegionBucket>,
    pub applications: u32,
    pub cost_per_application: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub substance: f64,
    pub labor: f64,
    pub fuel: f64,
    pub equipment: f64,
    pub total: f64,
}

/// Savings against the traditional overuse baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub baseline_multiplier: f64,
    pub potential_savings: f64,
    pub reduction_percentage: f64,
    pub substance_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentPlan {
    pub crop_type: String,
    pub disease_name: String,
    pub severity: SeverityTier,
    pub farm_size_hectares: f64,
    /// Advisory classifier confidence, never used in arithmetic
    pub confidence: Option<f64>,
    pub primary_substances: Vec<String>,
    pub alternative_substances: Vec<String>,
    pub application_method: String,
    pub application_frequency: String,
    pub combination_treatment: bool,
    pub substance_rates: Vec<SubstanceRate>,
    pub dosage: DosagePlan,
    pub costs: CostBreakdown,
    pub savings: SavingsEstimate,
    pub safety_interval_days: Option<u32>,
    pub application_instructions: Option<String>,
    pub timing: Vec<String>,
    pub follow_up: Vec<String>,
    pub prevention_tips: Vec<String>,
    pub weather_note: Option<String>,
    pub fallbacks: Vec<FallbackReason>,
}

impl TreatmentPlan {
    pub fn is_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }

    pub fn requires_treatment(&self) -> bool {
        self.dosage.applications > 0
    }
}

/// One row of a side-by-side substance cost comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceComparison {
    pub substance: String,
    pub amount_needed: f64,
    pub cost: f64,
    pub cost_per_hectare: f64,
    pub effectiveness: EffectivenessRank,
}

/// Season-long budget estimate for a crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalEstimate {
    pub crop_type: String,
    pub farm_size_hectares: f64,
    pub region: RegionBucket,
    pub treatments_per_season: u32,
    pub substance_cost: f64,
    pub labor_cost: f64,
    pub fuel_cost: f64,
    pub equipment_cost: f64,
    pub total_cost: f64,
    pub cost_per_hectare: f64,
    pub monthly_average: f64,
}
