//! Severity and weather adjustment factors.
//!
//! Both factors are pure functions of their input and compose multiplicatively
//! into the adjusted dosage per hectare.

use super::rules::{first_match, KeywordRule};
use crate::error::{CropGuardError, Result};
use crate::models::SeverityTier;
use serde::{Deserialize, Serialize};

/// Dosage multiplier and application count for one severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierPolicy {
    pub multiplier: f64,
    pub applications: u32,
}

impl TierPolicy {
    pub const fn new(multiplier: f64, applications: u32) -> Self {
        Self {
            multiplier,
            applications,
        }
    }
}

/// Severity tier to dosage/application mapping.
///
/// Healthy is fixed at multiplier 0 and zero applications; the treated tiers
/// are configurable but must stay monotonic in severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityScale {
    pub mild: TierPolicy,
    pub moderate: TierPolicy,
    pub severe: TierPolicy,
}

impl Default for SeverityScale {
    fn default() -> Self {
        Self {
            mild: TierPolicy::new(0.8, 2),
            moderate: TierPolicy::new(1.0, 3),
            severe: TierPolicy::new(1.3, 4),
        }
    }
}

impl SeverityScale {
    pub fn policy(&self, tier: SeverityTier) -> TierPolicy {
        match tier {
            SeverityTier::Healthy => TierPolicy::new(0.0, 0),
            SeverityTier::Mild => self.mild,
            SeverityTier::Moderate => self.moderate,
            SeverityTier::Severe => self.severe,
        }
    }

    pub fn multiplier(&self, tier: SeverityTier) -> f64 {
        self.policy(tier).multiplier
    }

    pub fn application_count(&self, tier: SeverityTier) -> u32 {
        self.policy(tier).applications
    }

    pub fn validate(&self) -> Result<()> {
        let mut previous = TierPolicy::new(0.0, 0);
        for tier in SeverityTier::all() {
            let policy = self.policy(*tier);
            if !policy.multiplier.is_finite() || policy.multiplier < 0.0 {
                return Err(CropGuardError::InvalidData(format!(
                    "severity multiplier for {} must be a non-negative number",
                    tier
                )));
            }
            if tier.needs_treatment() && policy.applications == 0 {
                return Err(CropGuardError::InvalidData(format!(
                    "{} severity needs at least one application",
                    tier
                )));
            }
            if policy.multiplier < previous.multiplier || policy.applications < previous.applications
            {
                return Err(CropGuardError::InvalidData(format!(
                    "severity scale must not decrease from one tier to the next (at {})",
                    tier
                )));
            }
            previous = policy;
        }
        Ok(())
    }
}

/// Weather regime recognised from free-text descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Wet,
    HotDry,
    Windy,
    Calm,
}

impl WeatherCondition {
    pub fn dosage_multiplier(&self) -> f64 {
        match self {
            // compensates wash-off
            WeatherCondition::Wet => 1.1,
            WeatherCondition::HotDry => 0.95,
            WeatherCondition::Windy => 1.05,
            WeatherCondition::Calm => 1.0,
        }
    }

    pub fn note(&self) -> Option<&'static str> {
        match self {
            WeatherCondition::Wet => Some(
                "Avoid application during active rain. Prefer systemic fungicides for better \
                 rain-fastness; dosage raised slightly to offset wash-off.",
            ),
            WeatherCondition::HotDry => Some(
                "Apply during cooler parts of the day (early morning/evening). Dosage reduced \
                 slightly for better absorption and lower evaporation loss.",
            ),
            WeatherCondition::Windy => Some(
                "Avoid application during windy conditions to prevent drift. Use drift-reducing \
                 nozzles.",
            ),
            WeatherCondition::Calm => None,
        }
    }
}

const WEATHER_RULES: &[KeywordRule<WeatherCondition>] = &[
    KeywordRule::new(&["rain", "wet", "humid"], WeatherCondition::Wet),
    KeywordRule::new(&["hot", "dry", "sunny"], WeatherCondition::HotDry),
    KeywordRule::new(&["wind"], WeatherCondition::Windy),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAdvisory {
    pub condition: WeatherCondition,
    pub dosage_multiplier: f64,
    pub note: Option<String>,
}

/// Classifies a weather description; first matching rule wins.
pub fn weather_advisory(weather: &str) -> WeatherAdvisory {
    let condition = first_match(WEATHER_RULES, weather)
        .map(|rule| rule.effect)
        .unwrap_or(WeatherCondition::Calm);

    WeatherAdvisory {
        condition,
        dosage_multiplier: condition.dosage_multiplier(),
        note: condition.note().map(str::to_string),
    }
}
