use super::SeverityTier;
use serde::{Deserialize, Serialize};

/// Curated treatment guidance for one (crop, disease) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseProfile {
    pub crop_type: String,
    pub disease_name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub primary_substances: Vec<String>,
    #[serde(default)]
    pub alternative_substances: Vec<String>,
    pub application_method: String,
    pub application_frequency: String,
    #[serde(default)]
    pub prevention_tips: Vec<String>,
}

impl DiseaseProfile {
    pub fn new(crop_type: impl Into<String>, disease_name: impl Into<String>) -> Self {
        Self {
            crop_type: crop_type.into(),
            disease_name: disease_name.into(),
            symptoms: Vec::new(),
            primary_substances: Vec::new(),
            alternative_substances: Vec::new(),
            application_method: "Foliar spray".to_string(),
            application_frequency: "Every 10-14 days".to_string(),
            prevention_tips: Vec::new(),
        }
    }

    pub fn with_symptoms(mut self, symptoms: &[&str]) -> Self {
        self.symptoms = symptoms.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_primary(mut self, substances: &[&str]) -> Self {
        self.primary_substances = substances.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_alternatives(mut self, substances: &[&str]) -> Self {
        self.alternative_substances = substances.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.application_method = method.into();
        self
    }

    pub fn with_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.application_frequency = frequency.into();
        self
    }

    pub fn with_prevention(mut self, tips: &[&str]) -> Self {
        self.prevention_tips = tips.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Profiles without any substance (healthy plants) only carry hygiene advice.
    pub fn is_prevention_only(&self) -> bool {
        self.primary_substances.is_empty() && self.alternative_substances.is_empty()
    }

    /// Every substance name referenced by this profile, primary first.
    pub fn referenced_substances(&self) -> impl Iterator<Item = &String> {
        self.primary_substances
            .iter()
            .chain(self.alternative_substances.iter())
    }
}

/// Output of the external disease classifier.
///
/// `confidence` is advisory: it is carried onto the plan but never feeds the
/// dosage or cost arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseClassification {
    pub disease_name: String,
    pub severity: SeverityTier,
    pub confidence: f64,
}
