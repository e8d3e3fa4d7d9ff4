mod builtin;

use crate::error::{CropGuardError, Result};
use crate::models::{DiseaseProfile, EffectivenessRank, SubstanceRecord};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Lookup key for crop, disease and substance names.
///
/// Case and punctuation are ignored so that "Early_blight", "early blight"
/// and "EARLY-BLIGHT" address the same profile.
pub fn normalize_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read-only reference data: substances and disease profiles.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Debug, Clone)]
pub struct PesticideCatalog {
    substances: BTreeMap<String, SubstanceRecord>,
    profiles: BTreeMap<(String, String), DiseaseProfile>,
    default_profile: DiseaseProfile,
}

/// On-disk layout of a catalog YAML file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    substances: Vec<SubstanceRecord>,
    profiles: Vec<DiseaseProfile>,
    default_profile: Option<DiseaseProfile>,
}

impl PesticideCatalog {
    /// Builds a catalog, checking that every substance a profile references
    /// exists. Target crop/disease sets are derived from the profiles.
    pub fn new(
        substances: Vec<SubstanceRecord>,
        profiles: Vec<DiseaseProfile>,
        default_profile: DiseaseProfile,
    ) -> Result<Self> {
        let mut by_name = BTreeMap::new();
        for mut record in substances {
            if !record.base_price_per_unit.is_finite()
                || record.base_price_per_unit < 0.0
                || !record.base_dosage_per_hectare.is_finite()
                || record.base_dosage_per_hectare <= 0.0
                || !record.water_ratio_per_unit.is_finite()
                || record.water_ratio_per_unit < 0.0
            {
                return Err(CropGuardError::InvalidData(format!(
                    "substance '{}' has invalid price, dosage or water ratio",
                    record.name
                )));
            }
            record.target_crops.clear();
            record.target_diseases.clear();
            let key = normalize_key(&record.name);
            if by_name.insert(key, record.clone()).is_some() {
                return Err(CropGuardError::InvalidData(format!(
                    "duplicate substance '{}'",
                    record.name
                )));
            }
        }

        let mut by_pair = BTreeMap::new();
        for profile in profiles {
            for name in profile.referenced_substances() {
                let record = by_name.get_mut(&normalize_key(name)).ok_or_else(|| {
                    CropGuardError::InvalidData(format!(
                        "profile {}/{} references unknown substance '{}'",
                        profile.crop_type, profile.disease_name, name
                    ))
                })?;
                record.target_crops.insert(profile.crop_type.clone());
                record.target_diseases.insert(profile.disease_name.clone());
            }

            let key = (
                normalize_key(&profile.crop_type),
                normalize_key(&profile.disease_name),
            );
            if by_pair.contains_key(&key) {
                return Err(CropGuardError::InvalidData(format!(
                    "duplicate profile {}/{}",
                    profile.crop_type, profile.disease_name
                )));
            }
            by_pair.insert(key, profile);
        }

        if default_profile.primary_substances.is_empty() {
            return Err(CropGuardError::InvalidData(
                "default profile needs at least one primary substance".into(),
            ));
        }
        for name in default_profile.referenced_substances() {
            if !by_name.contains_key(&normalize_key(name)) {
                return Err(CropGuardError::InvalidData(format!(
                    "default profile references unknown substance '{}'",
                    name
                )));
            }
        }

        Ok(Self {
            substances: by_name,
            profiles: by_pair,
            default_profile,
        })
    }

    /// The built-in tomato/brinjal/capsicum reference data.
    pub fn builtin() -> Result<Self> {
        Self::new(
            builtin::substances(),
            builtin::profiles(),
            builtin::default_profile(),
        )
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)
            .map_err(|e| CropGuardError::InvalidData(format!("Failed to parse catalog: {}", e)))?;
        let default_profile = file
            .default_profile
            .unwrap_or_else(builtin::default_profile);
        Self::new(file.substances, file.profiles, default_profile)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropGuardError::Config(format!("Failed to read catalog {:?}: {}", path, e))
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        info!(
            path = %path.display(),
            substances = catalog.substances.len(),
            profiles = catalog.profiles.len(),
            "Loaded substance catalog"
        );
        Ok(catalog)
    }

    pub fn lookup(&self, name: &str) -> Option<&SubstanceRecord> {
        self.substances.get(&normalize_key(name))
    }

    /// Like [`lookup`](Self::lookup) but turns a miss into `NotFound`.
    pub fn require(&self, name: &str) -> Result<&SubstanceRecord> {
        self.lookup(name)
            .ok_or_else(|| CropGuardError::NotFound(format!("substance '{}'", name)))
    }

    /// Effectiveness of a substance; unknown names rank Medium.
    pub fn effectiveness_rank(&self, name: &str) -> EffectivenessRank {
        self.lookup(name)
            .map(|record| record.effectiveness)
            .unwrap_or_default()
    }

    pub fn profile(&self, crop_type: &str, disease_name: &str) -> Option<&DiseaseProfile> {
        self.profiles
            .get(&(normalize_key(crop_type), normalize_key(disease_name)))
    }

    pub fn default_profile(&self) -> &DiseaseProfile {
        &self.default_profile
    }

    pub fn has_crop(&self, crop_type: &str) -> bool {
        let key = normalize_key(crop_type);
        self.profiles.keys().any(|(crop, _)| *crop == key)
    }

    /// Crop names as spelled in the profiles, sorted and deduplicated.
    pub fn crops(&self) -> Vec<&str> {
        let mut crops: Vec<&str> = self
            .profiles
            .values()
            .map(|p| p.crop_type.as_str())
            .collect();
        crops.dedup_by(|a, b| normalize_key(a) == normalize_key(b));
        crops
    }

    pub fn diseases(&self, crop_type: &str) -> Vec<&DiseaseProfile> {
        let key = normalize_key(crop_type);
        self.profiles
            .iter()
            .filter(|((crop, _), _)| *crop == key)
            .map(|(_, profile)| profile)
            .collect()
    }

    pub fn substances(&self) -> impl Iterator<Item = &SubstanceRecord> {
        self.substances.values()
    }
}
