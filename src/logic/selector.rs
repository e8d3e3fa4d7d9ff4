use super::catalog::PesticideCatalog;
use crate::models::SeverityTier;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const COMBINATION_SUFFIX: &str = " (combination treatment recommended)";
pub const INTENSIFIED_FREQUENCY: &str = "Every 5-7 days until controlled";
pub const PREVENTIVE_METHOD: &str = "Preventive measures only";

/// Tunables for the severity-driven re-ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// Substances whose name contains this marker count as "gentle" and are
    /// promoted for mild infections. `None` disables the substitution.
    pub gentle_marker: Option<String>,
    pub max_gentle_substitutes: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            gentle_marker: Some("copper".to_string()),
            max_gentle_substitutes: 2,
        }
    }
}

/// Substances and guidance chosen for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub disease_name: String,
    /// Severity after prevention-only profiles have been folded into Healthy
    pub severity: SeverityTier,
    pub primary: Vec<String>,
    pub alternatives: Vec<String>,
    pub application_method: String,
    pub application_frequency: String,
    pub prevention_tips: Vec<String>,
    pub combination_treatment: bool,
    pub used_default_profile: bool,
}

pub fn select(
    catalog: &PesticideCatalog,
    crop_type: &str,
    disease_name: &str,
    severity: SeverityTier,
    policy: &SelectionPolicy,
) -> Selection {
    let (profile, used_default_profile) = match catalog.profile(crop_type, disease_name) {
        Some(profile) => (profile, false),
        None => {
            warn!(
                crop = %crop_type,
                disease = %disease_name,
                "No disease profile found, using default profile"
            );
            (catalog.default_profile(), true)
        }
    };

    let severity = if profile.is_prevention_only() {
        SeverityTier::Healthy
    } else {
        severity
    };

    let disease_name = if used_default_profile {
        disease_name.to_string()
    } else {
        profile.disease_name.clone()
    };

    if severity == SeverityTier::Healthy {
        return Selection {
            disease_name,
            severity,
            primary: Vec::new(),
            alternatives: Vec::new(),
            application_method: PREVENTIVE_METHOD.to_string(),
            application_frequency: "Not required".to_string(),
            prevention_tips: profile.prevention_tips.clone(),
            combination_treatment: false,
            used_default_profile,
        };
    }

    let mut selection = Selection {
        disease_name,
        severity,
        primary: profile.primary_substances.clone(),
        alternatives: profile.alternative_substances.clone(),
        application_method: profile.application_method.clone(),
        application_frequency: profile.application_frequency.clone(),
        prevention_tips: profile.prevention_tips.clone(),
        combination_treatment: false,
        used_default_profile,
    };

    match severity {
        SeverityTier::Severe if selection.primary.len() > 1 => {
            selection.application_method.push_str(COMBINATION_SUFFIX);
            selection.application_frequency = INTENSIFIED_FREQUENCY.to_string();
            selection.combination_treatment = true;
        }
        SeverityTier::Mild => {
            if let Some(marker) = policy.gentle_marker.as_deref() {
                let gentle = gentle_candidates(
                    &selection.primary,
                    &selection.alternatives,
                    marker,
                    policy.max_gentle_substitutes,
                );
                if !gentle.is_empty() {
                    debug!(?gentle, "Promoting gentle substances for mild infection");
                    selection.primary = gentle;
                }
            }
        }
        _ => {}
    }

    selection
}

/// Marker-matching names from primary then alternatives, first occurrence
/// order, without duplicates.
pub fn gentle_candidates(
    primary: &[String],
    alternatives: &[String],
    marker: &str,
    limit: usize,
) -> Vec<String> {
    let marker = marker.to_lowercase();
    let mut matches: Vec<String> = Vec::new();
    for name in primary.iter().chain(alternatives.iter()) {
        if name.to_lowercase().contains(&marker) && !matches.contains(name) {
            matches.push(name.clone());
        }
    }
    matches.truncate(limit);
    matches
}
