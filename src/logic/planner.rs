use super::adjusters::weather_advisory;
use super::calculator::Calculation;
use super::rules::{first_match, KeywordRule};
use super::selector::Selection;
use crate::models::{FallbackReason, SeverityTier, TreatmentPlan, TreatmentRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiseaseHint {
    Blight,
    Spot,
}

impl DiseaseHint {
    fn timing(&self) -> &'static str {
        match self {
            DiseaseHint::Blight => "Apply preventively during favorable disease conditions",
            DiseaseHint::Spot => "Apply at 7-10 day intervals during disease season",
        }
    }
}

const DISEASE_HINTS: &[KeywordRule<DiseaseHint>] = &[
    KeywordRule::new(&["blight"], DiseaseHint::Blight),
    KeywordRule::new(&["spot"], DiseaseHint::Spot),
];

const GENERIC_TIMING: &[&str] = &[
    "Apply at first sign of disease",
    "Best time: Early morning or evening",
];

const GENERIC_FOLLOW_UP: &[&str] = &["Monitor weekly", "Repeat application as needed"];

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Timing guidance from severity, weather and disease name.
pub fn timing(disease_name: &str, severity: SeverityTier, weather: &str) -> Vec<String> {
    if severity == SeverityTier::Healthy {
        return lines(&["No treatment required; continue preventive care"]);
    }

    let mut timing = if severity == SeverityTier::Severe {
        lines(&[
            "Apply immediately upon detection",
            "Repeat application every 5-7 days",
        ])
    } else {
        lines(&["Apply at first sign of symptoms", "Follow regular spray schedule"])
    };

    if weather.to_lowercase().contains("rain") {
        timing.push("Apply after rain stops and leaves dry".into());
        timing.push("Check weather forecast for 24-hour rain-free period".into());
    } else {
        timing.push("Best application time: Early morning (6-10 AM) or evening (4-7 PM)".into());
        timing.push("Avoid application during peak sun hours".into());
    }

    if let Some(rule) = first_match(DISEASE_HINTS, disease_name) {
        timing.push(rule.effect.timing().into());
    }

    timing
}

/// Monitoring schedule; depends on severity alone.
pub fn follow_up(severity: SeverityTier) -> Vec<String> {
    match severity {
        SeverityTier::Severe => lines(&[
            "Monitor daily for first week",
            "Assess treatment effectiveness after 7 days",
            "Continue treatment every 5-7 days until controlled",
            "Switch to preventive schedule once controlled",
        ]),
        SeverityTier::Moderate => lines(&[
            "Monitor every 2-3 days",
            "Assess after 10 days",
            "Continue treatment every 10-14 days",
            "Reduce frequency as symptoms improve",
        ]),
        SeverityTier::Mild => lines(&[
            "Monitor weekly",
            "Assess after 14 days",
            "Apply preventive treatments as needed",
            "Continue monitoring throughout season",
        ]),
        SeverityTier::Healthy => lines(&[
            "Continue regular monitoring",
            "Apply preventive measures",
            "Maintain good cultural practices",
        ]),
    }
}

/// Merges selection, arithmetic and guidance into the final plan.
pub fn assemble(
    request: &TreatmentRequest,
    selection: Selection,
    calculation: Calculation,
    confidence: Option<f64>,
) -> TreatmentPlan {
    let severity = selection.severity;
    let weather = request.weather_text();

    // Unknown pairs get the generic schedule unless nothing needs doing
    let (timing, follow_up) = if selection.used_default_profile && severity.needs_treatment() {
        (lines(GENERIC_TIMING), lines(GENERIC_FOLLOW_UP))
    } else {
        (
            timing(&selection.disease_name, severity, weather),
            follow_up(severity),
        )
    };

    // No dosage, no weather note
    let weather_note = if severity.needs_treatment() {
        weather_advisory(weather).note
    } else {
        None
    };

    let mut fallbacks = Vec::new();
    if selection.used_default_profile {
        fallbacks.push(FallbackReason::UnknownProfile);
    }
    if let Some(reason) = calculation.fallback {
        fallbacks.push(reason);
    }

    TreatmentPlan {
        crop_type: request.crop_type.clone(),
        disease_name: selection.disease_name,
        severity,
        farm_size_hectares: request.farm_size_hectares,
        confidence,
        primary_substances: selection.primary,
        alternative_substances: selection.alternatives,
        application_method: selection.application_method,
        application_frequency: selection.application_frequency,
        combination_treatment: selection.combination_treatment,
        substance_rates: calculation.substance_rates,
        dosage: calculation.dosage,
        costs: calculation.costs,
        savings: calculation.savings,
        safety_interval_days: calculation.safety_interval_days,
        application_instructions: calculation.application_instructions,
        timing,
        follow_up,
        prevention_tips: selection.prevention_tips,
        weather_note,
        fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severe_timing_is_urgent() {
        let timing = timing("Late_blight", SeverityTier::Severe, "cloudy");
        assert_eq!(timing[0], "Apply immediately upon detection");
        assert_eq!(timing[1], "Repeat application every 5-7 days");
        assert!(timing[2].contains("Early morning"));
        assert_eq!(
            timing.last().unwrap(),
            "Apply preventively during favorable disease conditions"
        );
    }

    #[test]
    fn rain_aware_timing() {
        let timing = timing("Bacterial_spot", SeverityTier::Moderate, "Heavy Rain expected");
        assert_eq!(timing[0], "Apply at first sign of symptoms");
        assert!(timing.iter().any(|t| t.contains("rain stops")));
        assert!(!timing.iter().any(|t| t.contains("Early morning")));
        assert_eq!(
            timing.last().unwrap(),
            "Apply at 7-10 day intervals during disease season"
        );
    }

    #[test]
    fn no_hint_for_other_diseases() {
        let timing = timing("Powdery_mildew", SeverityTier::Mild, "");
        assert_eq!(timing.len(), 4);
    }

    #[test]
    fn healthy_timing_has_no_spray_window() {
        let timing = timing("Healthy", SeverityTier::Healthy, "rain");
        assert_eq!(timing.len(), 1);
        assert!(!timing[0].contains("rain"));
    }

    fn selection(severity: SeverityTier) -> Selection {
        Selection {
            disease_name: "Early_blight".into(),
            severity,
            primary: Vec::new(),
            alternatives: Vec::new(),
            application_method: "Foliar spray".into(),
            application_frequency: "Every 10-14 days".into(),
            prevention_tips: Vec::new(),
            combination_treatment: false,
            used_default_profile: false,
        }
    }

    #[test]
    fn weather_note_only_when_treating() {
        let request = TreatmentRequest::new("tomato", "Early_blight", SeverityTier::Healthy, 1.0)
            .with_weather("heavy rain");

        let healthy = assemble(
            &request,
            selection(SeverityTier::Healthy),
            Calculation::default(),
            None,
        );
        assert!(healthy.weather_note.is_none());

        let moderate = assemble(
            &request,
            selection(SeverityTier::Moderate),
            Calculation::default(),
            None,
        );
        assert!(moderate.weather_note.unwrap().contains("wash-off"));
    }

    #[test]
    fn follow_up_per_tier() {
        assert_eq!(follow_up(SeverityTier::Severe)[0], "Monitor daily for first week");
        assert_eq!(follow_up(SeverityTier::Moderate)[0], "Monitor every 2-3 days");
        assert_eq!(follow_up(SeverityTier::Mild)[0], "Monitor weekly");
        assert_eq!(follow_up(SeverityTier::Healthy).len(), 3);
        assert_eq!(follow_up(SeverityTier::Healthy)[0], "Continue regular monitoring");
    }
}
