use super::calculator::DosageCalculator;
use super::catalog::PesticideCatalog;
use super::planner;
use super::pricing::RegionPricing;
use super::selector;
use crate::config::{Config, EngineConfig};
use crate::error::{CropGuardError, Result};
use crate::models::{
    validate_farm_size, DiseaseClassification, SeasonalEstimate, SubstanceComparison,
    TreatmentPlan, TreatmentRequest,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Turns a detected disease and field context into a treatment plan.
///
/// Stateless apart from the shared read-only catalog, so one engine can
/// serve any number of concurrent callers.
pub struct TreatmentEngine {
    catalog: Arc<PesticideCatalog>,
    config: EngineConfig,
    regions: RegionPricing,
}

impl TreatmentEngine {
    pub fn new(
        catalog: Arc<PesticideCatalog>,
        config: EngineConfig,
        regions: RegionPricing,
    ) -> Result<Self> {
        config.validate()?;
        regions.validate()?;
        catalog.require(&config.fallback_substance).map_err(|_| {
            CropGuardError::InvalidData(format!(
                "fallback substance '{}' is not in the catalog",
                config.fallback_substance
            ))
        })?;

        Ok(Self {
            catalog,
            config,
            regions,
        })
    }

    /// Built-in catalog with reference rates.
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Arc::new(PesticideCatalog::builtin()?),
            EngineConfig::default(),
            RegionPricing::default(),
        )
    }

    /// Loads the catalog named by the config, or the built-in one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = match &config.catalog_path {
            Some(path) => PesticideCatalog::load(path)?,
            None => PesticideCatalog::builtin()?,
        };
        Self::new(
            Arc::new(catalog),
            config.engine.clone(),
            config.regions.clone(),
        )
    }

    pub fn catalog(&self) -> &PesticideCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn calculator(&self) -> DosageCalculator<'_> {
        DosageCalculator::new(&self.catalog, &self.config, &self.regions)
    }

    pub fn recommend(&self, request: &TreatmentRequest) -> Result<TreatmentPlan> {
        self.build_plan(request, None)
    }

    /// Plan for a classifier result. Confidence is copied onto the plan and
    /// has no effect on the numbers.
    pub fn recommend_for(
        &self,
        classification: &DiseaseClassification,
        crop_type: &str,
        farm_size_hectares: f64,
        location: Option<&str>,
        weather: Option<&str>,
    ) -> Result<TreatmentPlan> {
        let confidence = classification.confidence;
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(CropGuardError::Validation(format!(
                "confidence must be between 0 and 1, got {}",
                confidence
            )));
        }

        let mut request = TreatmentRequest::new(
            crop_type,
            classification.disease_name.clone(),
            classification.severity,
            farm_size_hectares,
        );
        request.location = location.map(str::to_string);
        request.weather = weather.map(str::to_string);

        self.build_plan(&request, Some(confidence))
    }

    fn build_plan(
        &self,
        request: &TreatmentRequest,
        confidence: Option<f64>,
    ) -> Result<TreatmentPlan> {
        request.validate()?;

        let selection = selector::select(
            &self.catalog,
            &request.crop_type,
            &request.disease_name,
            request.severity,
            &self.config.selection,
        );
        debug!(
            crop = %request.crop_type,
            disease = %selection.disease_name,
            severity = %selection.severity,
            primary = ?selection.primary,
            "Selected substances"
        );

        let calculation = self.calculator().calculate(
            &selection.primary,
            request.farm_size_hectares,
            selection.severity,
            request.location_text(),
            request.weather_text(),
        );

        let plan = planner::assemble(request, selection, calculation, confidence);
        info!(
            crop = %plan.crop_type,
            disease = %plan.disease_name,
            severity = %plan.severity,
            total_cost = plan.costs.total,
            fallback = plan.is_fallback(),
            "Built treatment plan"
        );
        Ok(plan)
    }

    /// Base-rate costs for the named substances, cheapest first.
    pub fn compare_substances(
        &self,
        names: &[String],
        farm_size_hectares: f64,
    ) -> Result<Vec<SubstanceComparison>> {
        validate_farm_size(farm_size_hectares)?;
        Ok(self.calculator().compare(names, farm_size_hectares))
    }

    pub fn seasonal_estimate(
        &self,
        crop_type: &str,
        farm_size_hectares: f64,
        location: Option<&str>,
    ) -> Result<SeasonalEstimate> {
        if crop_type.trim().is_empty() {
            return Err(CropGuardError::Validation("crop type is required".into()));
        }
        validate_farm_size(farm_size_hectares)?;
        Ok(self
            .calculator()
            .seasonal(crop_type, farm_size_hectares, location.unwrap_or("")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DiseaseProfile, EffectivenessRank, FallbackReason, RegionBucket, SeverityTier,
        SubstanceRecord,
    };

    const EPS: f64 = 1e-9;

    fn engine() -> TreatmentEngine {
        TreatmentEngine::with_defaults().unwrap()
    }

    fn scenario(severity: SeverityTier) -> TreatmentRequest {
        TreatmentRequest::new("tomato", "Bacterial_spot", severity, 2.0)
            .with_location("Punjab")
            .with_weather("sunny")
    }

    #[test]
    fn moderate_scenario_end_to_end() {
        let plan = engine().recommend(&scenario(SeverityTier::Moderate)).unwrap();

        assert_eq!(plan.primary_substances[0], "Copper Hydroxide");
        assert!((plan.dosage.dosage_per_hectare - 2.375).abs() < EPS);
        assert!((plan.dosage.total_amount - 4.75).abs() < EPS);
        assert!((plan.costs.substance - 2137.5).abs() < 1e-6);
        assert!((plan.dosage.total_water - 2375.0).abs() < 1e-6);
        assert_eq!(plan.dosage.applications, 3);
        assert!((plan.dosage.cost_per_application - 712.5).abs() < 1e-6);
        assert_eq!(plan.dosage.region, Some(RegionBucket::North));
        assert!(plan.weather_note.is_some());
        assert!(!plan.is_fallback());
        assert!(plan.requires_treatment());
        assert_eq!(plan.follow_up[0], "Monitor every 2-3 days");
        assert!(plan
            .timing
            .contains(&"Apply at 7-10 day intervals during disease season".to_string()));
    }

    #[test]
    fn healthy_scenario_is_zero_plan() {
        let plan = engine().recommend(&scenario(SeverityTier::Healthy)).unwrap();

        assert!(plan.primary_substances.is_empty());
        assert!(plan.alternative_substances.is_empty());
        assert_eq!(plan.dosage.total_amount, 0.0);
        assert_eq!(plan.costs.substance, 0.0);
        assert_eq!(plan.costs.total, 0.0);
        assert_eq!(plan.dosage.applications, 0);
        assert_eq!(plan.dosage.cost_per_application, 0.0);
        assert!(!plan.requires_treatment());
        assert!(plan.weather_note.is_none());
        assert!(!plan.prevention_tips.is_empty());
        assert_eq!(plan.follow_up[0], "Continue regular monitoring");
    }

    #[test]
    fn severity_scale_is_monotonic() {
        let engine = engine();
        let scale = &engine.config().severity;
        for pair in SeverityTier::all().windows(2) {
            assert!(scale.multiplier(pair[0]) <= scale.multiplier(pair[1]));
            assert!(scale.application_count(pair[0]) <= scale.application_count(pair[1]));
        }

        let amounts: Vec<f64> = SeverityTier::all()
            .iter()
            .map(|tier| {
                let request = TreatmentRequest::new("tomato", "Early_blight", *tier, 1.0);
                engine.recommend(&request).unwrap().dosage.total_amount
            })
            .collect();
        for pair in amounts.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn linear_in_farm_size() {
        let engine = engine();
        for tier in SeverityTier::all() {
            let base = TreatmentRequest::new("capsicum", "Anthracnose", *tier, 1.25)
                .with_location("Gujarat")
                .with_weather("humid");
            let doubled = TreatmentRequest {
                farm_size_hectares: 2.5,
                ..base.clone()
            };
            let a = engine.recommend(&base).unwrap();
            let b = engine.recommend(&doubled).unwrap();
            assert!((b.dosage.total_amount - 2.0 * a.dosage.total_amount).abs() < EPS);
            assert!((b.costs.substance - 2.0 * a.costs.substance).abs() < 1e-6);
            assert!((b.dosage.total_water - 2.0 * a.dosage.total_water).abs() < 1e-6);
        }
    }

    #[test]
    fn identical_requests_give_identical_plans() {
        let engine = engine();
        let request = TreatmentRequest::new("brinjal", "Bacterial_wilt", SeverityTier::Severe, 3.0)
            .with_location("Chennai, Tamil Nadu")
            .with_weather("windy afternoon");
        let first = engine.recommend(&request).unwrap();
        for _ in 0..5 {
            assert_eq!(engine.recommend(&request).unwrap(), first);
        }
    }

    #[test]
    fn unknown_disease_never_fails() {
        let engine = engine();
        for (crop, disease) in [("tomato", "Mosaic_virus"), ("okra", "Yellow_vein"), ("x", "y")] {
            for tier in [SeverityTier::Mild, SeverityTier::Moderate, SeverityTier::Severe] {
                let request = TreatmentRequest::new(crop, disease, tier, 1.0);
                let plan = engine.recommend(&request).unwrap();
                assert!(plan.is_fallback());
                assert_eq!(plan.fallbacks[0], FallbackReason::UnknownProfile);
                assert!(!plan.primary_substances.is_empty());
                assert!(plan.dosage.applications > 0);
                assert_eq!(plan.follow_up, vec!["Monitor weekly", "Repeat application as needed"]);
            }
        }
    }

    #[test]
    fn healthy_profile_ignores_requested_severity() {
        let request = TreatmentRequest::new("tomato", "Healthy", SeverityTier::Severe, 4.0);
        let plan = engine().recommend(&request).unwrap();
        assert_eq!(plan.severity, SeverityTier::Healthy);
        assert_eq!(plan.costs.total, 0.0);
        assert!(plan.primary_substances.is_empty());
    }

    #[test]
    fn severe_combination_keeps_application_count() {
        let request = TreatmentRequest::new("tomato", "Late_blight", SeverityTier::Severe, 1.0);
        let plan = engine().recommend(&request).unwrap();
        assert!(plan.combination_treatment);
        assert_eq!(plan.dosage.applications, 4);
        assert_eq!(plan.timing[0], "Apply immediately upon detection");
        // Metalaxyl + Mancozeb 2.0 kg/ha * 1.3
        assert!((plan.dosage.total_amount - 2.6).abs() < EPS);
        assert_eq!(plan.safety_interval_days, Some(21));
    }

    #[test]
    fn invalid_requests_are_rejected() {
        let engine = engine();
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let request = TreatmentRequest::new("tomato", "Early_blight", SeverityTier::Mild, size);
            assert!(matches!(
                engine.recommend(&request),
                Err(CropGuardError::Validation(_))
            ));
        }
        let request = TreatmentRequest::new("", "Early_blight", SeverityTier::Mild, 1.0);
        assert!(engine.recommend(&request).is_err());
    }

    #[test]
    fn classification_confidence_is_advisory() {
        let engine = engine();
        let classification = |confidence| DiseaseClassification {
            disease_name: "Early_blight".into(),
            severity: SeverityTier::Moderate,
            confidence,
        };

        let low = engine
            .recommend_for(&classification(0.31), "tomato", 2.0, Some("Kerala"), None)
            .unwrap();
        let high = engine
            .recommend_for(&classification(0.97), "tomato", 2.0, Some("Kerala"), None)
            .unwrap();

        assert_eq!(low.confidence, Some(0.31));
        assert_eq!(high.confidence, Some(0.97));
        assert_eq!(low.dosage, high.dosage);
        assert_eq!(low.costs, high.costs);

        assert!(engine
            .recommend_for(&classification(1.5), "tomato", 2.0, None, None)
            .is_err());
    }

    #[test]
    fn profile_without_primary_uses_fallback_substance() {
        let substances = vec![
            SubstanceRecord::new("Copper Hydroxide", 450.0, 2.5, 500.0, 7, EffectivenessRank::Medium),
            SubstanceRecord::new("Sulfur", 200.0, 3.0, 300.0, 14, EffectivenessRank::MediumLow),
        ];
        let profiles = vec![DiseaseProfile::new("okra", "Powdery_mildew").with_alternatives(&["Sulfur"])];
        let default = DiseaseProfile::new("generic", "Unidentified disease")
            .with_primary(&["Copper Hydroxide"]);
        let catalog = PesticideCatalog::new(substances, profiles, default).unwrap();
        let engine = TreatmentEngine::new(
            Arc::new(catalog),
            EngineConfig::default(),
            RegionPricing::default(),
        )
        .unwrap();

        let request = TreatmentRequest::new("okra", "Powdery_mildew", SeverityTier::Severe, 2.0);
        let plan = engine.recommend(&request).unwrap();
        assert_eq!(plan.fallbacks, vec![FallbackReason::NoPrimarySubstance]);
        assert_eq!(plan.dosage.substance.as_deref(), Some("Copper Hydroxide"));
        assert_eq!(plan.dosage.applications, 3);
        assert!((plan.dosage.total_amount - 5.0).abs() < EPS);
    }

    #[test]
    fn engine_is_shared_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TreatmentEngine>();

        let engine = engine();
        let expected = engine.recommend(&scenario(SeverityTier::Severe)).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| engine.recommend(&scenario(SeverityTier::Severe)).unwrap()))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }

    #[test]
    fn fallback_substance_must_exist() {
        let config = EngineConfig {
            fallback_substance: "Neem Oil".into(),
            ..EngineConfig::default()
        };
        let result = TreatmentEngine::new(
            Arc::new(PesticideCatalog::builtin().unwrap()),
            config,
            RegionPricing::default(),
        );
        assert!(matches!(result, Err(CropGuardError::InvalidData(_))));
    }

    #[test]
    fn compare_and_seasonal_validate_farm_size() {
        let engine = engine();
        assert!(engine.compare_substances(&["Sulfur".into()], 0.0).is_err());
        assert!(engine.seasonal_estimate("tomato", -2.0, None).is_err());

        let rows = engine
            .compare_substances(&["Mancozeb".into(), "Sulfur".into()], 1.0)
            .unwrap();
        assert_eq!(rows[0].substance, "Sulfur");

        let estimate = engine.seasonal_estimate("Brinjal", 1.0, Some("Assam")).unwrap();
        assert_eq!(estimate.treatments_per_season, 4);
        assert_eq!(estimate.region, RegionBucket::East);
    }
}
