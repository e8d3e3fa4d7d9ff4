//! Dosage and cost arithmetic.
//!
//! The first primary substance is the representative one for quantity math,
//! even when several are recommended.

use super::adjusters::weather_advisory;
use super::catalog::{normalize_key, PesticideCatalog};
use super::pricing::RegionPricing;
use crate::config::EngineConfig;
use crate::models::{
    CostBreakdown, DosagePlan, FallbackReason, SavingsEstimate, SeasonalEstimate, SeverityTier,
    SubstanceComparison, SubstanceRate, SubstanceRecord,
};
use tracing::{debug, warn};

/// Treatments per season by crop; anything else uses `DEFAULT_SEASONAL_TREATMENTS`.
const SEASONAL_TREATMENTS: &[(&str, u32)] = &[("tomato", 6), ("brinjal", 4), ("capsicum", 5)];
const DEFAULT_SEASONAL_TREATMENTS: u32 = 5;
const SEASONAL_AVG_PRICE: f64 = 600.0;
const SEASONAL_AVG_DOSAGE: f64 = 2.0;
const SEASON_MONTHS: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Calculation {
    pub dosage: DosagePlan,
    pub costs: CostBreakdown,
    pub savings: SavingsEstimate,
    pub substance_rates: Vec<SubstanceRate>,
    pub safety_interval_days: Option<u32>,
    pub application_instructions: Option<String>,
    pub fallback: Option<FallbackReason>,
}

pub struct DosageCalculator<'a> {
    catalog: &'a PesticideCatalog,
    config: &'a EngineConfig,
    regions: &'a RegionPricing,
}

impl<'a> DosageCalculator<'a> {
    pub fn new(
        catalog: &'a PesticideCatalog,
        config: &'a EngineConfig,
        regions: &'a RegionPricing,
    ) -> Self {
        Self {
            catalog,
            config,
            regions,
        }
    }

    pub fn calculate(
        &self,
        primary: &[String],
        farm_size_hectares: f64,
        severity: SeverityTier,
        location: &str,
        weather: &str,
    ) -> Calculation {
        let applications = self.config.severity.application_count(severity);
        if applications == 0 {
            // Healthy: nothing to apply, nothing to divide
            return Calculation::default();
        }

        let Some(name) = primary.first() else {
            warn!(%severity, "No primary substance selected, using fallback plan");
            return self.fallback(farm_size_hectares, FallbackReason::NoPrimarySubstance);
        };
        let Some(substance) = self.catalog.lookup(name) else {
            warn!(substance = %name, "Substance missing from catalog, using fallback plan");
            return self.fallback(
                farm_size_hectares,
                FallbackReason::UnknownSubstance(name.clone()),
            );
        };

        let severity_multiplier = self.config.severity.multiplier(severity);
        let weather_multiplier = weather_advisory(weather).dosage_multiplier;
        let (region, region_multiplier) = self.regions.for_location(location);

        let dosage_per_hectare =
            substance.base_dosage_per_hectare * severity_multiplier * weather_multiplier;
        let total_amount = dosage_per_hectare * farm_size_hectares;
        let unit_price = substance.base_price_per_unit * region_multiplier;
        let total_cost = total_amount * unit_price;
        let total_water = total_amount * substance.water_ratio_per_unit;

        debug!(
            substance = %substance.name,
            severity_multiplier,
            weather_multiplier,
            %region,
            region_multiplier,
            total_amount,
            total_cost,
            "Calculated dosage"
        );

        let substance_rates = primary
            .iter()
            .filter_map(|name| self.catalog.lookup(name))
            .map(|record| SubstanceRate {
                name: record.name.clone(),
                dosage_per_hectare: record.base_dosage_per_hectare
                    * severity_multiplier
                    * weather_multiplier,
                effectiveness: record.effectiveness,
            })
            .collect();

        Calculation {
            dosage: DosagePlan {
                substance: Some(substance.name.clone()),
                dosage_per_hectare,
                total_amount,
                total_water,
                unit_price,
                region: Some(region),
                applications,
                cost_per_application: total_cost / f64::from(applications),
            },
            costs: self.cost_breakdown(total_cost, applications),
            savings: self.savings(total_amount, total_cost),
            substance_rates,
            safety_interval_days: Some(substance.safety_interval_days),
            application_instructions: Some(application_instructions(
                substance,
                dosage_per_hectare,
            )),
            fallback: None,
        }
    }

    /// Default plan from the designated fallback substance: base rate, base
    /// price, fixed application count.
    pub fn fallback(&self, farm_size_hectares: f64, reason: FallbackReason) -> Calculation {
        let Some(substance) = self.catalog.lookup(&self.config.fallback_substance) else {
            warn!(
                substance = %self.config.fallback_substance,
                "Fallback substance missing from catalog"
            );
            return Calculation {
                fallback: Some(reason),
                ..Calculation::default()
            };
        };

        let applications = self.config.fallback_applications;
        let dosage_per_hectare = substance.base_dosage_per_hectare;
        let total_amount = dosage_per_hectare * farm_size_hectares;
        let unit_price = substance.base_price_per_unit;
        let total_cost = total_amount * unit_price;
        // Config validation keeps this at one or more
        let cost_per_application = total_cost / f64::from(applications.max(1));

        Calculation {
            dosage: DosagePlan {
                substance: Some(substance.name.clone()),
                dosage_per_hectare,
                total_amount,
                total_water: total_amount * substance.water_ratio_per_unit,
                unit_price,
                region: None,
                applications,
                cost_per_application,
            },
            costs: self.cost_breakdown(total_cost, applications),
            savings: self.savings(total_amount, total_cost),
            substance_rates: vec![SubstanceRate {
                name: substance.name.clone(),
                dosage_per_hectare,
                effectiveness: substance.effectiveness,
            }],
            safety_interval_days: Some(substance.safety_interval_days),
            application_instructions: Some(application_instructions(
                substance,
                dosage_per_hectare,
            )),
            fallback: Some(reason),
        }
    }

    fn cost_breakdown(&self, substance_cost: f64, applications: u32) -> CostBreakdown {
        let applications = f64::from(applications);
        let labor = applications * self.config.labor_rate;
        let fuel = applications * self.config.fuel_rate;
        let equipment = applications * self.config.equipment_rate;
        CostBreakdown {
            substance: substance_cost,
            labor,
            fuel,
            equipment,
            total: substance_cost + labor + fuel + equipment,
        }
    }

    fn savings(&self, total_amount: f64, total_cost: f64) -> SavingsEstimate {
        let baseline = self.config.overuse_baseline;
        let excess = baseline - 1.0;
        SavingsEstimate {
            baseline_multiplier: baseline,
            potential_savings: total_cost * excess,
            reduction_percentage: excess / baseline * 100.0,
            substance_saved: total_amount * excess,
        }
    }

    /// Base-rate cost of each known substance, cheapest first.
    pub fn compare(&self, names: &[String], farm_size_hectares: f64) -> Vec<SubstanceComparison> {
        let mut rows: Vec<SubstanceComparison> = names
            .iter()
            .filter_map(|name| {
                let record = self.catalog.lookup(name);
                if record.is_none() {
                    warn!(substance = %name, "Skipping unknown substance in comparison");
                }
                record
            })
            .map(|record| {
                let amount_needed = record.base_dosage_per_hectare * farm_size_hectares;
                let cost = amount_needed * record.base_price_per_unit;
                SubstanceComparison {
                    substance: record.name.clone(),
                    amount_needed,
                    cost,
                    cost_per_hectare: cost / farm_size_hectares,
                    effectiveness: record.effectiveness,
                }
            })
            .collect();

        rows.sort_by(|a, b| a.cost.total_cmp(&b.cost));
        rows
    }

    pub fn seasonal(
        &self,
        crop_type: &str,
        farm_size_hectares: f64,
        location: &str,
    ) -> SeasonalEstimate {
        let crop_key = normalize_key(crop_type);
        let treatments = SEASONAL_TREATMENTS
            .iter()
            .find(|(crop, _)| *crop == crop_key)
            .map(|(_, count)| *count)
            .unwrap_or(DEFAULT_SEASONAL_TREATMENTS);
        let (region, region_multiplier) = self.regions.for_location(location);

        let per_season = f64::from(treatments) * farm_size_hectares;
        let substance_cost =
            SEASONAL_AVG_DOSAGE * per_season * SEASONAL_AVG_PRICE * region_multiplier;
        let labor_cost = per_season * self.config.labor_rate;
        let fuel_cost = per_season * self.config.fuel_rate;
        let equipment_cost = per_season * self.config.equipment_rate;
        let total_cost = substance_cost + labor_cost + fuel_cost + equipment_cost;

        SeasonalEstimate {
            crop_type: crop_type.to_string(),
            farm_size_hectares,
            region,
            treatments_per_season: treatments,
            substance_cost,
            labor_cost,
            fuel_cost,
            equipment_cost,
            total_cost,
            cost_per_hectare: total_cost / farm_size_hectares,
            monthly_average: total_cost / SEASON_MONTHS,
        }
    }
}

pub fn application_instructions(substance: &SubstanceRecord, dosage_per_hectare: f64) -> String {
    format!(
        "Application instructions for {name}:\n\
         1. Dosage: {dosage:.2} kg per hectare\n\
         2. Water: mix with {water:.0} litres of water per kg of product\n\
         3. Spray volume: 400-500 litres per hectare\n\
         4. Nozzle: flat fan nozzle for uniform coverage\n\
         5. Timing: early morning (6-10 AM) or evening (4-7 PM)\n\
         6. Weather: avoid windy or rainy conditions\n\
         7. Safety: wear protective equipment; observe the {safety}-day pre-harvest interval\n\
         8. Re-entry: wait 24 hours before entering the treated area",
        name = substance.name,
        dosage = dosage_per_hectare,
        water = substance.water_ratio_per_unit,
        safety = substance.safety_interval_days,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RegionBucket;

    const EPS: f64 = 1e-9;

    fn fixture() -> (PesticideCatalog, EngineConfig, RegionPricing) {
        (
            PesticideCatalog::builtin().unwrap(),
            EngineConfig::default(),
            RegionPricing::default(),
        )
    }

    fn primary(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn moderate_sunny_punjab_scenario() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Copper Hydroxide"]),
            2.0,
            SeverityTier::Moderate,
            "Punjab",
            "sunny",
        );

        assert!((calc.dosage.dosage_per_hectare - 2.375).abs() < EPS);
        assert!((calc.dosage.total_amount - 4.75).abs() < EPS);
        assert!((calc.costs.substance - 2137.5).abs() < 1e-6);
        assert!((calc.dosage.total_water - 2375.0).abs() < 1e-6);
        assert_eq!(calc.dosage.applications, 3);
        assert!((calc.dosage.cost_per_application - 712.5).abs() < 1e-6);
        assert_eq!(calc.dosage.region, Some(RegionBucket::North));
        assert_eq!(calc.dosage.substance.as_deref(), Some("Copper Hydroxide"));
        assert_eq!(calc.safety_interval_days, Some(7));
        assert!(calc.fallback.is_none());
    }

    #[test]
    fn cost_breakdown_adds_operating_costs() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Copper Hydroxide"]),
            2.0,
            SeverityTier::Moderate,
            "Punjab",
            "sunny",
        );

        assert_eq!(calc.costs.labor, 1500.0);
        assert_eq!(calc.costs.fuel, 600.0);
        assert_eq!(calc.costs.equipment, 300.0);
        assert!((calc.costs.total - (2137.5 + 2400.0)).abs() < 1e-6);
    }

    #[test]
    fn savings_against_overuse_baseline() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Copper Hydroxide"]),
            2.0,
            SeverityTier::Moderate,
            "Punjab",
            "sunny",
        );

        assert_eq!(calc.savings.baseline_multiplier, 1.5);
        assert!((calc.savings.potential_savings - 1068.75).abs() < 1e-6);
        assert!((calc.savings.reduction_percentage - 100.0 / 3.0).abs() < 1e-6);
        assert!((calc.savings.substance_saved - 2.375).abs() < EPS);
    }

    #[test]
    fn severity_and_region_scale_cost() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Mancozeb"]),
            1.0,
            SeverityTier::Severe,
            "Mysore, Karnataka",
            "",
        );

        // 2.5 * 1.3 = 3.25 kg; 520 * 1.1 = 572 per kg
        assert!((calc.dosage.total_amount - 3.25).abs() < EPS);
        assert!((calc.dosage.unit_price - 572.0).abs() < 1e-6);
        assert!((calc.costs.substance - 1859.0).abs() < 1e-6);
        assert_eq!(calc.dosage.applications, 4);
        assert_eq!(calc.dosage.region, Some(RegionBucket::South));
    }

    #[test]
    fn healthy_is_all_zero() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Copper Hydroxide"]),
            2.0,
            SeverityTier::Healthy,
            "Punjab",
            "sunny",
        );

        assert_eq!(calc, Calculation::default());
        assert_eq!(calc.dosage.applications, 0);
        assert_eq!(calc.dosage.cost_per_application, 0.0);
        assert_eq!(calc.costs.total, 0.0);
    }

    #[test]
    fn dosage_scales_linearly_with_farm_size() {
        let (catalog, config, regions) = fixture();
        let calculator = DosageCalculator::new(&catalog, &config, &regions);
        let names = primary(&["Chlorothalonil"]);
        for severity in [SeverityTier::Mild, SeverityTier::Moderate, SeverityTier::Severe] {
            let small = calculator.calculate(&names, 1.5, severity, "Odisha", "windy");
            let large = calculator.calculate(&names, 3.0, severity, "Odisha", "windy");
            assert!((large.dosage.total_amount - 2.0 * small.dosage.total_amount).abs() < EPS);
            assert!((large.costs.substance - 2.0 * small.costs.substance).abs() < 1e-6);
            assert!((large.dosage.total_water - 2.0 * small.dosage.total_water).abs() < 1e-6);
        }
    }

    #[test]
    fn unknown_substance_falls_back() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Neem Oil", "Mancozeb"]),
            2.0,
            SeverityTier::Severe,
            "Punjab",
            "rain",
        );

        assert_eq!(
            calc.fallback,
            Some(FallbackReason::UnknownSubstance("Neem Oil".into()))
        );
        assert_eq!(calc.dosage.substance.as_deref(), Some("Copper Hydroxide"));
        assert_eq!(calc.dosage.applications, 3);
        // unadjusted base rate and price
        assert!((calc.dosage.total_amount - 5.0).abs() < EPS);
        assert!((calc.costs.substance - 2250.0).abs() < 1e-6);
        assert!((calc.dosage.cost_per_application - 750.0).abs() < 1e-6);
        assert_eq!(calc.dosage.region, None);
    }

    #[test]
    fn empty_primary_falls_back() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &[],
            1.0,
            SeverityTier::Mild,
            "",
            "",
        );
        assert_eq!(calc.fallback, Some(FallbackReason::NoPrimarySubstance));
        assert_eq!(calc.dosage.applications, 3);
    }

    #[test]
    fn substance_rates_cover_known_primaries() {
        let (catalog, config, regions) = fixture();
        let calc = DosageCalculator::new(&catalog, &config, &regions).calculate(
            &primary(&["Mancozeb", "Chlorothalonil"]),
            1.0,
            SeverityTier::Mild,
            "",
            "",
        );
        assert_eq!(calc.substance_rates.len(), 2);
        assert!((calc.substance_rates[0].dosage_per_hectare - 2.0).abs() < EPS);
        assert!((calc.substance_rates[1].dosage_per_hectare - 1.6).abs() < EPS);
    }

    #[test]
    fn instructions_mention_rate_and_water() {
        let (catalog, _, _) = fixture();
        let record = catalog.lookup("Sulfur").unwrap();
        let text = application_instructions(record, 2.4);
        assert!(text.contains("Sulfur"));
        assert!(text.contains("2.40 kg per hectare"));
        assert!(text.contains("300 litres"));
        assert!(text.contains("14-day"));
    }

    #[test]
    fn compare_sorts_by_cost_and_skips_unknown() {
        let (catalog, config, regions) = fixture();
        let rows = DosageCalculator::new(&catalog, &config, &regions).compare(
            &primary(&["Streptomycin", "Copper Hydroxide", "Neem Oil", "Mancozeb"]),
            2.0,
        );

        let order: Vec<&str> = rows.iter().map(|r| r.substance.as_str()).collect();
        // 1200 (0.5*2*1200), 2250 (2.5*2*450), 2600 (2.5*2*520)
        assert_eq!(order, vec!["Streptomycin", "Copper Hydroxide", "Mancozeb"]);
        assert!((rows[0].cost - 1200.0).abs() < 1e-6);
        assert!((rows[1].cost_per_hectare - 1125.0).abs() < 1e-6);
    }

    #[test]
    fn seasonal_estimate_for_tomato() {
        let (catalog, config, regions) = fixture();
        let estimate =
            DosageCalculator::new(&catalog, &config, &regions).seasonal("tomato", 2.0, "Punjab");

        assert_eq!(estimate.treatments_per_season, 6);
        // 2.0 kg/ha * 2 ha * 6 * 600
        assert!((estimate.substance_cost - 14400.0).abs() < 1e-6);
        assert!((estimate.labor_cost - 6000.0).abs() < 1e-6);
        assert!((estimate.fuel_cost - 2400.0).abs() < 1e-6);
        assert!((estimate.equipment_cost - 1200.0).abs() < 1e-6);
        assert!((estimate.total_cost - 24000.0).abs() < 1e-6);
        assert!((estimate.cost_per_hectare - 12000.0).abs() < 1e-6);
        assert!((estimate.monthly_average - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn seasonal_estimate_unknown_crop_uses_default_count() {
        let (catalog, config, regions) = fixture();
        let estimate =
            DosageCalculator::new(&catalog, &config, &regions).seasonal("okra", 1.0, "Kerala");
        assert_eq!(estimate.treatments_per_season, 5);
        assert_eq!(estimate.region, RegionBucket::South);
        assert!((estimate.substance_cost - 6600.0).abs() < 1e-6);
    }
}
