//! Built-in reference data: substances and curated disease profiles for
//! tomato, brinjal and capsicum.

use crate::models::{DiseaseProfile, EffectivenessRank, SubstanceRecord};

pub fn substances() -> Vec<SubstanceRecord> {
    use EffectivenessRank::*;

    // name, price/kg, kg/ha, litres water per kg, pre-harvest days, rank
    let rows: &[(&str, f64, f64, f64, u32, EffectivenessRank)] = &[
        ("Copper Hydroxide", 450.0, 2.5, 500.0, 7, Medium),
        ("Streptomycin", 1200.0, 0.5, 800.0, 7, High),
        ("Mancozeb", 520.0, 2.5, 400.0, 14, Medium),
        ("Chlorothalonil", 680.0, 2.0, 500.0, 14, MediumHigh),
        ("Metalaxyl", 950.0, 1.5, 600.0, 21, High),
        ("Copper Sulfate", 380.0, 3.0, 400.0, 7, MediumLow),
        ("Carbendazim", 850.0, 1.0, 600.0, 14, Medium),
        ("Propiconazole", 1500.0, 0.5, 800.0, 14, High),
        ("Sulfur", 200.0, 3.0, 300.0, 14, MediumLow),
        ("Cymoxanil", 1200.0, 0.5, 700.0, 21, Medium),
        ("Fosetyl-Al", 780.0, 2.5, 500.0, 21, Medium),
        ("Triadimefon", 2000.0, 0.25, 1000.0, 14, Medium),
        ("Metalaxyl + Mancozeb", 850.0, 2.0, 500.0, 21, Medium),
        ("Bleaching Powder", 150.0, 10.0, 100.0, 14, Medium),
    ];

    rows.iter()
        .map(|(name, price, dosage, water, safety, rank)| {
            SubstanceRecord::new(*name, *price, *dosage, *water, *safety, *rank)
        })
        .collect()
}

/// Used when no curated profile exists for the requested pair.
pub fn default_profile() -> DiseaseProfile {
    DiseaseProfile::new("generic", "Unidentified disease")
        .with_primary(&["Copper Hydroxide", "Mancozeb"])
        .with_alternatives(&["Chlorothalonil"])
        .with_frequency("Every 10-14 days")
        .with_prevention(&[
            "Regular field monitoring",
            "Maintain plant hygiene",
            "Proper irrigation management",
            "Use disease-free planting material",
        ])
}

pub fn profiles() -> Vec<DiseaseProfile> {
    let mut profiles = Vec::new();
    profiles.extend(tomato());
    profiles.extend(brinjal());
    profiles.extend(capsicum());
    profiles
}

fn healthy(crop: &str, tips: &[&str]) -> DiseaseProfile {
    DiseaseProfile::new(crop, "Healthy")
        .with_symptoms(&["Green healthy foliage", "No visible damage"])
        .with_method("Preventive measures only")
        .with_frequency("Not required")
        .with_prevention(tips)
}

fn tomato() -> Vec<DiseaseProfile> {
    vec![
        DiseaseProfile::new("tomato", "Bacterial_spot")
            .with_symptoms(&["Dark spots on leaves", "Yellow halos around spots"])
            .with_primary(&["Copper Hydroxide", "Streptomycin"])
            .with_alternatives(&["Copper Sulfate", "Mancozeb"])
            .with_frequency("Every 7-10 days")
            .with_prevention(&[
                "Use disease-free seeds",
                "Avoid overhead irrigation",
                "Maintain proper plant spacing",
                "Remove infected plant debris",
            ]),
        DiseaseProfile::new("tomato", "Early_blight")
            .with_symptoms(&["Concentric rings on leaves", "Brown lesions"])
            .with_primary(&["Mancozeb", "Chlorothalonil"])
            .with_alternatives(&["Copper Hydroxide", "Metalaxyl"])
            .with_frequency("Every 10-14 days")
            .with_prevention(&[
                "Crop rotation",
                "Remove lower leaves touching soil",
                "Improve air circulation",
                "Avoid water stress",
            ]),
        DiseaseProfile::new("tomato", "Late_blight")
            .with_symptoms(&["Water-soaked lesions", "White fuzzy growth"])
            .with_primary(&["Metalaxyl + Mancozeb", "Cymoxanil"])
            .with_alternatives(&["Copper Hydroxide", "Fosetyl-Al"])
            .with_frequency("Every 5-7 days during outbreak")
            .with_prevention(&[
                "Monitor weather conditions",
                "Use resistant varieties",
                "Ensure good drainage",
                "Apply preventive sprays",
            ]),
        DiseaseProfile::new("tomato", "Leaf_Mold")
            .with_symptoms(&[
                "Yellow spots on upper leaf surface",
                "Fuzzy growth underneath",
            ])
            .with_primary(&["Chlorothalonil", "Mancozeb"])
            .with_alternatives(&["Copper Hydroxide", "Propiconazole"])
            .with_frequency("Every 10-14 days")
            .with_prevention(&[
                "Improve greenhouse ventilation",
                "Reduce humidity",
                "Avoid overhead watering",
                "Remove infected leaves",
            ]),
        healthy(
            "tomato",
            &[
                "Maintain good plant hygiene",
                "Regular monitoring",
                "Proper nutrition",
                "Adequate spacing",
            ],
        ),
    ]
}

fn brinjal() -> Vec<DiseaseProfile> {
    vec![
        DiseaseProfile::new("brinjal", "Bacterial_wilt")
            .with_symptoms(&["Wilting of leaves", "Brown vascular discoloration"])
            .with_primary(&["Streptomycin", "Copper Hydroxide"])
            .with_alternatives(&["Copper Sulfate", "Bleaching Powder"])
            .with_method("Soil drench and foliar spray")
            .with_frequency("Every 15 days")
            .with_prevention(&[
                "Use resistant varieties",
                "Soil solarization",
                "Crop rotation",
                "Avoid waterlogging",
            ]),
        DiseaseProfile::new("brinjal", "Cercospora_leaf_spot")
            .with_symptoms(&["Circular brown spots", "Yellow halos"])
            .with_primary(&["Mancozeb", "Chlorothalonil"])
            .with_alternatives(&["Copper Hydroxide", "Carbendazim"])
            .with_frequency("Every 10-14 days")
            .with_prevention(&[
                "Remove infected leaves",
                "Improve air circulation",
                "Avoid overhead irrigation",
                "Use clean seeds",
            ]),
        healthy(
            "brinjal",
            &[
                "Regular field inspection",
                "Proper fertilization",
                "Weed management",
                "Integrated pest management",
            ],
        ),
    ]
}

fn capsicum() -> Vec<DiseaseProfile> {
    vec![
        DiseaseProfile::new("capsicum", "Bacterial_spot")
            .with_symptoms(&["Dark spots on leaves and fruits", "Raised lesions"])
            .with_primary(&["Copper Hydroxide", "Streptomycin"])
            .with_alternatives(&["Copper Sulfate", "Mancozeb"])
            .with_frequency("Every 7-10 days")
            .with_prevention(&[
                "Use certified seeds",
                "Avoid water splash",
                "Sanitize tools",
                "Remove plant debris",
            ]),
        DiseaseProfile::new("capsicum", "Powdery_mildew")
            .with_symptoms(&["White powdery coating", "Leaf distortion"])
            .with_primary(&["Sulfur", "Propiconazole"])
            .with_alternatives(&["Carbendazim", "Triadimefon"])
            .with_frequency("Every 10-14 days")
            .with_prevention(&[
                "Ensure good air circulation",
                "Avoid excessive nitrogen",
                "Monitor humidity levels",
                "Use resistant varieties",
            ]),
        DiseaseProfile::new("capsicum", "Anthracnose")
            .with_symptoms(&["Sunken lesions on fruits", "Dark spots with pink centers"])
            .with_primary(&["Mancozeb", "Chlorothalonil"])
            .with_alternatives(&["Copper Hydroxide", "Carbendazim"])
            .with_frequency("Every 10-14 days")
            .with_prevention(&[
                "Harvest fruits at proper maturity",
                "Handle fruits carefully",
                "Maintain field sanitation",
                "Store in proper conditions",
            ]),
        healthy(
            "capsicum",
            &[
                "Regular monitoring",
                "Balanced nutrition",
                "Proper irrigation",
                "Pest management",
            ],
        ),
    ]
}
