use super::SeverityTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored treatment plan, as returned by the history queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRecord {
    pub id: i64,
    pub crop_type: String,
    pub disease_name: String,
    pub severity: SeverityTier,
    pub confidence: Option<f64>,
    pub farm_size_hectares: f64,
    pub location: Option<String>,
    pub weather: Option<String>,
    pub substance: Option<String>,
    pub total_amount: f64,
    pub total_cost: f64,
    pub fallback: bool,
    pub plan_json: String,
    pub recorded_at: DateTime<Utc>,
}
