use crate::db::Database;
use crate::error::Result;
use crate::models::{PlanRecord, SeverityTier, TreatmentPlan, TreatmentRequest};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use tracing::warn;

// Plan history is append-only: no update or delete queries.

impl Database {
    pub fn record_plan(&self, request: &TreatmentRequest, plan: &TreatmentPlan) -> Result<i64> {
        let plan_json = serde_json::to_string(plan)?;

        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO treatment_history
                    (crop_type, disease_name, severity, confidence, farm_size_hectares,
                     location, weather, substance, total_amount, total_cost, fallback,
                     plan_json, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    plan.crop_type,
                    plan.disease_name,
                    plan.severity.as_str(),
                    plan.confidence,
                    plan.farm_size_hectares,
                    request.location,
                    request.weather,
                    plan.dosage.substance,
                    plan.dosage.total_amount,
                    plan.costs.total,
                    plan.is_fallback(),
                    plan_json,
                    Utc::now().to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Most recent plans first.
    pub fn recent_plans(&self, limit: usize) -> Result<Vec<PlanRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT * FROM treatment_history ORDER BY id DESC LIMIT ?1",
            )?;
            let records = stmt
                .query_map([limit as i64], row_to_plan_record)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    pub fn get_plan(&self, id: i64) -> Result<Option<PlanRecord>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM treatment_history WHERE id = ?1",
                [id],
                row_to_plan_record,
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

fn row_to_plan_record(row: &Row) -> rusqlite::Result<PlanRecord> {
    let severity_str: String = row.get("severity")?;
    let recorded_at_str: String = row.get("recorded_at")?;

    let severity = SeverityTier::from_str(&severity_str).unwrap_or_else(|| {
        warn!(
            severity = %severity_str,
            "Unknown severity in database, defaulting to Moderate"
        );
        SeverityTier::Moderate
    });

    Ok(PlanRecord {
        id: row.get("id")?,
        crop_type: row.get("crop_type")?,
        disease_name: row.get("disease_name")?,
        severity,
        confidence: row.get("confidence")?,
        farm_size_hectares: row.get("farm_size_hectares")?,
        location: row.get("location")?,
        weather: row.get("weather")?,
        substance: row.get("substance")?,
        total_amount: row.get("total_amount")?,
        total_cost: row.get("total_cost")?,
        fallback: row.get("fallback")?,
        plan_json: row.get("plan_json")?,
        recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
