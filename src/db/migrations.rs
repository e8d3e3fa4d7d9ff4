use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Plan history
    r#"
    CREATE TABLE IF NOT EXISTS treatment_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        crop_type TEXT NOT NULL,
        disease_name TEXT NOT NULL,
        severity TEXT NOT NULL,
        confidence REAL,
        farm_size_hectares REAL NOT NULL,
        location TEXT,
        weather TEXT,
        substance TEXT,
        total_amount REAL NOT NULL,
        total_cost REAL NOT NULL,
        fallback INTEGER NOT NULL DEFAULT 0,
        plan_json TEXT NOT NULL,
        recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_treatment_history_recorded_at
        ON treatment_history(recorded_at);
    CREATE INDEX IF NOT EXISTS idx_treatment_history_crop_disease
        ON treatment_history(crop_type, disease_name);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;

        // Apply pending migrations
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}
