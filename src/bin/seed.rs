//! Seed script: imports legacy JSON exports into a fresh database.
//!
//! Usage: `cargo run --bin seed [DIR]`
//!
//! Reads `User.json`, `Sensor.json` and `Measure.json` from `DIR` (falls back
//! to `SEED_DIR`, then `resources/seed`). Requires `DATABASE_URL` (reads .env).
//! Existing documents are replaced.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use fleetdash::models::creation_date;
use fleetdash::models::document::Collection;
use fleetdash::models::record_id;
use fleetdash::services::documents;
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

/// Export file holding each collection.
fn export_file(collection: Collection) -> &'static str {
    match collection {
        Collection::Users => "User.json",
        Collection::Sensors => "Sensor.json",
        Collection::Measures => "Measure.json",
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let dir: PathBuf = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SEED_DIR").ok())
        .unwrap_or_else(|| "resources/seed".to_string())
        .into();

    let db_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = fleetdash::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    fleetdash::db::run_migrations(&pool).await?;

    println!("=== fleetdash seed: importing from {} ===", dir.display());

    let mut batches = Vec::new();
    for collection in Collection::ALL {
        let records = read_export(&dir.join(export_file(collection)))?;
        batches.push((collection, records));
    }

    replace_all(&pool, &batches).await?;

    println!("\n=== Seed complete! ===");
    for collection in Collection::ALL {
        let total = documents::count(&pool, collection).await?;
        println!("{:<10} {total}", format!("{}:", collection.label()));
    }

    Ok(())
}

/// A record ready for insertion.
struct SeedRecord {
    id: String,
    doc: Map<String, Value>,
    created_at: DateTime<Utc>,
}

/// Read one export file into insertable records.
fn read_export(path: &Path) -> anyhow::Result<Vec<SeedRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_export(&raw, &path.display().to_string())
}

/// Parse an export body. Entries that are not objects and repeated ids are
/// skipped; the first occurrence of an id wins.
fn parse_export(raw: &str, source: &str) -> anyhow::Result<Vec<SeedRecord>> {
    let values: Vec<Value> =
        serde_json::from_str(raw).with_context(|| format!("{source} is not a JSON array"))?;

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let Value::Object(mut doc) = value else {
            println!("[skip] {source} entry {index} is not an object");
            continue;
        };

        let id = doc
            .remove("_id")
            .and_then(|v| record_id::normalize(&v))
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        if !seen.insert(id.clone()) {
            println!("[skip] {source} entry {index} repeats id {id}");
            continue;
        }

        unwrap_date_envelope(&mut doc);
        let created_at = doc
            .get("creationDate")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now);

        records.push(SeedRecord { id, doc, created_at });
    }

    Ok(records)
}

/// Exports may carry `{"$date": "..."}` instead of a plain date string.
fn unwrap_date_envelope(doc: &mut Map<String, Value>) {
    let inner = doc
        .get("creationDate")
        .and_then(|v| v.get("$date"))
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(raw) = inner {
        doc.insert("creationDate".to_string(), Value::String(raw));
    }
}

/// Full timestamp when one is present, else midnight of the calendar date.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            creation_date::parse_any(raw)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// Clear the collections and insert every batch in one transaction.
async fn replace_all(
    pool: &PgPool,
    batches: &[(Collection, Vec<SeedRecord>)],
) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;

    for (collection, _) in batches {
        sqlx::query(&format!("DELETE FROM {}", collection.table()))
            .execute(&mut *tx)
            .await?;
    }
    println!("[done] Cleared existing documents");

    for (collection, records) in batches {
        let mut inserted = 0u64;
        for record in records {
            inserted += sqlx::query(&format!(
                "INSERT INTO {} (id, doc, created_at, updated_at) VALUES ($1, $2, $3, $3)",
                collection.table()
            ))
            .bind(&record.id)
            .bind(Value::Object(record.doc.clone()))
            .bind(record.created_at)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
        println!("[done] Imported {inserted} {} documents", collection.table());
    }

    tx.commit().await?;
    Ok(())
}
