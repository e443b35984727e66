use common::{TrendError, TrendResult};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use sqlx::Row;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::slot::{Slot, SlotKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendEntry {
    pub key: SlotKey,
    pub raw_response: String,
    pub fetched_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct TrendStore {
    pool: SqlitePool,
}

impl TrendStore {
    pub async fn connect(database_url: &str) -> TrendResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        info!("Connected to trend store");
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> TrendResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trend_entries (
                date TEXT NOT NULL,
                slot INTEGER NOT NULL CHECK (slot IN (0, 1)),
                raw_response TEXT NOT NULL,
                fetched_at TEXT NOT NULL,
                UNIQUE (date, slot)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn exists(&self, key: &SlotKey) -> TrendResult<bool> {
        let row = sqlx::query("SELECT 1 FROM trend_entries WHERE date = ? AND slot = ? LIMIT 1")
            .bind(key.date_string())
            .bind(key.slot.as_i64())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn upsert(&self, entry: &TrendEntry) -> TrendResult<()> {
        let fetched_at = entry
            .fetched_at
            .to_offset(time::UtcOffset::UTC)
            .format(&Rfc3339)
            .map_err(|e| TrendError::Parse(format!("Invalid fetched_at: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO trend_entries (date, slot, raw_response, fetched_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(date, slot)
            DO UPDATE SET raw_response = excluded.raw_response, fetched_at = excluded.fetched_at
            "#,
        )
        .bind(entry.key.date_string())
        .bind(entry.key.slot.as_i64())
        .bind(&entry.raw_response)
        .bind(fetched_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, key: &SlotKey) -> TrendResult<Option<TrendEntry>> {
        let row = sqlx::query(
            "SELECT date, slot, raw_response, fetched_at FROM trend_entries WHERE date = ? AND slot = ?",
        )
        .bind(key.date_string())
        .bind(key.slot.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let date: String = row.try_get("date")?;
        let slot: i64 = row.try_get("slot")?;
        let fetched_at: String = row.try_get("fetched_at")?;

        let date = Date::parse(&date, time::macros::format_description!("[year]-[month]-[day]"))
            .map_err(|e| TrendError::Parse(format!("Invalid date {:?}: {}", date, e)))?;
        let slot = Slot::from_i64(slot)
            .ok_or_else(|| TrendError::Parse(format!("Invalid slot {}", slot)))?;
        let fetched_at = OffsetDateTime::parse(&fetched_at, &Rfc3339)
            .map_err(|e| TrendError::Parse(format!("Invalid fetched_at {:?}: {}", fetched_at, e)))?;

        Ok(Some(TrendEntry {
            key: SlotKey::new(date, slot),
            raw_response: row.try_get("raw_response")?,
            fetched_at,
        }))
    }

    pub async fn count(&self) -> TrendResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trend_entries")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
