//! PostgreSQL-backed implementations of the history and archive stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use crate::archive::BlogArchive;
use crate::error::Result;
use crate::history::{HistoryStore, NewSummary, SummaryRecord};

pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    url: String,
    summary: String,
    urdu_translation: String,
    created_at: DateTime<Utc>,
}

impl SummaryRow {
    fn into_domain(self) -> SummaryRecord {
        SummaryRecord {
            id: self.id,
            url: self.url,
            summary: self.summary,
            urdu_translation: self.urdu_translation,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn list(&self) -> Result<Vec<SummaryRecord>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT id, url, summary, urdu_translation, created_at FROM summaries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SummaryRow::into_domain).collect())
    }

    async fn insert(&self, entry: NewSummary) -> Result<SummaryRecord> {
        let row = sqlx::query_as::<_, SummaryRow>(
            r#"
            INSERT INTO summaries (url, summary, urdu_translation, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, url, summary, urdu_translation, created_at
            "#,
        )
        .bind(&entry.url)
        .bind(&entry.summary)
        .bind(&entry.urdu_translation)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_domain())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM summaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM summaries WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[derive(Clone)]
pub struct PgBlogArchive {
    pool: PgPool,
}

impl PgBlogArchive {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogArchive for PgBlogArchive {
    async fn save(&self, url: &str, full_text: &str) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO blogs (url, full_text, created_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(url)
        .bind(full_text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}
