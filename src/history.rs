use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use crate::error::{AppError, Result};

/// One stored summarization result. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub id: i64,
    pub url: String,
    pub summary: String,
    pub urdu_translation: String,
    pub created_at: DateTime<Utc>,
}

impl SummaryRecord {
    pub fn title(&self) -> String {
        format!("Blog Summary - {}", self.created_at.format("%Y-%m-%d"))
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.summary)
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// A record before the store assigns its id.
#[derive(Debug, Clone)]
pub struct NewSummary {
    pub url: String,
    pub summary: String,
    pub urdu_translation: String,
    pub created_at: DateTime<Utc>,
}

impl NewSummary {
    fn into_record(self, id: i64) -> SummaryRecord {
        SummaryRecord {
            id,
            url: self.url,
            summary: self.summary,
            urdu_translation: self.urdu_translation,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<SummaryRecord>>;

    async fn insert(&self, entry: NewSummary) -> Result<SummaryRecord>;

    /// Removes the record if present; absent ids are not an error.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Removes every listed record in one operation, returning how many existed.
    async fn delete_many(&self, ids: &[i64]) -> Result<u64>;
}

/// Newest first; ids break ties so equal timestamps still list deterministically.
pub fn sort_newest_first(records: &mut [SummaryRecord]) {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    records: Vec<SummaryRecord>,
}

/// Process-local history used when no database is configured.
#[derive(Default)]
pub struct MemoryHistoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Persistence("history lock poisoned".to_string()))
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn list(&self) -> Result<Vec<SummaryRecord>> {
        let mut records = self.lock()?.records.clone();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn insert(&self, entry: NewSummary) -> Result<SummaryRecord> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let record = entry.into_record(inner.next_id);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.lock()?.records.retain(|record| record.id != id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[i64]) -> Result<u64> {
        let mut inner = self.lock()?;
        let before = inner.records.len();
        inner.records.retain(|record| !ids.contains(&record.id));
        Ok((before - inner.records.len()) as u64)
    }
}
