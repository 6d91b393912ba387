use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::history::SummaryRecord;
use crate::pipeline::BlogDigest;

#[derive(Debug, Serialize, Deserialize)]
pub struct BlogRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BlogResponse {
    pub content: String,
    pub summary: String,
    pub urdu: String,
    pub record: HistoryEntry,
}

impl From<BlogDigest> for BlogResponse {
    fn from(digest: BlogDigest) -> Self {
        Self {
            content: digest.content,
            summary: digest.summary,
            urdu: digest.urdu,
            record: digest.record.into(),
        }
    }
}

/// Wire form of a history record, including the derived display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub urdu_translation: String,
    pub created_at: DateTime<Utc>,
    pub word_count: usize,
}

impl From<SummaryRecord> for HistoryEntry {
    fn from(record: SummaryRecord) -> Self {
        Self {
            title: record.title(),
            word_count: record.word_count(),
            id: record.id,
            url: record.url,
            summary: record.summary,
            urdu_translation: record.urdu_translation,
            created_at: record.created_at,
        }
    }
}

impl From<HistoryEntry> for SummaryRecord {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            url: entry.url,
            summary: entry.summary,
            urdu_translation: entry.urdu_translation,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlogRequest {
    pub url: String,
    pub full_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveBlogResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
