use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use crate::error::{AppError, Result};

/// Full-text snapshot of a blog, kept apart from the summary history.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedBlog {
    pub id: i64,
    pub url: String,
    pub full_text: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait BlogArchive: Send + Sync {
    /// Stores the snapshot and returns its id.
    async fn save(&self, url: &str, full_text: &str) -> Result<i64>;
}

#[derive(Default)]
pub struct MemoryBlogArchive {
    blogs: Mutex<Vec<ArchivedBlog>>,
}

impl MemoryBlogArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Result<Vec<ArchivedBlog>> {
        let blogs = self.blogs.lock().map_err(|_| poisoned())?;
        Ok(blogs.clone())
    }
}

#[async_trait]
impl BlogArchive for MemoryBlogArchive {
    async fn save(&self, url: &str, full_text: &str) -> Result<i64> {
        let mut blogs = self
            .blogs
            .lock()
            .map_err(|_| poisoned())?;
        let id = blogs.last().map_or(1, |last| last.id + 1);
        blogs.push(ArchivedBlog {
            id,
            url: url.to_string(),
            full_text: full_text.to_string(),
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

fn poisoned() -> AppError {
    AppError::Persistence("archive lock poisoned".to_string())
}
