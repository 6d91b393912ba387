//! Client-side orchestration: the submit state machine plus the current
//! selection and the history list shown next to it.
//!
//! A request moves `Idle -> Submitting -> Idle`. Submitting again while a
//! request is outstanding does nothing. Failures are logged and otherwise
//! leave the workbench exactly as it was before the submit.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::client::{BlogBackend, ClientError};
use crate::history::SummaryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Proof that a submit was accepted; hand it back to [`Workbench::finish_submit`].
#[derive(Debug)]
#[must_use]
pub struct Submission {
    url: String,
}

impl Submission {
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug)]
pub struct Workbench {
    phase: Phase,
    input: String,
    current: Option<SummaryRecord>,
    history: Vec<SummaryRecord>,
    expanded: HashSet<i64>,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbench {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            input: String::new(),
            current: None,
            history: Vec::new(),
            expanded: HashSet::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, url: impl Into<String>) {
        self.input = url.into();
    }

    pub fn current(&self) -> Option<&SummaryRecord> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[SummaryRecord] {
        &self.history
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle && !self.input.trim().is_empty()
    }

    /// Moves to `Submitting` for the current input, or returns `None` when a
    /// request is already outstanding or the input is blank.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        self.phase = Phase::Submitting;
        Some(Submission {
            url: self.input.trim().to_string(),
        })
    }

    pub fn finish_submit(
        &mut self,
        submission: Submission,
        outcome: Result<SummaryRecord, ClientError>,
    ) {
        self.phase = Phase::Idle;
        match outcome {
            Ok(record) => {
                info!(id = record.id, url = %submission.url, "summary ready");
                self.history.insert(0, record.clone());
                self.current = Some(record);
                self.input.clear();
            }
            Err(err) => warn!(url = %submission.url, error = %err, "summarize failed"),
        }
    }

    /// Submits the current input through `backend`. Returns whether a request
    /// was actually sent.
    pub async fn submit<B>(&mut self, backend: &B) -> bool
    where
        B: BlogBackend + ?Sized,
    {
        let Some(submission) = self.begin_submit() else {
            return false;
        };
        let outcome = backend.summarize(submission.url()).await;
        self.finish_submit(submission, outcome);
        true
    }

    /// Replaces the local history with the backend's.
    pub async fn refresh<B>(&mut self, backend: &B)
    where
        B: BlogBackend + ?Sized,
    {
        match backend.history().await {
            Ok(records) => {
                self.expanded.retain(|id| records.iter().any(|r| r.id == *id));
                let stale = self
                    .current
                    .as_ref()
                    .is_some_and(|c| !records.iter().any(|r| r.id == c.id));
                if stale {
                    self.current = None;
                }
                self.history = records;
            }
            Err(err) => warn!(error = %err, "loading history failed"),
        }
    }

    pub fn select(&mut self, id: i64) -> bool {
        match self.history.iter().find(|r| r.id == id) {
            Some(record) => {
                self.current = Some(record.clone());
                true
            }
            None => false,
        }
    }

    pub fn toggle_expanded(&mut self, id: i64) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: i64) -> bool {
        self.expanded.contains(&id)
    }

    pub async fn delete<B>(&mut self, backend: &B, id: i64)
    where
        B: BlogBackend + ?Sized,
    {
        match backend.delete(id).await {
            Ok(()) => self.forget(&[id]),
            Err(err) => warn!(id, error = %err, "delete failed"),
        }
    }

    /// Deletes every listed entry with a single bulk call.
    pub async fn clear_all<B>(&mut self, backend: &B)
    where
        B: BlogBackend + ?Sized,
    {
        let ids: Vec<i64> = self.history.iter().map(|r| r.id).collect();
        if ids.is_empty() {
            return;
        }
        match backend.delete_many(&ids).await {
            Ok(deleted) => {
                info!(deleted, "history cleared");
                self.forget(&ids);
            }
            Err(err) => warn!(error = %err, "clearing history failed"),
        }
    }

    fn forget(&mut self, ids: &[i64]) {
        self.history.retain(|r| !ids.contains(&r.id));
        for id in ids {
            self.expanded.remove(id);
        }
        if self.current.as_ref().is_some_and(|c| ids.contains(&c.id)) {
            self.current = None;
        }
    }
}
