//! Collaborator interfaces the triage core calls into.
//!
//! The mail store, AI classifier, calendar, task list, and statistics
//! persistence all live outside this crate; the core only sees these
//! traits. Each call is blocking from the pipeline's point of view: one
//! email's side effects complete before the next email starts, because
//! label/trash/archive operations on a shared mail store are not assumed
//! safe to interleave.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::colors::LabelColor;
use crate::error::Result;
use crate::models::EmailData;
use crate::stats::SessionStatistics;

/// Capability handle for a single mail thread.
///
/// Label addition is a set-union operation in the mail store: re-adding an
/// existing label is a no-op, which is what makes the action engine safe
/// to re-run.
#[async_trait]
pub trait MailThread: Send + Sync {
    fn subject(&self) -> String;
    fn permalink(&self) -> String;

    /// Add a label by key, creating it in the store if needed
    async fn add_label(&self, label_key: &str) -> Result<()>;

    /// Style a label with a palette display pair. Stores without label
    /// styling keep the default no-op.
    async fn set_label_color(&self, _label_key: &str, _color: &LabelColor) -> Result<()> {
        Ok(())
    }

    async fn move_to_trash(&self) -> Result<()>;
    async fn move_to_archive(&self) -> Result<()>;
    async fn mark_important(&self) -> Result<()>;
}

/// Black-box AI classification call.
///
/// `Ok(None)` means the classifier had nothing usable to say; the caller
/// decides the fallback (manual-review label), not the core.
#[async_trait]
pub trait AiClassifier: Send + Sync {
    async fn classify(&self, email: &EmailData) -> Result<Option<Value>>;
}

/// Calendar event creation collaborator
#[async_trait]
pub trait CalendarStore: Send + Sync {
    /// Create an event and return its id
    async fn create_event(
        &self,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        description: &str,
    ) -> Result<String>;

    async fn add_popup_reminder(&self, event_id: &str, minutes_before: i64) -> Result<()>;
}

/// Task to be created in the task store
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub notes: String,
    pub due: Option<NaiveDate>,
    /// Opaque rank per the task store's contract (1 = highest)
    pub priority_rank: u8,
}

/// Task creation collaborator
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Create a task and return its id
    async fn create_task(&self, task: &NewTask) -> Result<String>;
}

/// Persistence for the cross-invocation statistics tally
#[async_trait]
pub trait StatisticsStore: Send + Sync {
    async fn load(&self) -> Result<SessionStatistics>;
    async fn save(&self, stats: &SessionStatistics) -> Result<()>;
}
