//! The classification-to-action decision engine.
//!
//! Converts a sanitized classification into label, trash, archive,
//! calendar, and task side effects against a single mail thread. The
//! decision tree runs in a fixed order; the spam short-circuit is the only
//! early return. Non-essential side effects (calendar events, tasks) are
//! logged and swallowed on failure; essential ones (labels, trash,
//! archive) propagate to the caller.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::colors;
use crate::config::{EngineConfig, LabelConfig};
use crate::error::Result;
use crate::models::{Quadrant, SanitizedClassification};
use crate::policy::PolicySet;
use crate::store::{CalendarStore, MailThread, NewTask, TaskStore};
use crate::timeparse;

pub struct ActionEngine {
    policy: Arc<PolicySet>,
    labels: LabelConfig,
    config: EngineConfig,
    calendar: Box<dyn CalendarStore>,
    tasks: Box<dyn TaskStore>,
}

impl ActionEngine {
    pub fn new(
        policy: Arc<PolicySet>,
        labels: LabelConfig,
        config: EngineConfig,
        calendar: Box<dyn CalendarStore>,
        tasks: Box<dyn TaskStore>,
    ) -> Self {
        Self {
            policy,
            labels,
            config,
            calendar,
            tasks,
        }
    }

    /// Apply the full decision tree for one classified email.
    ///
    /// Safe to re-run: label addition is set-union in the mail store. The
    /// one non-idempotent edge is calendar event creation, which has no
    /// dedup key and would produce a second event.
    pub async fn apply(
        &self,
        thread: &dyn MailThread,
        classification: &SanitizedClassification,
    ) -> Result<()> {
        self.apply_at(thread, classification, Utc::now()).await
    }

    /// [`apply`] with an explicit clock, used by tests and replays
    pub async fn apply_at(
        &self,
        thread: &dyn MailThread,
        classification: &SanitizedClassification,
        now: DateTime<Utc>,
    ) -> Result<()> {
        // 1. Spam short-circuit: label, trash, and nothing else. Junk must
        // never reach the quadrant logic or the calendar/task stores.
        let spam_categories: Vec<&String> = classification
            .categories
            .iter()
            .filter(|c| self.policy.is_spam_category(c))
            .collect();
        if classification.is_spam_or_junk || !spam_categories.is_empty() {
            for name in spam_categories {
                if let Some(policy) = self.policy.category(name) {
                    thread.add_label(&policy.display_name).await?;
                }
            }
            thread.move_to_trash().await?;
            info!(subject = %thread.subject(), "spam short-circuit, moved to trash");
            return Ok(());
        }

        // 2. Self-sent mail carrying a task request becomes a task
        if classification.is_self_sent {
            if let Some(task) = &classification.task {
                if task.should_create {
                    self.create_task(thread, classification, now).await;
                }
            }
        }

        // 3. Category labels, honouring per-category trash policy
        for name in &classification.categories {
            match self.policy.category(name) {
                Some(policy) => {
                    thread.add_label(&policy.display_name).await?;
                    if policy.move_to_trash {
                        thread.move_to_trash().await?;
                    }
                }
                None => {
                    warn!(category = name.as_str(), "unknown category at action time, skipping");
                }
            }
        }

        // 4. Quadrant label and per-quadrant priority actions
        let quadrant = classification.quadrant;
        let quadrant_policy = self.policy.quadrant(quadrant);
        thread.add_label(&quadrant_policy.display_name).await?;
        // Styling is cosmetic; a color API failure must not stop triage
        if let Err(e) = thread
            .set_label_color(
                &quadrant_policy.display_name,
                &colors::resolve(&quadrant_policy.color),
            )
            .await
        {
            warn!(error = %e, label = quadrant_policy.display_name.as_str(), "failed to style quadrant label");
        }

        match quadrant {
            Quadrant::UrgentImportant => {
                thread.mark_important().await?;
                self.schedule_reminder(thread, classification, now).await;
            }
            Quadrant::NotUrgentImportant => {
                thread.mark_important().await?;
                thread.add_label(&self.labels.to_plan).await?;
            }
            Quadrant::UrgentNotImportant => {
                thread.add_label(&self.labels.delegate).await?;
            }
            Quadrant::NotUrgentNotImportant => {
                // Spam-class categories never reach this point; everything
                // else low-priority parks under the someday label
                thread.add_label(&self.labels.someday).await?;
            }
        }

        if !quadrant_policy.keep_in_inbox {
            thread.move_to_archive().await?;
        }

        // 5. Supplementary labels
        if classification.action_needed {
            thread.add_label(&self.labels.requires_action).await?;
        }
        if classification.deadline.is_some() {
            thread.add_label(&self.labels.has_deadline).await?;
        }

        Ok(())
    }

    /// Create a calendar reminder for an urgent+important email.
    ///
    /// Skipped when the mail is itself a calendar notification
    /// (`ignore_event_creation`). Collaborator failures are logged and
    /// swallowed; a lost reminder must never roll back label application.
    async fn schedule_reminder(
        &self,
        thread: &dyn MailThread,
        classification: &SanitizedClassification,
        now: DateTime<Utc>,
    ) {
        let hints = classification.calendar.as_ref();

        if hints.map(|h| h.ignore_event_creation).unwrap_or(false) {
            debug!(subject = %thread.subject(), "mail is a calendar notification, skipping event");
            return;
        }

        let start = match hints.and_then(|h| {
            if h.is_ai_suggested {
                h.suggested_time.as_deref()
            } else {
                None
            }
        }) {
            Some(suggested) => timeparse::parse_scheduled_time(suggested, now),
            None => now + Duration::minutes(self.config.default_event_offset_minutes),
        };
        let end = start + timeparse::parse_duration(classification.estimated_time.as_deref());

        let title = format!("Follow up: {}", thread.subject());
        let description = format!(
            "{}\n\n{}",
            classification.summary,
            thread.permalink()
        );

        match self.calendar.create_event(&title, start, end, &description).await {
            Ok(event_id) => {
                info!(event_id = event_id.as_str(), %start, "created calendar reminder");
                if let Err(e) = self
                    .calendar
                    .add_popup_reminder(&event_id, self.config.reminder_minutes_before)
                    .await
                {
                    warn!(error = %e, "failed to attach popup reminder");
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to create calendar reminder");
            }
        }
    }

    /// Create a task from a self-sent email. Failure is logged, not fatal.
    async fn create_task(
        &self,
        thread: &dyn MailThread,
        classification: &SanitizedClassification,
        now: DateTime<Utc>,
    ) {
        let request = match &classification.task {
            Some(t) => t,
            None => return,
        };

        let title = if request.title.is_empty() {
            thread.subject()
        } else {
            request.title.clone()
        };
        let task = NewTask {
            title,
            notes: request.notes.clone(),
            due: timeparse::parse_due_date(request.due_date.as_deref(), now),
            priority_rank: request.priority.rank(),
        };

        match self.tasks.create_task(&task).await {
            Ok(task_id) => info!(task_id = task_id.as_str(), "created task from self-sent email"),
            Err(e) => warn!(error = %e, "failed to create task"),
        }
    }
}
