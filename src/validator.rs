//! Validation and sanitization of raw AI classification output.
//!
//! The classifier collaborator returns loosely structured JSON: fields can
//! be absent, null, or of the wrong type, and category keys can be ones we
//! have never heard of. Every access here is defended; the only fatal
//! shape problem is a missing or non-array `categories` field.

use serde_json::Value;
use tracing::warn;

use crate::error::{Result, TriageError};
use crate::models::{CalendarHints, Quadrant, SanitizedClassification, TaskPriority, TaskRequest};
use crate::policy::PolicySet;

/// Validates raw classification records against the category policy table
pub struct ClassificationValidator<'a> {
    policy: &'a PolicySet,
}

impl<'a> ClassificationValidator<'a> {
    pub fn new(policy: &'a PolicySet) -> Self {
        Self { policy }
    }

    /// Validate and sanitize a raw classification.
    ///
    /// Unknown category keys are filtered with a warning; missing optional
    /// fields degrade to absent/false/empty. The returned record carries a
    /// placeholder quadrant until the resolver assigns the real one.
    pub fn validate(&self, raw: &Value) -> Result<SanitizedClassification> {
        let raw_categories = raw
            .get("categories")
            .and_then(Value::as_array)
            .ok_or(TriageError::MissingCategories)?;

        let mut categories = Vec::with_capacity(raw_categories.len());
        let mut dropped = Vec::new();
        for entry in raw_categories {
            match entry.as_str() {
                Some(name) if self.policy.has_category(name) => {
                    categories.push(name.to_string());
                }
                Some(name) => dropped.push(name.to_string()),
                None => dropped.push(entry.to_string()),
            }
        }
        if !dropped.is_empty() {
            warn!(
                dropped = ?dropped,
                kept = categories.len(),
                "classification contained unknown categories, filtered"
            );
        }

        Ok(SanitizedClassification {
            categories,
            confidence: raw.get("confidence").and_then(Value::as_f64).unwrap_or(0.0),
            is_spam_or_junk: bool_field(raw, "is_spam_or_junk"),
            is_self_sent: bool_field(raw, "is_self_sent"),
            action_needed: bool_field(raw, "action_needed"),
            deadline: string_field(raw, "deadline"),
            estimated_time: string_field(raw, "estimated_time"),
            summary: raw
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            ai_urgent: bool_field(raw, "ai_urgent"),
            ai_important: bool_field(raw, "ai_important"),
            calendar: calendar_hints(raw.get("calendar_scheduling")),
            task: task_request(raw.get("task_creation")),
            // Placeholder; the quadrant resolver assigns the real value
            quadrant: Quadrant::NotUrgentNotImportant,
        })
    }
}

fn bool_field(raw: &Value, key: &str) -> bool {
    raw.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Optional string field; null, missing, wrong-typed, and empty all
/// collapse to None so downstream code has a single absence check.
fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn calendar_hints(value: Option<&Value>) -> Option<CalendarHints> {
    let obj = value.filter(|v| v.is_object())?;
    Some(CalendarHints {
        suggested_time: string_field(obj, "suggested_time"),
        is_ai_suggested: bool_field(obj, "is_ai_suggested"),
        ignore_event_creation: bool_field(obj, "ignore_calendar_event_creation"),
    })
}

fn task_request(value: Option<&Value>) -> Option<TaskRequest> {
    let obj = value.filter(|v| v.is_object())?;
    Some(TaskRequest {
        should_create: bool_field(obj, "should_create_task"),
        title: obj
            .get("task_title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        notes: obj
            .get("task_notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        due_date: string_field(obj, "task_due_date"),
        priority: obj
            .get("task_priority")
            .and_then(Value::as_str)
            .map(TaskPriority::parse)
            .unwrap_or_default(),
    })
}
