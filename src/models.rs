use serde::{Deserialize, Serialize};

/// Read-only email fields handed to the AI collaborator and used for
/// event/task titling. The engine never inspects mail content beyond this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailData {
    pub subject: String,
    pub sender: String,
    pub to: String,
    pub from: String,
    pub body: String,
}

impl EmailData {
    /// Self-sent detection: sender and recipient address are identical.
    /// Used as a personal-reminder signal, not a spam signal.
    pub fn is_self_sent(&self) -> bool {
        !self.from.is_empty() && self.from.eq_ignore_ascii_case(&self.to)
    }
}

/// The four Eisenhower quadrants. Every classification resolves to
/// exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    #[serde(rename = "URGENT_IMPORTANT")]
    UrgentImportant,
    #[serde(rename = "NOT_URGENT_IMPORTANT")]
    NotUrgentImportant,
    #[serde(rename = "URGENT_NOT_IMPORTANT")]
    UrgentNotImportant,
    #[serde(rename = "NOT_URGENT_NOT_IMPORTANT")]
    NotUrgentNotImportant,
}

impl Quadrant {
    /// Stable key used for label names and statistics buckets
    pub fn key(&self) -> &'static str {
        match self {
            Quadrant::UrgentImportant => "URGENT_IMPORTANT",
            Quadrant::NotUrgentImportant => "NOT_URGENT_IMPORTANT",
            Quadrant::UrgentNotImportant => "URGENT_NOT_IMPORTANT",
            Quadrant::NotUrgentNotImportant => "NOT_URGENT_NOT_IMPORTANT",
        }
    }

    /// Map an (urgent, important) pair onto its quadrant
    pub fn from_flags(urgent: bool, important: bool) -> Self {
        match (urgent, important) {
            (true, true) => Quadrant::UrgentImportant,
            (false, true) => Quadrant::NotUrgentImportant,
            (true, false) => Quadrant::UrgentNotImportant,
            (false, false) => Quadrant::NotUrgentNotImportant,
        }
    }

    pub fn all() -> [Quadrant; 4] {
        [
            Quadrant::UrgentImportant,
            Quadrant::NotUrgentImportant,
            Quadrant::UrgentNotImportant,
            Quadrant::NotUrgentNotImportant,
        ]
    }
}

/// Three-way task priority as asserted by the AI. The numeric rank is an
/// external contract of the task store, not something the engine reasons
/// about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Normal,
    Low,
}

impl TaskPriority {
    /// Opaque numeric rank expected by the task store (1 = highest)
    pub fn rank(&self) -> u8 {
        match self {
            TaskPriority::High => 1,
            TaskPriority::Normal => 2,
            TaskPriority::Low => 3,
        }
    }

    /// Lenient parse of the AI-provided priority string; anything
    /// unrecognized degrades to Normal.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "high" => TaskPriority::High,
            "low" => TaskPriority::Low,
            _ => TaskPriority::Normal,
        }
    }
}

/// Calendar scheduling hints extracted from the AI classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarHints {
    pub suggested_time: Option<String>,
    pub is_ai_suggested: bool,
    /// Set when the mail itself is a calendar notification; creating an
    /// event for it would duplicate an existing one.
    pub ignore_event_creation: bool,
}

/// Task creation request extracted from the AI classification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRequest {
    pub should_create: bool,
    pub title: String,
    pub notes: String,
    pub due_date: Option<String>,
    pub priority: TaskPriority,
}

/// A validated classification with unknown categories filtered out and the
/// final Eisenhower quadrant resolved. Created per email, consumed once by
/// the action engine, then discarded (apart from the statistics tally).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizedClassification {
    pub categories: Vec<String>,
    pub confidence: f64,
    pub is_spam_or_junk: bool,
    pub is_self_sent: bool,
    pub action_needed: bool,
    pub deadline: Option<String>,
    pub estimated_time: Option<String>,
    pub summary: String,
    pub ai_urgent: bool,
    pub ai_important: bool,
    pub calendar: Option<CalendarHints>,
    pub task: Option<TaskRequest>,
    pub quadrant: Quadrant,
}
