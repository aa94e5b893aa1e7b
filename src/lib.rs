//! Inbox Triage Engine
//!
//! Classifies inbound email into a prioritized, labeled inbox-management
//! workflow: an AI collaborator assigns life-area categories and urgency/
//! importance flags, and a deterministic rules engine converts that
//! classification into label assignments, archival/trash decisions,
//! calendar reminders, and task creation.
//!
//! # Overview
//!
//! - **Validation**: untrusted AI output is sanitized field by field
//! - **Quadrant resolution**: AI-asserted flags reconciled with category
//!   policy via monotonic OR-accumulation; spam short-circuits to the
//!   lowest quadrant
//! - **Action engine**: ordered decision tree driving labels, trash,
//!   archive, calendar reminders, and task creation
//! - **Time parsing**: free-form scheduling phrases resolved to concrete
//!   timestamps, durations, and due dates with documented fallbacks
//! - **Statistics**: persisted per-session tally by category and quadrant
//!
//! # Example Usage
//!
//! ```no_run
//! use inbox_triage::config::Config;
//! use inbox_triage::pipeline::TriagePipeline;
//! use inbox_triage::stats::FileStatisticsStore;
//!
//! # async fn run(
//! #     classifier: Box<dyn inbox_triage::store::AiClassifier>,
//! #     calendar: Box<dyn inbox_triage::store::CalendarStore>,
//! #     tasks: Box<dyn inbox_triage::store::TaskStore>,
//! # ) -> anyhow::Result<()> {
//! let config = Config::load("triage.toml".as_ref()).await?;
//! let stats = Box::new(FileStatisticsStore::new(&config.statistics.path));
//! let mut pipeline = TriagePipeline::new(&config, classifier, calendar, tasks, stats).await?;
//! // feed (thread, email) pairs through pipeline.process_email(...)
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`colors`] - label color palette resolution
//! - [`config`] - configuration management and policy tables
//! - [`engine`] - the classification-to-action decision engine
//! - [`error`] - error types and result aliases
//! - [`models`] - core data structures
//! - [`pipeline`] - per-email orchestration and batch driver
//! - [`policy`] - category and quadrant policy lookup
//! - [`quadrant`] - Eisenhower quadrant resolution
//! - [`stats`] - persisted session statistics
//! - [`store`] - collaborator interfaces (mail, AI, calendar, tasks)
//! - [`timeparse`] - natural-language time expression parsing
//! - [`validator`] - raw classification validation and sanitization

pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod policy;
pub mod quadrant;
pub mod stats;
pub mod store;
pub mod timeparse;
pub mod validator;

// Re-export commonly used types for convenience
pub use colors::LabelColor;
pub use error::{Result, TriageError};

// Core data models
pub use models::{
    CalendarHints, EmailData, Quadrant, SanitizedClassification, TaskPriority, TaskRequest,
};

// Policy types
pub use policy::{CategoryPolicy, PolicySet, QuadrantPolicy};

// Config types
pub use config::{Config, EngineConfig, LabelConfig, QuadrantConfig, StatisticsConfig};

// Engine and pipeline
pub use engine::ActionEngine;
pub use pipeline::{BatchSummary, Outcome, TriagePipeline};

// Collaborator traits
pub use store::{AiClassifier, CalendarStore, MailThread, NewTask, StatisticsStore, TaskStore};

// Statistics
pub use stats::{FileStatisticsStore, SessionStatistics, StatisticsAccumulator};

// Validation and resolution
pub use quadrant::QuadrantResolver;
pub use validator::ClassificationValidator;
