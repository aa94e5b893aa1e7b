use thiserror::Error;

/// Type alias for Result with TriageError
pub type Result<T> = std::result::Result<T, TriageError>;

/// Error types for the inbox triage engine
#[derive(Error, Debug)]
pub enum TriageError {
    /// AI classification had no usable `categories` array. Fatal for that
    /// one email only; the caller should flag it for manual review.
    #[error("classification is missing a categories array")]
    MissingCategories,

    /// Classification errors other than a missing categories array
    #[error("Classification error: {0}")]
    ClassificationError(String),

    /// Label-related errors (creation or application via the mail store)
    #[error("Label error: {0}")]
    LabelError(String),

    /// Calendar collaborator errors
    #[error("Calendar error: {0}")]
    CalendarError(String),

    /// Task collaborator errors
    #[error("Task error: {0}")]
    TaskError(String),

    /// Mail store thread mutation errors (trash, archive, importance)
    #[error("Mail store error: {0}")]
    MailStoreError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Statistics persistence errors
    #[error("State error: {0}")]
    StateError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic catch-all error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl TriageError {
    /// Check if the error only affects a single email and the batch can
    /// continue with the next one.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TriageError::MissingCategories
                | TriageError::ClassificationError(_)
                | TriageError::CalendarError(_)
                | TriageError::TaskError(_)
        )
    }

    /// Check if the error should abort the whole batch
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
