//! Per-email triage orchestration.
//!
//! One email runs the full chain (classify, validate, resolve quadrant,
//! apply actions, record statistics) before the next begins. Side effects
//! on the shared mail store are not assumed safe to interleave, so there
//! is no concurrency here; rate limiting between emails belongs to the
//! caller.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::engine::ActionEngine;
use crate::error::Result;
use crate::models::{EmailData, Quadrant};
use crate::policy::PolicySet;
use crate::quadrant::QuadrantResolver;
use crate::stats::StatisticsAccumulator;
use crate::store::{AiClassifier, CalendarStore, MailThread, StatisticsStore, TaskStore};
use crate::validator::ClassificationValidator;

/// What happened to a single email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Full chain ran; the email landed in this quadrant
    Processed(Quadrant),
    /// Classification was unusable; flagged for manual review
    SkippedInvalid,
    /// The classifier returned nothing; flagged for manual review
    ClassifierUnavailable,
}

/// Totals for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct TriagePipeline {
    policy: Arc<PolicySet>,
    manual_review_label: String,
    classifier: Box<dyn AiClassifier>,
    engine: ActionEngine,
    stats: StatisticsAccumulator,
}

impl TriagePipeline {
    pub async fn new(
        config: &Config,
        classifier: Box<dyn AiClassifier>,
        calendar: Box<dyn CalendarStore>,
        tasks: Box<dyn TaskStore>,
        statistics_store: Box<dyn StatisticsStore>,
    ) -> Result<Self> {
        let policy = Arc::new(config.policy_set());
        let engine = ActionEngine::new(
            Arc::clone(&policy),
            config.labels.clone(),
            config.engine.clone(),
            calendar,
            tasks,
        );
        let stats = StatisticsAccumulator::load(statistics_store).await?;
        Ok(Self {
            policy,
            manual_review_label: config.labels.manual_review.clone(),
            classifier,
            engine,
            stats,
        })
    }

    /// Run the full chain for one email.
    ///
    /// Recoverable problems (no classification, missing categories) flag
    /// the thread for manual review and return a non-processed outcome;
    /// essential side-effect failures propagate.
    pub async fn process_email(
        &mut self,
        thread: &dyn MailThread,
        email: &EmailData,
    ) -> Result<Outcome> {
        let raw = match self.classifier.classify(email).await? {
            Some(raw) => raw,
            None => {
                warn!(subject = %email.subject, "classifier returned nothing, flagging for review");
                thread.add_label(&self.manual_review_label).await?;
                return Ok(Outcome::ClassifierUnavailable);
            }
        };

        let validator = ClassificationValidator::new(&self.policy);
        let mut classification = match validator.validate(&raw) {
            Ok(c) => c,
            Err(e) if e.is_recoverable() => {
                warn!(subject = %email.subject, error = %e, "unusable classification, flagging for review");
                thread.add_label(&self.manual_review_label).await?;
                return Ok(Outcome::SkippedInvalid);
            }
            Err(e) => return Err(e),
        };

        // The headers are ground truth for self-sent; the AI flag alone
        // would miss aliases the model does not know about
        classification.is_self_sent = classification.is_self_sent || email.is_self_sent();

        let resolver = QuadrantResolver::new(&self.policy);
        classification.quadrant = resolver.resolve(
            &classification.categories,
            classification.ai_urgent,
            classification.ai_important,
            classification.is_spam_or_junk,
        );

        self.engine.apply(thread, &classification).await?;
        self.stats.record(&classification, &self.policy).await?;

        info!(
            subject = %email.subject,
            quadrant = classification.quadrant.key(),
            categories = ?classification.categories,
            "email triaged"
        );
        Ok(Outcome::Processed(classification.quadrant))
    }

    /// Process a batch strictly in order. A fatal error on one email marks
    /// it for manual review and moves on; the rest of the batch proceeds.
    pub async fn process_batch(
        &mut self,
        batch: &[(&dyn MailThread, EmailData)],
    ) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (thread, email) in batch {
            match self.process_email(*thread, email).await {
                Ok(Outcome::Processed(_)) => summary.processed += 1,
                Ok(_) => summary.skipped += 1,
                Err(e) => {
                    error!(subject = %email.subject, error = %e, "email failed, flagging for review");
                    if let Err(label_err) = thread.add_label(&self.manual_review_label).await {
                        error!(error = %label_err, "manual-review label also failed");
                    }
                    summary.failed += 1;
                }
            }
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch complete"
        );
        summary
    }

    /// Read-only view of the running statistics tally
    pub fn statistics(&self) -> crate::stats::SessionStatistics {
        self.stats.snapshot()
    }

    /// Reset the statistics tally (session boundary)
    pub async fn clear_statistics(&mut self) -> Result<()> {
        self.stats.clear().await
    }
}
