//! Eisenhower quadrant resolution.
//!
//! Reconciles the AI-asserted urgent/important baseline with the category
//! policy table. Category flags are strictly OR-additive: policy can
//! promote a flag from false to true but never demote one the AI set.

use tracing::{debug, warn};

use crate::models::Quadrant;
use crate::policy::PolicySet;

/// Computes the final quadrant for a sanitized category set
pub struct QuadrantResolver<'a> {
    policy: &'a PolicySet,
}

impl<'a> QuadrantResolver<'a> {
    pub fn new(policy: &'a PolicySet) -> Self {
        Self { policy }
    }

    /// Resolve the quadrant from the category set and the AI baseline.
    ///
    /// Spam short-circuits to the lowest quadrant unconditionally: a spam
    /// flag or a spam-class category wins over any urgency claim the AI
    /// makes, so junk can never be escalated.
    pub fn resolve(
        &self,
        categories: &[String],
        ai_urgent: bool,
        ai_important: bool,
        is_spam: bool,
    ) -> Quadrant {
        if categories.is_empty() {
            return Quadrant::NotUrgentNotImportant;
        }

        if is_spam || categories.iter().any(|c| self.policy.is_spam_category(c)) {
            debug!("spam short-circuit, forcing lowest quadrant");
            return Quadrant::NotUrgentNotImportant;
        }

        let mut urgent = ai_urgent;
        let mut important = ai_important;

        for name in categories {
            // Validated upstream, but an unknown key reaching this point
            // must not contribute flags
            match self.policy.category(name) {
                Some(policy) => {
                    if policy.is_urgent {
                        urgent = true;
                    }
                    if policy.is_important {
                        important = true;
                    }
                }
                None => {
                    warn!(category = name.as_str(), "unknown category in resolver, ignoring");
                }
            }
        }

        Quadrant::from_flags(urgent, important)
    }
}
