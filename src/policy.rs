//! Category and quadrant policy tables.
//!
//! Policies are static configuration for the lifetime of a run: they are
//! built once (from defaults or from the config file) and injected into the
//! resolver and the action engine, read-only. Tests inject synthetic tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::models::Quadrant;

/// Per-category metadata used to override AI-asserted flags and to decide
/// trash eligibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPolicy {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub is_urgent: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub move_to_trash: bool,
}

/// Per-quadrant handling policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantPolicy {
    pub display_name: String,
    pub keep_in_inbox: bool,
    /// Palette color name for the quadrant label; unknown names resolve
    /// to gray
    #[serde(default = "default_quadrant_color")]
    pub color: String,
}

pub fn default_quadrant_color() -> String {
    "gray".to_string()
}

/// The full policy surface injected into the core: category table, the four
/// quadrant entries, and the set of spam-class category keys that trigger
/// the short-circuit.
#[derive(Debug, Clone)]
pub struct PolicySet {
    categories: HashMap<String, CategoryPolicy>,
    quadrants: HashMap<Quadrant, QuadrantPolicy>,
    spam_keys: Vec<String>,
}

impl PolicySet {
    pub fn new(
        categories: Vec<CategoryPolicy>,
        quadrants: HashMap<Quadrant, QuadrantPolicy>,
        spam_keys: Vec<String>,
    ) -> Self {
        let categories = categories
            .into_iter()
            .map(|c| (c.key.clone(), c))
            .collect();
        Self {
            categories,
            quadrants,
            spam_keys,
        }
    }

    /// Look up a category by key, falling back to a reverse lookup by
    /// display name. Re-evaluated threads can hand their category back as
    /// the label's display name rather than the canonical key.
    pub fn category(&self, name: &str) -> Option<&CategoryPolicy> {
        if let Some(policy) = self.categories.get(name) {
            return Some(policy);
        }
        self.categories
            .values()
            .find(|p| p.display_name.eq_ignore_ascii_case(name))
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    pub fn category_keys(&self) -> impl Iterator<Item = &String> {
        self.categories.keys()
    }

    /// Quadrant policy lookup. The table always carries exactly four
    /// entries; a miss means a malformed config slipped through validation
    /// and is logged rather than panicking.
    pub fn quadrant(&self, quadrant: Quadrant) -> QuadrantPolicy {
        match self.quadrants.get(&quadrant) {
            Some(policy) => policy.clone(),
            None => {
                warn!(quadrant = quadrant.key(), "no quadrant policy entry, using fallback");
                QuadrantPolicy {
                    display_name: quadrant.key().to_string(),
                    keep_in_inbox: false,
                    color: default_quadrant_color(),
                }
            }
        }
    }

    /// Check whether a category name (key or display name) is spam-class
    pub fn is_spam_category(&self, name: &str) -> bool {
        if self.spam_keys.iter().any(|k| k == name) {
            return true;
        }
        // Display-name form of a spam key counts too
        self.category(name)
            .map(|p| self.spam_keys.iter().any(|k| *k == p.key))
            .unwrap_or(false)
    }

    pub fn spam_keys(&self) -> &[String] {
        &self.spam_keys
    }
}

impl Default for PolicySet {
    fn default() -> Self {
        Self::new(
            default_categories(),
            default_quadrants(),
            default_spam_keys(),
        )
    }
}

/// Built-in life-area category table. Mirrors the config file defaults;
/// users can replace it wholesale in TOML.
pub fn default_categories() -> Vec<CategoryPolicy> {
    fn cat(key: &str, display: &str, urgent: bool, important: bool, trash: bool) -> CategoryPolicy {
        CategoryPolicy {
            key: key.to_string(),
            display_name: display.to_string(),
            is_urgent: urgent,
            is_important: important,
            move_to_trash: trash,
        }
    }

    vec![
        cat("FAMILY", "Family", false, true, false),
        cat("FRIENDS", "Friends", false, false, false),
        cat("WORK", "Work", false, true, false),
        cat("FINANCE", "Finance", true, true, false),
        cat("HEALTH", "Health", true, true, false),
        cat("HOME", "Home", false, false, false),
        cat("TRAVEL", "Travel", false, true, false),
        cat("SHOPPING", "Shopping", false, false, false),
        cat("RECEIPTS", "Receipts", false, false, false),
        cat("NEWSLETTERS", "Newsletters", false, false, false),
        cat("NOTIFICATIONS", "Notifications", false, false, false),
        cat("SPAM", "Spam", false, false, true),
        cat("JUNK", "Junk", false, false, true),
    ]
}

pub fn default_quadrants() -> HashMap<Quadrant, QuadrantPolicy> {
    let mut map = HashMap::new();
    map.insert(
        Quadrant::UrgentImportant,
        QuadrantPolicy {
            display_name: "Do First".to_string(),
            keep_in_inbox: true,
            color: "red".to_string(),
        },
    );
    map.insert(
        Quadrant::NotUrgentImportant,
        QuadrantPolicy {
            display_name: "Schedule".to_string(),
            keep_in_inbox: true,
            color: "orange".to_string(),
        },
    );
    map.insert(
        Quadrant::UrgentNotImportant,
        QuadrantPolicy {
            display_name: "Delegate".to_string(),
            keep_in_inbox: false,
            color: "blue".to_string(),
        },
    );
    map.insert(
        Quadrant::NotUrgentNotImportant,
        QuadrantPolicy {
            display_name: "Someday".to_string(),
            keep_in_inbox: false,
            color: "gray".to_string(),
        },
    );
    map
}

pub fn default_spam_keys() -> Vec<String> {
    vec!["SPAM".to_string(), "JUNK".to_string()]
}
