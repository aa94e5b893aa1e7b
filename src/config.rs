use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{Result, TriageError};
use crate::models::Quadrant;
use crate::policy::{
    default_categories, default_quadrants, default_spam_keys, CategoryPolicy, PolicySet,
    QuadrantPolicy,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub statistics: StatisticsConfig,
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryPolicy>,
    #[serde(default)]
    pub quadrants: QuadrantConfig,
    #[serde(default = "default_spam_keys")]
    pub spam_categories: Vec<String>,
}

/// The four quadrant policies as named config sections. Modeling them as
/// struct fields (not a map) makes "exactly 4 entries" structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrantConfig {
    pub urgent_important: QuadrantPolicy,
    pub not_urgent_important: QuadrantPolicy,
    pub urgent_not_important: QuadrantPolicy,
    pub not_urgent_not_important: QuadrantPolicy,
}

impl Default for QuadrantConfig {
    fn default() -> Self {
        let mut defaults = default_quadrants();
        let mut take = |q: Quadrant| defaults.remove(&q).expect("default table is total");
        Self {
            urgent_important: take(Quadrant::UrgentImportant),
            not_urgent_important: take(Quadrant::NotUrgentImportant),
            urgent_not_important: take(Quadrant::UrgentNotImportant),
            not_urgent_not_important: take(Quadrant::NotUrgentNotImportant),
        }
    }
}

impl QuadrantConfig {
    fn to_map(&self) -> HashMap<Quadrant, QuadrantPolicy> {
        let mut map = HashMap::new();
        map.insert(Quadrant::UrgentImportant, self.urgent_important.clone());
        map.insert(Quadrant::NotUrgentImportant, self.not_urgent_important.clone());
        map.insert(Quadrant::UrgentNotImportant, self.urgent_not_important.clone());
        map.insert(
            Quadrant::NotUrgentNotImportant,
            self.not_urgent_not_important.clone(),
        );
        map
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: LabelConfig::default(),
            engine: EngineConfig::default(),
            statistics: StatisticsConfig::default(),
            categories: default_categories(),
            quadrants: QuadrantConfig::default(),
            spam_categories: default_spam_keys(),
        }
    }
}

/// Names of the supplementary labels the action engine applies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_to_plan_label")]
    pub to_plan: String,
    #[serde(default = "default_delegate_label")]
    pub delegate: String,
    #[serde(default = "default_someday_label")]
    pub someday: String,
    #[serde(default = "default_requires_action_label")]
    pub requires_action: String,
    #[serde(default = "default_has_deadline_label")]
    pub has_deadline: String,
    #[serde(default = "default_manual_review_label")]
    pub manual_review: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            to_plan: default_to_plan_label(),
            delegate: default_delegate_label(),
            someday: default_someday_label(),
            requires_action: default_requires_action_label(),
            has_deadline: default_has_deadline_label(),
            manual_review: default_manual_review_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Calendar event start offset when the AI suggested no time
    #[serde(default = "default_event_offset_minutes")]
    pub default_event_offset_minutes: i64,
    /// Popup reminder lead time on created events
    #[serde(default = "default_reminder_minutes")]
    pub reminder_minutes_before: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_event_offset_minutes: default_event_offset_minutes(),
            reminder_minutes_before: default_reminder_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsConfig {
    #[serde(default = "default_statistics_path")]
    pub path: String,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            path: default_statistics_path(),
        }
    }
}

fn default_to_plan_label() -> String {
    "To Plan".to_string()
}

fn default_delegate_label() -> String {
    "Delegate".to_string()
}

fn default_someday_label() -> String {
    "Someday Maybe".to_string()
}

fn default_requires_action_label() -> String {
    "Requires Action".to_string()
}

fn default_has_deadline_label() -> String {
    "Has Deadline".to_string()
}

fn default_manual_review_label() -> String {
    "Manual Review".to_string()
}

fn default_event_offset_minutes() -> i64 {
    30
}

fn default_reminder_minutes() -> i64 {
    5
}

fn default_statistics_path() -> String {
    ".inbox-triage/statistics.json".to_string()
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TriageError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TriageError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TriageError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TriageError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| TriageError::ConfigError(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Category keys must be unique and non-empty
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if category.key.is_empty() {
                return Err(TriageError::ConfigError(
                    "category key cannot be empty".to_string(),
                ));
            }
            if category.display_name.is_empty() {
                return Err(TriageError::ConfigError(format!(
                    "category '{}' has an empty display_name",
                    category.key
                )));
            }
            if !seen.insert(category.key.clone()) {
                return Err(TriageError::ConfigError(format!(
                    "duplicate category key '{}'",
                    category.key
                )));
            }
        }

        // The four quadrant sections are structural; their display names
        // still need to be usable as label text
        for (quadrant, policy) in self.quadrants.to_map() {
            if policy.display_name.is_empty() {
                return Err(TriageError::ConfigError(format!(
                    "quadrant {} has an empty display_name",
                    quadrant.key()
                )));
            }
        }

        // Spam keys must reference configured categories
        for key in &self.spam_categories {
            if !self.categories.iter().any(|c| c.key == *key) {
                return Err(TriageError::ConfigError(format!(
                    "spam_categories entry '{}' is not a configured category",
                    key
                )));
            }
        }

        if self.engine.reminder_minutes_before <= 0 {
            return Err(TriageError::ConfigError(
                "engine.reminder_minutes_before must be greater than 0".to_string(),
            ));
        }
        if self.engine.default_event_offset_minutes <= 0 {
            return Err(TriageError::ConfigError(
                "engine.default_event_offset_minutes must be greater than 0".to_string(),
            ));
        }

        for (name, value) in [
            ("labels.to_plan", &self.labels.to_plan),
            ("labels.delegate", &self.labels.delegate),
            ("labels.someday", &self.labels.someday),
            ("labels.requires_action", &self.labels.requires_action),
            ("labels.has_deadline", &self.labels.has_deadline),
            ("labels.manual_review", &self.labels.manual_review),
        ] {
            if value.is_empty() {
                return Err(TriageError::ConfigError(format!(
                    "{} cannot be empty",
                    name
                )));
            }
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Build the immutable policy surface injected into the resolver and
    /// the action engine.
    pub fn policy_set(&self) -> PolicySet {
        PolicySet::new(
            self.categories.clone(),
            self.quadrants.to_map(),
            self.spam_categories.clone(),
        )
    }

    /// Create an example configuration file
    pub async fn create_example(path: &Path) -> Result<()> {
        let config = Self::default();
        config.save(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.labels.to_plan, "To Plan");
        assert_eq!(config.labels.someday, "Someday Maybe");
        assert_eq!(config.engine.default_event_offset_minutes, 30);
        assert_eq!(config.engine.reminder_minutes_before, 5);
        assert!(config.quadrants.urgent_important.keep_in_inbox);
        assert!(!config.quadrants.not_urgent_not_important.keep_in_inbox);
        assert!(config.categories.iter().any(|c| c.key == "SPAM"));
        assert_eq!(config.spam_categories, vec!["SPAM", "JUNK"]);
    }

    #[test]
    fn test_config_validation_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_duplicate_category() {
        let mut config = Config::default();
        config.categories.push(config.categories[0].clone());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("duplicate"));
    }

    #[test]
    fn test_config_validation_empty_quadrant_display_name() {
        let mut config = Config::default();
        config.quadrants.urgent_important.display_name = String::new();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("empty display_name"));
    }

    #[test]
    fn test_config_validation_unknown_spam_key() {
        let mut config = Config::default();
        config.spam_categories.push("PHANTOM".to_string());
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("not a configured category"));
    }

    #[test]
    fn test_config_validation_empty_label() {
        let mut config = Config::default();
        config.labels.delegate = String::new();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("labels.delegate cannot be empty"));
    }

    #[test]
    fn test_config_validation_reminder_zero() {
        let mut config = Config::default();
        config.engine.reminder_minutes_before = 0;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("reminder_minutes_before"));
    }

    #[test]
    fn test_policy_set_round_trip() {
        let config = Config::default();
        let policy = config.policy_set();
        assert!(policy.has_category("WORK"));
        assert!(policy.is_spam_category("SPAM"));
        assert!(policy.quadrant(Quadrant::UrgentImportant).keep_in_inbox);
    }

    #[tokio::test]
    async fn test_config_serialization_roundtrip() {
        let config = Config::default();

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.labels.to_plan, deserialized.labels.to_plan);
        assert_eq!(config.categories.len(), deserialized.categories.len());
        assert_eq!(
            config.quadrants.not_urgent_not_important.display_name,
            deserialized.quadrants.not_urgent_not_important.display_name
        );
    }

    #[tokio::test]
    async fn test_config_load_save_roundtrip() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let config = Config::default();
        config.save(path).await.unwrap();

        let loaded = Config::load(path).await.unwrap();
        assert_eq!(config.labels.someday, loaded.labels.someday);
        assert_eq!(config.spam_categories, loaded.spam_categories);
    }

    #[tokio::test]
    async fn test_config_load_nonexistent_returns_default() {
        let path = Path::new("/tmp/nonexistent-inbox-triage-config.toml");
        let config = Config::load(path).await.unwrap();
        assert_eq!(config.engine.reminder_minutes_before, 5);
    }

    #[tokio::test]
    async fn test_config_load_invalid_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        tokio::fs::write(path, "this is not valid toml {[}]")
            .await
            .unwrap();

        let result = Config::load(path).await;
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }

    #[tokio::test]
    async fn test_config_partial_with_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let partial_config = r#"
[labels]
someday = "Back Burner"

[engine]
reminder_minutes_before = 10
"#;
        tokio::fs::write(path, partial_config).await.unwrap();

        let config = Config::load(path).await.unwrap();

        assert_eq!(config.labels.someday, "Back Burner");
        assert_eq!(config.engine.reminder_minutes_before, 10);

        // Defaults still fill the rest
        assert_eq!(config.labels.to_plan, "To Plan");
        assert_eq!(config.engine.default_event_offset_minutes, 30);
        assert!(config.quadrants.urgent_important.keep_in_inbox);
    }
}
