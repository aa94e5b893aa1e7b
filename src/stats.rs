//! Running tally of processed emails by category and by quadrant.
//!
//! The tally persists across invocations via a [`StatisticsStore`]; the
//! session boundary (when to clear) belongs to the caller, typically
//! "until the next report".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, TriageError};
use crate::models::SanitizedClassification;
use crate::policy::PolicySet;
use crate::store::StatisticsStore;

/// Persisted per-session counts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionStatistics {
    pub processed: usize,
    pub by_category: HashMap<String, usize>,
    pub by_priority: HashMap<String, usize>,
}

/// Accumulates statistics in memory; the store is written once per
/// recorded email so an interrupted batch loses at most nothing.
pub struct StatisticsAccumulator {
    store: Box<dyn StatisticsStore>,
    stats: SessionStatistics,
}

impl StatisticsAccumulator {
    /// Load the persisted tally and wrap it for accumulation
    pub async fn load(store: Box<dyn StatisticsStore>) -> Result<Self> {
        let stats = store.load().await?;
        debug!(processed = stats.processed, "loaded session statistics");
        Ok(Self { store, stats })
    }

    /// Record one processed email: total count, per-category display-name
    /// counts, and the per-quadrant bucket.
    pub async fn record(
        &mut self,
        classification: &SanitizedClassification,
        policy: &PolicySet,
    ) -> Result<()> {
        self.stats.processed += 1;

        for name in &classification.categories {
            let display = policy
                .category(name)
                .map(|p| p.display_name.clone())
                .unwrap_or_else(|| name.clone());
            *self.stats.by_category.entry(display).or_insert(0) += 1;
        }

        *self
            .stats
            .by_priority
            .entry(classification.quadrant.key().to_string())
            .or_insert(0) += 1;

        self.store.save(&self.stats).await
    }

    /// Read-only copy of the current tally
    pub fn snapshot(&self) -> SessionStatistics {
        self.stats.clone()
    }

    /// Reset the tally and persist the empty state
    pub async fn clear(&mut self) -> Result<()> {
        self.stats = SessionStatistics::default();
        self.store.save(&self.stats).await?;
        info!("session statistics cleared");
        Ok(())
    }
}

/// JSON-file-backed statistics store. A missing file is a fresh session,
/// not an error.
pub struct FileStatisticsStore {
    path: PathBuf,
}

impl FileStatisticsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl StatisticsStore for FileStatisticsStore {
    async fn load(&self) -> Result<SessionStatistics> {
        if !self.path.exists() {
            debug!(path = ?self.path, "no statistics file, starting fresh");
            return Ok(SessionStatistics::default());
        }
        let json = tokio::fs::read_to_string(&self.path).await?;
        let stats = serde_json::from_str(&json)
            .map_err(|e| TriageError::StateError(format!("corrupt statistics file: {}", e)))?;
        Ok(stats)
    }

    async fn save(&self, stats: &SessionStatistics) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(stats)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
