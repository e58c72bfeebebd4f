use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, AnomalyRecord, Recommendation};
use crate::config::History;
use crate::telemetry::{ProcessSnapshot, SystemSnapshot};

mod summary;
mod tail_log;

pub use summary::HistorySummary;
pub use tail_log::TailLog;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub processes: Vec<ProcessSnapshot>,
    pub system: SystemSnapshot,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyStats {
    pub total_detected: u64,
    pub recent: Vec<AnomalyRecord>,
}

/// Bounded tick history plus the anomaly and recommendation logs.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    anomaly_tail: usize,
    recommendation_tail: usize,
    trend_window: usize,
    anomalies: TailLog<AnomalyRecord>,
    recommendations: TailLog<Recommendation>,
}

impl HistoryStore {
    pub fn from_config(settings: &History) -> Self {
        let capacity = settings.capacity.max(1);

        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            anomaly_tail: settings.anomaly_tail,
            recommendation_tail: settings.recommendation_tail,
            trend_window: settings.trend_window,
            anomalies: TailLog::new(settings.log_retention, settings.anomaly_tail),
            recommendations: TailLog::new(settings.log_retention, settings.recommendation_tail),
        }
    }

    /// Appends one tick, dropping the oldest once `capacity` is exceeded.
    pub fn record(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn log_anomalies(&mut self, anomalies: &[AnomalyRecord]) {
        self.anomalies.extend(anomalies.iter().cloned());
    }

    pub fn log_recommendations(&mut self, recommendations: &[Recommendation]) {
        self.recommendations.extend(recommendations.iter().cloned());
    }

    pub fn recent_anomalies(&self, n: usize) -> Vec<AnomalyRecord> {
        self.anomalies.tail(n)
    }

    pub fn recent_recommendations(&self, n: usize) -> Vec<Recommendation> {
        self.recommendations.tail(n)
    }

    /// Total anomalies ever detected plus the configured tail (10 by default).
    pub fn anomaly_stats(&self) -> AnomalyStats {
        AnomalyStats {
            total_detected: self.anomalies.total(),
            recent: self.recent_anomalies(self.anomaly_tail),
        }
    }

    /// The configured recommendation tail (20 by default).
    pub fn recommendation_history(&self) -> Vec<Recommendation> {
        self.recent_recommendations(self.recommendation_tail)
    }

    /// Host snapshots for trend charts, oldest first.
    pub fn recent_system_samples(&self, n: usize) -> Vec<SystemSnapshot> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries
            .iter()
            .skip(skip)
            .map(|entry| entry.system.clone())
            .collect()
    }

    pub fn trend(&self) -> Vec<SystemSnapshot> {
        self.recent_system_samples(self.trend_window)
    }

    pub fn summarize(&self) -> Option<HistorySummary> {
        summary::summarize_entries(&self.entries)
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::from_config(&History::default())
    }
}

#[cfg(test)]
mod tests;
