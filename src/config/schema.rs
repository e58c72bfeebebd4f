use std::time::Duration;

use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval: u64,
    /// Deadline for one telemetry collection; falls back to `monitor_interval`.
    #[serde(default)]
    pub collection_timeout_secs: Option<u64>,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub simulation: Simulation,
    #[serde(default)]
    pub export: Export,
}

impl Config {
    pub fn collection_timeout(&self) -> Duration {
        Duration::from_secs(self.collection_timeout_secs.unwrap_or(self.monitor_interval))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    #[serde(default = "default_anomaly_threshold")]
    pub anomaly_threshold: f64,
    #[serde(default = "default_classifier_baseline_cpu")]
    pub classifier_baseline_cpu: f64,
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
    #[serde(default = "default_anomaly_tail")]
    pub anomaly_tail: usize,
    #[serde(default = "default_recommendation_tail")]
    pub recommendation_tail: usize,
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
    #[serde(default)]
    pub log_retention: LogRetention,
}

/// How the anomaly and recommendation logs behind the tail views are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRetention {
    /// Storage is trimmed to the exposed tail length.
    #[default]
    Capped,
    /// Every entry is kept for the lifetime of the engine.
    Unbounded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Simulation {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub profile: SimulationProfile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationProfile {
    #[default]
    Default,
    Stress,
}

impl SimulationProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationProfile::Default => "default",
            SimulationProfile::Stress => "stress",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Export {
    #[serde(default = "default_export_enabled")]
    pub enabled: bool,
    #[serde(default = "default_export_dir")]
    pub dir: String,
}
