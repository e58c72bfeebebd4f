use super::schema::{Analysis, Config, Export, History, LogRetention, Simulation, SimulationProfile};

pub(super) fn default_monitor_interval() -> u64 {
    2
}

pub(super) fn default_anomaly_threshold() -> f64 {
    0.8
}

pub(super) fn default_classifier_baseline_cpu() -> f64 {
    50.0
}

pub(super) fn default_max_recommendations() -> usize {
    5
}

pub(super) fn default_history_capacity() -> usize {
    100
}

pub(super) fn default_anomaly_tail() -> usize {
    10
}

pub(super) fn default_recommendation_tail() -> usize {
    20
}

pub(super) fn default_trend_window() -> usize {
    20
}

pub(super) fn default_export_enabled() -> bool {
    true
}

pub(super) fn default_export_dir() -> String {
    ".".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor_interval: default_monitor_interval(),
            collection_timeout_secs: None,
            analysis: Analysis::default(),
            history: History::default(),
            simulation: Simulation::default(),
            export: Export::default(),
        }
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            anomaly_threshold: default_anomaly_threshold(),
            classifier_baseline_cpu: default_classifier_baseline_cpu(),
            max_recommendations: default_max_recommendations(),
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
            anomaly_tail: default_anomaly_tail(),
            recommendation_tail: default_recommendation_tail(),
            trend_window: default_trend_window(),
            log_retention: LogRetention::default(),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            enabled: false,
            profile: SimulationProfile::default(),
        }
    }
}

impl Default for Export {
    fn default() -> Self {
        Self {
            enabled: default_export_enabled(),
            dir: default_export_dir(),
        }
    }
}
