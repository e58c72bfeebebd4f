use std::fmt;

use serde::Serialize;

use crate::telemetry::{ProcessSnapshot, clamp_percent};

use super::detector::rule_score;

pub const DEFAULT_BASELINE_CPU_PERCENT: f64 = 50.0;

const CRITICAL_SCORE: f64 = 0.8;
const WARNING_SCORE: f64 = 0.6;
const MONITOR_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProcessLabel {
    Normal,
    Monitor,
    Warning,
    Critical,
}

impl ProcessLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessLabel::Normal => "Normal",
            ProcessLabel::Monitor => "Monitor",
            ProcessLabel::Warning => "Warning",
            ProcessLabel::Critical => "Critical",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            ProcessLabel::Critical => "badge-critical",
            ProcessLabel::Warning | ProcessLabel::Monitor => "badge-warning",
            ProcessLabel::Normal => "badge-normal",
        }
    }
}

impl fmt::Display for ProcessLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub label: ProcessLabel,
    pub is_anomaly: bool,
}

/// Per-process table status.
///
/// Scores against a fixed baseline host CPU rather than the live snapshot, so
/// its verdict can disagree with [`AnomalyDetector`](super::AnomalyDetector)
/// for the same process on the same tick.
#[derive(Debug, Clone)]
pub struct ProcessClassifier {
    baseline_cpu_percent: f64,
}

impl ProcessClassifier {
    pub fn new(baseline_cpu_percent: f64) -> Self {
        Self {
            baseline_cpu_percent,
        }
    }

    pub fn classify(&self, process: &ProcessSnapshot) -> Classification {
        let score = rule_score(process, self.baseline_cpu_percent);

        if score > CRITICAL_SCORE {
            return Classification {
                label: ProcessLabel::Critical,
                is_anomaly: true,
            };
        }
        if score > WARNING_SCORE {
            return Classification {
                label: ProcessLabel::Warning,
                is_anomaly: true,
            };
        }

        let cpu = clamp_percent(process.cpu_percent);
        let memory = clamp_percent(process.memory_percent);
        let label = if cpu > MONITOR_PERCENT || memory > MONITOR_PERCENT {
            ProcessLabel::Monitor
        } else {
            ProcessLabel::Normal
        };

        Classification {
            label,
            is_anomaly: false,
        }
    }
}

impl Default for ProcessClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE_CPU_PERCENT)
    }
}
