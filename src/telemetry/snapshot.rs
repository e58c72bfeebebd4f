use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    Running,
    Sleeping,
    Idle,
    Stopped,
    Zombie,
    Unknown,
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProcessStatus::Running => "Running",
            ProcessStatus::Sleeping => "Sleeping",
            ProcessStatus::Idle => "Idle",
            ProcessStatus::Stopped => "Stopped",
            ProcessStatus::Zombie => "Zombie",
            ProcessStatus::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

/// One observation of one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSnapshot {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    #[serde(rename = "memoryMB")]
    pub memory_mb: u64,
    pub status: ProcessStatus,
}

impl ProcessSnapshot {
    pub fn new(pid: u32, name: impl Into<String>, cpu_percent: f64, memory_percent: f64) -> Self {
        Self {
            pid,
            name: name.into(),
            cpu_percent,
            memory_percent,
            memory_mb: 0,
            status: ProcessStatus::Running,
        }
    }

    pub fn with_memory_mb(mut self, memory_mb: u64) -> Self {
        self.memory_mb = memory_mb;
        self
    }

    pub fn with_status(mut self, status: ProcessStatus) -> Self {
        self.status = status;
        self
    }
}

/// One observation of the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub total_processes: u32,
    pub timestamp: DateTime<Utc>,
}

impl SystemSnapshot {
    pub fn new(cpu_usage_percent: f64, memory_usage_percent: f64, total_processes: u32) -> Self {
        Self::at(
            cpu_usage_percent,
            memory_usage_percent,
            total_processes,
            Utc::now(),
        )
    }

    pub fn at(
        cpu_usage_percent: f64,
        memory_usage_percent: f64,
        total_processes: u32,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            cpu_usage_percent,
            memory_usage_percent,
            total_processes,
            timestamp,
        }
    }
}

/// Everything the acquisition side hands over for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub system: SystemSnapshot,
    pub processes: Vec<ProcessSnapshot>,
}

impl Telemetry {
    pub fn new(system: SystemSnapshot, processes: Vec<ProcessSnapshot>) -> Self {
        Self { system, processes }
    }
}

/// Clamps a reported percentage into `[0, 100]`; NaN reads as zero.
pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
