use std::fmt;

use serde::Serialize;

use crate::telemetry::{SystemSnapshot, clamp_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SystemHealth {
    /// Starts from 100 and takes 20 off for each of CPU > 80, CPU > 90, memory > 80, memory > 90.
    pub fn grade(system: &SystemSnapshot) -> Self {
        let cpu = clamp_percent(system.cpu_usage_percent);
        let memory = clamp_percent(system.memory_usage_percent);
        let penalties = [cpu > 80.0, cpu > 90.0, memory > 80.0, memory > 90.0]
            .into_iter()
            .filter(|hit| *hit)
            .count() as u32;
        let score = 100 - penalties * 20;

        match score {
            80.. => SystemHealth::Excellent,
            60..=79 => SystemHealth::Good,
            40..=59 => SystemHealth::Fair,
            _ => SystemHealth::Poor,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemHealth::Excellent => "Excellent",
            SystemHealth::Good => "Good",
            SystemHealth::Fair => "Fair",
            SystemHealth::Poor => "Poor",
        }
    }
}

impl fmt::Display for SystemHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
