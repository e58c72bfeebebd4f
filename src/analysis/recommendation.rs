use crate::telemetry::{ProcessSnapshot, SystemSnapshot, clamp_percent};

use super::model::{AnomalyRecord, Recommendation, RecommendationKind};

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

const SYSTEM_CPU_PERCENT: f64 = 80.0;
const SYSTEM_MEMORY_PERCENT: f64 = 85.0;
const PROCESS_CPU_PERCENT: f64 = 80.0;
const BUSY_PROCESS_COUNT: usize = 3;
const ANOMALY_COUNT: usize = 5;

/// Output of one recommendation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationSet {
    /// Every rule that fired, in rule order.
    pub generated: Vec<Recommendation>,
    /// Prefix of `generated` handed to collaborators.
    pub returned: Vec<Recommendation>,
}

#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    max_recommendations: usize,
}

impl RecommendationEngine {
    pub fn new(max_recommendations: usize) -> Self {
        Self {
            max_recommendations,
        }
    }

    pub fn recommend(
        &self,
        processes: &[ProcessSnapshot],
        system: &SystemSnapshot,
        anomalies: &[AnomalyRecord],
    ) -> Vec<Recommendation> {
        self.evaluate(processes, system, anomalies).returned
    }

    /// Runs every rule in order; truncation keeps the first matches, not the most severe.
    pub fn evaluate(
        &self,
        processes: &[ProcessSnapshot],
        system: &SystemSnapshot,
        anomalies: &[AnomalyRecord],
    ) -> RecommendationSet {
        let mut generated = Vec::new();

        let cpu = clamp_percent(system.cpu_usage_percent);
        if cpu > SYSTEM_CPU_PERCENT {
            generated.push(Recommendation {
                kind: RecommendationKind::System,
                message: format!(
                    "High system CPU usage ({:.1}%). Consider closing unnecessary applications.",
                    cpu
                ),
            });
        }

        let memory = clamp_percent(system.memory_usage_percent);
        if memory > SYSTEM_MEMORY_PERCENT {
            generated.push(Recommendation {
                kind: RecommendationKind::System,
                message: format!(
                    "High memory usage ({:.1}%). Consider adding more RAM or closing memory-intensive applications.",
                    memory
                ),
            });
        }

        let busy_processes = processes
            .iter()
            .filter(|process| clamp_percent(process.cpu_percent) > PROCESS_CPU_PERCENT)
            .count();
        if busy_processes > BUSY_PROCESS_COUNT {
            generated.push(Recommendation {
                kind: RecommendationKind::Process,
                message: format!(
                    "Multiple processes ({}) using high CPU. Investigate potential resource conflicts.",
                    busy_processes
                ),
            });
        }

        if anomalies.len() > ANOMALY_COUNT {
            generated.push(Recommendation {
                kind: RecommendationKind::Security,
                message: format!(
                    "Multiple anomalous processes detected ({}). Consider security scan.",
                    anomalies.len()
                ),
            });
        }

        let returned = generated
            .iter()
            .take(self.max_recommendations)
            .cloned()
            .collect();

        RecommendationSet {
            generated,
            returned,
        }
    }
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECOMMENDATIONS)
    }
}
