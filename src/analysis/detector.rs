use crate::telemetry::{ProcessSnapshot, SystemSnapshot, clamp_percent};

use super::model::AnomalyRecord;

pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 0.8;

const EXTREME_CPU_PERCENT: f64 = 90.0;
const HIGH_CPU_PERCENT: f64 = 70.0;
const HIGH_MEMORY_PERCENT: f64 = 80.0;
const ELEVATED_MEMORY_PERCENT: f64 = 60.0;
const SPIKE_FACTOR: f64 = 2.0;

const EXTREME_CPU_WEIGHT: f64 = 0.4;
const HIGH_CPU_WEIGHT: f64 = 0.2;
const HIGH_MEMORY_WEIGHT: f64 = 0.3;
const ELEVATED_MEMORY_WEIGHT: f64 = 0.15;
const SPIKE_WEIGHT: f64 = 0.3;

/// Flags processes whose rule score exceeds a threshold.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    threshold: f64,
}

impl AnomalyDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rule score of `process` against the live host snapshot, in `[0, 1]`.
    pub fn score(&self, process: &ProcessSnapshot, system: &SystemSnapshot) -> f64 {
        rule_score(process, system.cpu_usage_percent)
    }

    pub fn detect(
        &self,
        processes: &[ProcessSnapshot],
        system: &SystemSnapshot,
    ) -> Vec<AnomalyRecord> {
        processes
            .iter()
            .filter_map(|process| {
                let score = self.score(process, system);
                if score <= self.threshold {
                    return None;
                }

                Some(AnomalyRecord {
                    pid: process.pid,
                    process_name: process.name.clone(),
                    score,
                    reason: anomaly_reason(process, system.cpu_usage_percent),
                })
            })
            .collect()
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DEFAULT_ANOMALY_THRESHOLD)
    }
}

/// Additive rule score of one process against a reference host CPU value.
///
/// CPU and memory each contribute one tier at most; the spike rule stacks on
/// top. Inputs are clamped to `[0, 100]` and the sum is capped at `1.0`.
pub(crate) fn rule_score(process: &ProcessSnapshot, reference_cpu_percent: f64) -> f64 {
    let cpu = clamp_percent(process.cpu_percent);
    let memory = clamp_percent(process.memory_percent);
    let mut score = 0.0;

    if cpu > EXTREME_CPU_PERCENT {
        score += EXTREME_CPU_WEIGHT;
    } else if cpu > HIGH_CPU_PERCENT {
        score += HIGH_CPU_WEIGHT;
    }

    if memory > HIGH_MEMORY_PERCENT {
        score += HIGH_MEMORY_WEIGHT;
    } else if memory > ELEVATED_MEMORY_PERCENT {
        score += ELEVATED_MEMORY_WEIGHT;
    }

    if is_cpu_spike(cpu, reference_cpu_percent) {
        score += SPIKE_WEIGHT;
    }

    f64::min(score, 1.0)
}

fn is_cpu_spike(cpu: f64, reference_cpu_percent: f64) -> bool {
    cpu > clamp_percent(reference_cpu_percent) * SPIKE_FACTOR
}

// The elevated memory tier scores without a phrase of its own.
fn anomaly_reason(process: &ProcessSnapshot, reference_cpu_percent: f64) -> String {
    let cpu = clamp_percent(process.cpu_percent);
    let memory = clamp_percent(process.memory_percent);
    let mut reasons = Vec::with_capacity(3);

    if cpu > EXTREME_CPU_PERCENT {
        reasons.push("Extremely high CPU usage");
    } else if cpu > HIGH_CPU_PERCENT {
        reasons.push("High CPU usage");
    }

    if memory > HIGH_MEMORY_PERCENT {
        reasons.push("High memory consumption");
    }

    if is_cpu_spike(cpu, reference_cpu_percent) {
        reasons.push("CPU usage spike");
    }

    reasons.join(", ")
}

#[cfg(test)]
mod tests {
    use crate::telemetry::{ProcessSnapshot, SystemSnapshot};

    use super::{AnomalyDetector, rule_score};

    fn system(cpu: f64) -> SystemSnapshot {
        SystemSnapshot::new(cpu, 40.0, 150)
    }

    #[test]
    fn stacked_rules_cap_at_one_with_ordered_reason() {
        let detector = AnomalyDetector::default();
        let process = ProcessSnapshot::new(1001, "chrome.exe", 95.0, 85.0);

        assert_eq!(detector.score(&process, &system(30.0)), 1.0);

        let anomalies = detector.detect(&[process], &system(30.0));
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].pid, 1001);
        assert_eq!(anomalies[0].process_name, "chrome.exe");
        assert_eq!(anomalies[0].score, 1.0);
        assert_eq!(
            anomalies[0].reason,
            "Extremely high CPU usage, High memory consumption, CPU usage spike"
        );
    }

    #[test]
    fn cpu_and_memory_tiers_are_mutually_exclusive() {
        // no spike: host CPU is high enough
        let host = 60.0;
        let extreme = ProcessSnapshot::new(1, "a", 95.0, 10.0);
        let high = ProcessSnapshot::new(2, "b", 75.0, 10.0);
        let heavy = ProcessSnapshot::new(3, "c", 10.0, 85.0);
        let elevated = ProcessSnapshot::new(4, "d", 10.0, 65.0);

        assert!((rule_score(&extreme, host) - 0.4).abs() < 1e-9);
        assert!((rule_score(&high, host) - 0.2).abs() < 1e-9);
        assert!((rule_score(&heavy, host) - 0.3).abs() < 1e-9);
        assert!((rule_score(&elevated, host) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn spike_rule_compares_against_twice_host_cpu() {
        let process = ProcessSnapshot::new(7, "python.exe", 41.0, 5.0);

        assert!((rule_score(&process, 20.0) - 0.3).abs() < 1e-9);
        assert_eq!(rule_score(&process, 20.5), 0.0);
    }

    #[test]
    fn score_stays_in_unit_interval_for_out_of_contract_input() {
        let detector = AnomalyDetector::default();
        let inputs = [
            (-50.0, -50.0, -10.0),
            (500.0, 500.0, 0.0),
            (f64::NAN, f64::NAN, f64::NAN),
            (f64::INFINITY, 99.0, 1.0),
            (100.0, 100.0, 100.0),
        ];

        for (cpu, memory, host) in inputs {
            let process = ProcessSnapshot::new(1, "x", cpu, memory);
            let score = detector.score(&process, &system(host));
            assert!((0.0..=1.0).contains(&score), "score {score} out of range");
        }
    }

    #[test]
    fn score_is_monotonic_in_cpu_and_memory() {
        let detector = AnomalyDetector::default();
        let host = system(35.0);

        for memory in [0.0, 61.0, 81.0] {
            let mut previous = 0.0;
            for step in 0..=100 {
                let process = ProcessSnapshot::new(1, "x", f64::from(step), memory);
                let score = detector.score(&process, &host);
                assert!(score >= previous, "cpu {step} memory {memory}");
                previous = score;
            }
        }

        for cpu in [0.0, 71.0, 91.0] {
            let mut previous = 0.0;
            for step in 0..=100 {
                let process = ProcessSnapshot::new(1, "x", cpu, f64::from(step));
                let score = detector.score(&process, &host);
                assert!(score >= previous, "memory {step} cpu {cpu}");
                previous = score;
            }
        }
    }

    #[test]
    fn detect_keeps_exactly_the_processes_above_threshold() {
        let detector = AnomalyDetector::default();
        let host = system(30.0);
        let mut processes = Vec::new();
        for cpu in [0.0, 35.0, 65.0, 75.0, 85.0, 92.0, 99.0] {
            for memory in [0.0, 62.0, 82.0] {
                let pid = processes.len() as u32;
                processes.push(ProcessSnapshot::new(pid, "p", cpu, memory));
            }
        }

        let anomalies = detector.detect(&processes, &host);

        for process in &processes {
            let flagged = anomalies.iter().any(|anomaly| anomaly.pid == process.pid);
            let score = detector.score(process, &host);
            assert_eq!(flagged, score > 0.8, "pid {} score {}", process.pid, score);
        }
        assert!(anomalies.iter().all(|anomaly| anomaly.score > 0.8));
    }

    #[test]
    fn elevated_memory_tier_has_no_reason_phrase() {
        let detector = AnomalyDetector::default();
        let process = ProcessSnapshot::new(9, "mysqld.exe", 95.0, 70.0);

        let anomalies = detector.detect(&[process], &system(30.0));
        assert_eq!(anomalies.len(), 1);
        assert!((anomalies[0].score - 0.85).abs() < 1e-9);
        assert_eq!(anomalies[0].reason, "Extremely high CPU usage, CPU usage spike");
    }
}
