use crate::telemetry::{ProcessSnapshot, SystemSnapshot, clamp_percent};

use super::model::{Alert, AlertKind, AlertSeverity, AnomalyRecord};

const CRITICAL_PERCENT: f64 = 95.0;

/// Builds this tick's alerts from the current snapshot only; nothing carries over between ticks.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine;

impl AlertEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn alert(
        &self,
        processes: &[ProcessSnapshot],
        system: &SystemSnapshot,
        anomalies: &[AnomalyRecord],
    ) -> Vec<Alert> {
        let mut alerts = Vec::new();

        let cpu = clamp_percent(system.cpu_usage_percent);
        if cpu > CRITICAL_PERCENT {
            alerts.push(Alert {
                kind: AlertKind::CpuOverload,
                title: "CRITICAL: System CPU Overload".to_string(),
                message: format!("CPU usage at {:.1}% - System may become unresponsive", cpu),
                severity: AlertSeverity::High,
            });
        }

        let memory = clamp_percent(system.memory_usage_percent);
        if memory > CRITICAL_PERCENT {
            alerts.push(Alert {
                kind: AlertKind::MemoryExhaustion,
                title: "CRITICAL: Memory Exhaustion".to_string(),
                message: format!("Memory usage at {:.1}% - System may crash", memory),
                severity: AlertSeverity::High,
            });
        }

        if !anomalies.is_empty() {
            alerts.push(Alert {
                kind: AlertKind::AnomaliesDetected,
                title: "ANOMALIES DETECTED".to_string(),
                message: format!("{} anomalous processes identified by AI", anomalies.len()),
                severity: AlertSeverity::Medium,
            });
        }

        alerts.extend(
            processes
                .iter()
                .filter(|process| is_critical_process(process))
                .map(|process| Alert {
                    kind: AlertKind::ProcessCritical,
                    title: "PROCESS CRITICAL".to_string(),
                    message: format!(
                        "{} (PID: {}) using excessive resources",
                        process.name, process.pid
                    ),
                    severity: AlertSeverity::High,
                }),
        );

        alerts
    }
}

fn is_critical_process(process: &ProcessSnapshot) -> bool {
    clamp_percent(process.cpu_percent) > CRITICAL_PERCENT
        || clamp_percent(process.memory_percent) > CRITICAL_PERCENT
}

#[cfg(test)]
mod tests {
    use crate::analysis::{AlertKind, AlertSeverity, AnomalyRecord};
    use crate::telemetry::{ProcessSnapshot, SystemSnapshot};

    use super::AlertEngine;

    #[test]
    fn memory_exhaustion_names_the_percentage() {
        let alerts = AlertEngine::new().alert(&[], &SystemSnapshot::new(40.0, 97.0, 150), &[]);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::MemoryExhaustion);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert!(alerts[0].title.contains("Memory Exhaustion"));
        assert!(alerts[0].message.contains("97.0%"));
    }

    #[test]
    fn cpu_overload_is_high_severity() {
        let alerts = AlertEngine::new().alert(&[], &SystemSnapshot::new(96.5, 20.0, 150), &[]);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::CpuOverload);
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert!(alerts[0].message.contains("96.5%"));
    }

    #[test]
    fn anomaly_summary_is_a_single_medium_alert() {
        let anomalies: Vec<_> = (0..6)
            .map(|pid| AnomalyRecord {
                pid,
                process_name: "worker".to_string(),
                score: 0.9,
                reason: "CPU usage spike".to_string(),
            })
            .collect();

        let alerts =
            AlertEngine::new().alert(&[], &SystemSnapshot::new(20.0, 20.0, 150), &anomalies);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::AnomaliesDetected);
        assert_eq!(alerts[0].severity, AlertSeverity::Medium);
        assert_eq!(alerts[0].message, "6 anomalous processes identified by AI");
    }

    #[test]
    fn fans_out_one_alert_per_critical_process() {
        let processes = vec![
            ProcessSnapshot::new(1, "hog", 99.0, 10.0),
            ProcessSnapshot::new(2, "leak", 10.0, 96.0),
            ProcessSnapshot::new(3, "calm", 95.0, 95.0),
            ProcessSnapshot::new(4, "both", 99.0, 99.0),
        ];

        let alerts =
            AlertEngine::new().alert(&processes, &SystemSnapshot::new(99.0, 99.0, 150), &[]);

        let aggregate = alerts
            .iter()
            .filter(|alert| alert.kind != AlertKind::ProcessCritical)
            .count();
        let per_process: Vec<_> = alerts
            .iter()
            .filter(|alert| alert.kind == AlertKind::ProcessCritical)
            .collect();

        assert_eq!(aggregate, 2);
        assert_eq!(per_process.len(), 3);
        assert!(per_process[0].message.contains("hog (PID: 1)"));
        assert!(per_process.iter().all(|alert| alert.severity == AlertSeverity::High));
    }

    #[test]
    fn quiet_tick_raises_nothing() {
        let processes = vec![ProcessSnapshot::new(1, "idle", 2.0, 3.0)];
        let alerts =
            AlertEngine::new().alert(&processes, &SystemSnapshot::new(10.0, 30.0, 150), &[]);
        assert!(alerts.is_empty());
    }
}
