use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::Recommendation;
use crate::history::{AnomalyStats, HistoryStore};

mod payload;

use payload::build_json_payload;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize report: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to write report {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealthSummary {
    #[serde(rename = "averageCPU")]
    pub average_cpu: Option<f64>,
    #[serde(rename = "averageMemory")]
    pub average_memory: Option<f64>,
    #[serde(rename = "peakCPU")]
    pub peak_cpu: Option<f64>,
    #[serde(rename = "peakMemory")]
    pub peak_memory: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStatistics {
    pub total_processes_monitored: usize,
    pub average_processes: Option<f64>,
    pub max_concurrent_processes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub generated_at: String,
    pub monitoring_duration_seconds: u64,
    pub system_health_summary: SystemHealthSummary,
    pub process_statistics: ProcessStatistics,
    pub anomalies_detected: AnomalyStats,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip)]
    generated_on: String,
}

impl AnalysisReport {
    pub fn file_name(&self) -> String {
        format!("process-analysis-report-{}.json", self.generated_on)
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ExportError> {
        build_json_payload(self)
    }
}

/// Report over the retained window; duration counts retained ticks, not wall time.
pub fn build_report(
    history: &HistoryStore,
    monitor_interval_secs: u64,
    generated_at: DateTime<Utc>,
) -> AnalysisReport {
    let summary = history.summarize();
    let retained = history.len();

    AnalysisReport {
        generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        monitoring_duration_seconds: (retained as u64).saturating_mul(monitor_interval_secs),
        system_health_summary: SystemHealthSummary {
            average_cpu: summary.as_ref().map(|value| value.average_cpu),
            average_memory: summary.as_ref().map(|value| value.average_memory),
            peak_cpu: summary.as_ref().map(|value| value.peak_cpu),
            peak_memory: summary.as_ref().map(|value| value.peak_memory),
        },
        process_statistics: ProcessStatistics {
            total_processes_monitored: retained,
            average_processes: summary.as_ref().map(|value| value.average_processes),
            max_concurrent_processes: summary.as_ref().map(|value| value.max_concurrent_processes),
        },
        anomalies_detected: history.anomaly_stats(),
        recommendations: history.recommendation_history(),
        generated_on: generated_at.format("%Y-%m-%d").to_string(),
    }
}

pub fn write_report(
    report: &AnalysisReport,
    dir: impl AsRef<Path>,
) -> Result<PathBuf, ExportError> {
    let path = dir.as_ref().join(report.file_name());
    let body = report.to_json()?;

    std::fs::write(&path, body).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::analysis::AnalysisEngine;
    use crate::telemetry::{ProcessSnapshot, SystemSnapshot, Telemetry};

    use super::{build_report, write_report};

    fn engine_with_ticks() -> AnalysisEngine {
        let mut engine = AnalysisEngine::default();
        let ticks = [
            (30.0, 40.0, 150, vec![ProcessSnapshot::new(1, "chrome.exe", 95.0, 85.0)]),
            (90.0, 60.0, 170, vec![]),
        ];

        for (cpu, memory, total, processes) in ticks {
            let telemetry = Telemetry::new(SystemSnapshot::new(cpu, memory, total), processes);
            let analysis = engine.analyze(&telemetry.processes, &telemetry.system);
            engine.record(telemetry, analysis, Utc::now());
        }
        engine
    }

    #[test]
    fn report_aggregates_history_and_logs() {
        let engine = engine_with_ticks();
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();

        let report = build_report(engine.history(), 2, generated_at);

        assert_eq!(report.generated_at, "2026-03-14T09:30:00.000Z");
        assert_eq!(report.monitoring_duration_seconds, 4);
        assert_eq!(report.system_health_summary.average_cpu, Some(60.0));
        assert_eq!(report.system_health_summary.peak_cpu, Some(90.0));
        assert_eq!(report.system_health_summary.average_memory, Some(50.0));
        assert_eq!(report.system_health_summary.peak_memory, Some(60.0));
        assert_eq!(report.process_statistics.total_processes_monitored, 2);
        assert_eq!(report.process_statistics.average_processes, Some(160.0));
        assert_eq!(report.process_statistics.max_concurrent_processes, Some(170));
        assert_eq!(report.anomalies_detected.total_detected, 1);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.file_name(), "process-analysis-report-2026-03-14.json");
    }

    #[test]
    fn report_json_uses_export_field_names() {
        let engine = engine_with_ticks();
        let report = build_report(engine.history(), 2, Utc::now());

        let body = report.to_json().expect("report should serialize");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("valid json");

        for key in [
            "generatedAt",
            "monitoringDurationSeconds",
            "systemHealthSummary",
            "processStatistics",
            "anomaliesDetected",
            "recommendations",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("generatedOn").is_none());
        assert!(value["systemHealthSummary"]["averageCPU"].is_number());
        assert_eq!(value["anomaliesDetected"]["totalDetected"], 1);
        assert_eq!(value["anomaliesDetected"]["recent"][0]["processName"], "chrome.exe");
        assert_eq!(value["recommendations"][0]["type"], "system");
    }

    #[test]
    fn empty_history_reports_nulls() {
        let engine = AnalysisEngine::default();
        let report = build_report(engine.history(), 2, Utc::now());

        assert_eq!(report.monitoring_duration_seconds, 0);
        assert_eq!(report.system_health_summary.average_cpu, None);
        assert_eq!(report.process_statistics.max_concurrent_processes, None);

        let body = report.to_json().expect("report should serialize");
        let value: serde_json::Value = serde_json::from_slice(&body).expect("valid json");
        assert!(value["systemHealthSummary"]["peakMemory"].is_null());
    }

    #[test]
    fn writes_report_under_conventional_name() {
        let temp = tempfile::tempdir().expect("temp dir");
        let engine = engine_with_ticks();
        let generated_at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let report = build_report(engine.history(), 2, generated_at);

        let path = write_report(&report, temp.path()).expect("report should be written");

        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("process-analysis-report-2026-01-02.json")
        );
        let written = std::fs::read(&path).expect("read report");
        let value: serde_json::Value = serde_json::from_slice(&written).expect("valid json");
        assert_eq!(value["monitoringDurationSeconds"], 4);
    }

    #[test]
    fn write_into_missing_directory_fails_with_path() {
        let temp = tempfile::tempdir().expect("temp dir");
        let engine = AnalysisEngine::default();
        let report = build_report(engine.history(), 2, Utc::now());

        let error = write_report(&report, temp.path().join("missing"))
            .expect_err("missing directory should fail");
        assert!(error.to_string().contains("missing"));
    }
}
