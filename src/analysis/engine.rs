use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::history::{HistoryEntry, HistoryStore};
use crate::telemetry::{
    ProcessSnapshot, SystemSnapshot, Telemetry, TelemetryError, TelemetryProvider,
};

use super::{
    alerts::AlertEngine,
    classifier::{Classification, ProcessClassifier},
    detector::AnomalyDetector,
    health::SystemHealth,
    model::{Alert, AnalysisResult},
    recommendation::RecommendationEngine,
};

/// One row of the process table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRow {
    pub process: ProcessSnapshot,
    pub classification: Classification,
}

/// What presentation receives after a successful tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub system: SystemSnapshot,
    pub health: SystemHealth,
    pub processes: Vec<ProcessRow>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Analyzed(TickReport),
    CollectionFailed { alert: Alert, error: TelemetryError },
}

impl TickOutcome {
    /// Alerts to surface for this tick, including the synthetic collection alert.
    pub fn alerts(&self) -> &[Alert] {
        match self {
            TickOutcome::Analyzed(report) => &report.analysis.alerts,
            TickOutcome::CollectionFailed { alert, .. } => std::slice::from_ref(alert),
        }
    }
}

/// Runs the scoring pipeline for one tick and owns everything it retains.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    detector: AnomalyDetector,
    classifier: ProcessClassifier,
    recommender: RecommendationEngine,
    alerter: AlertEngine,
    history: HistoryStore,
    collection_timeout: Duration,
}

const DEFAULT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(2);

impl AnalysisEngine {
    pub fn new(
        detector: AnomalyDetector,
        classifier: ProcessClassifier,
        recommender: RecommendationEngine,
        history: HistoryStore,
    ) -> Self {
        Self {
            detector,
            classifier,
            recommender,
            alerter: AlertEngine::new(),
            history,
            collection_timeout: DEFAULT_COLLECTION_TIMEOUT,
        }
    }

    /// Deadline after which a pending collection counts as failed.
    pub fn with_collection_timeout(mut self, timeout: Duration) -> Self {
        self.collection_timeout = timeout;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            AnomalyDetector::new(config.analysis.anomaly_threshold),
            ProcessClassifier::new(config.analysis.classifier_baseline_cpu),
            RecommendationEngine::new(config.analysis.max_recommendations),
            HistoryStore::from_config(&config.history),
        )
        .with_collection_timeout(config.collection_timeout())
    }

    /// Detection, recommendations and alerts for one snapshot.
    ///
    /// Appends detected anomalies and every generated recommendation to the
    /// history logs; does not record a history entry.
    pub fn analyze(
        &mut self,
        processes: &[ProcessSnapshot],
        system: &SystemSnapshot,
    ) -> AnalysisResult {
        let anomalies = self.detector.detect(processes, system);
        self.history.log_anomalies(&anomalies);

        let recommendations = self.recommender.evaluate(processes, system, &anomalies);
        self.history.log_recommendations(&recommendations.generated);

        let alerts = self.alerter.alert(processes, system, &anomalies);

        AnalysisResult {
            anomalies,
            recommendations: recommendations.returned,
            alerts,
        }
    }

    pub fn classify(&self, process: &ProcessSnapshot) -> Classification {
        self.classifier.classify(process)
    }

    pub fn process_rows(&self, processes: &[ProcessSnapshot]) -> Vec<ProcessRow> {
        processes
            .iter()
            .map(|process| ProcessRow {
                process: process.clone(),
                classification: self.classify(process),
            })
            .collect()
    }

    pub fn record(&mut self, telemetry: Telemetry, analysis: AnalysisResult, at: DateTime<Utc>) {
        self.history.record(HistoryEntry {
            timestamp: at,
            processes: telemetry.processes,
            system: telemetry.system,
            analysis,
        });
    }

    /// Collects, analyzes and records one tick.
    ///
    /// A collection that fails or outlives the collection timeout is not
    /// retried; it yields the synthetic alert and leaves history untouched.
    pub async fn tick<P>(&mut self, provider: &mut P) -> TickOutcome
    where
        P: TelemetryProvider + Send,
    {
        let collected = tokio::time::timeout(self.collection_timeout, provider.collect())
            .await
            .unwrap_or_else(|_| {
                Err(TelemetryError::Timeout {
                    timeout_secs: self.collection_timeout.as_secs(),
                })
            });

        let telemetry = match collected {
            Ok(telemetry) => telemetry,
            Err(error) => {
                log::warn!("telemetry_collection_failed error={}", error);
                return TickOutcome::CollectionFailed {
                    alert: Alert::collection_failure(),
                    error,
                };
            }
        };

        TickOutcome::Analyzed(self.analyze_and_record(telemetry))
    }

    fn analyze_and_record(&mut self, telemetry: Telemetry) -> TickReport {
        let analysis = self.analyze(&telemetry.processes, &telemetry.system);
        let health = SystemHealth::grade(&telemetry.system);
        let rows = self.process_rows(&telemetry.processes);

        tracing::info!(
            target: "analysis",
            module = "analysis",
            cpu = telemetry.system.cpu_usage_percent,
            memory = telemetry.system.memory_usage_percent,
            processes = telemetry.processes.len(),
            health = health.as_str(),
            anomalies = analysis.anomalies.len(),
            recommendations = analysis.recommendations.len(),
            alerts = analysis.alerts.len(),
            "analysis_tick"
        );

        let report = TickReport {
            system: telemetry.system.clone(),
            health,
            processes: rows,
            analysis: analysis.clone(),
        };
        self.record(telemetry, analysis, Utc::now());

        report
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    pub fn collection_timeout(&self) -> Duration {
        self.collection_timeout
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
