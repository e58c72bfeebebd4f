use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::analysis::{AlertSeverity, TickOutcome};

/// Receives every tick outcome; presentation layers subscribe through this.
pub trait AnalysisObserver: Send + Sync {
    fn on_tick(&self, outcome: &TickOutcome);
}

/// Writes each outcome to the log.
#[derive(Debug, Default)]
pub struct LogObserver;

impl AnalysisObserver for LogObserver {
    fn on_tick(&self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Analyzed(report) => {
                let flagged = report
                    .processes
                    .iter()
                    .filter(|row| row.classification.is_anomaly)
                    .count();
                tracing::info!(
                    target: "presentation",
                    cpu = report.system.cpu_usage_percent,
                    memory = report.system.memory_usage_percent,
                    total_processes = report.system.total_processes,
                    health = report.health.as_str(),
                    flagged_rows = flagged,
                    "tick_rendered"
                );

                for anomaly in &report.analysis.anomalies {
                    log::info!(
                        "anomaly pid={} name={} score={:.2} reason={}",
                        anomaly.pid,
                        anomaly.process_name,
                        anomaly.score,
                        anomaly.reason
                    );
                }
                for recommendation in &report.analysis.recommendations {
                    log::info!(
                        "recommendation kind={} message={}",
                        recommendation.kind,
                        recommendation.message
                    );
                }
            }
            TickOutcome::CollectionFailed { error, .. } => {
                log::error!("tick_collection_failed error={}", error);
            }
        }

        for alert in outcome.alerts() {
            match alert.severity {
                AlertSeverity::High => log::warn!(
                    "alert level={} title={} message={}",
                    alert.severity,
                    alert.title,
                    alert.message
                ),
                AlertSeverity::Medium | AlertSeverity::Low => log::info!(
                    "alert level={} title={} message={}",
                    alert.severity,
                    alert.title,
                    alert.message
                ),
            }
        }
    }
}

/// Forwards outcomes into a channel for an async consumer.
pub struct ChannelObserver {
    sender: UnboundedSender<TickOutcome>,
}

impl ChannelObserver {
    pub fn new() -> (Self, UnboundedReceiver<TickOutcome>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl AnalysisObserver for ChannelObserver {
    fn on_tick(&self, outcome: &TickOutcome) {
        if self.sender.send(outcome.clone()).is_err() {
            log::debug!("observer_channel_closed");
        }
    }
}
