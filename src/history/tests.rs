use chrono::{Duration, Utc};

use crate::analysis::{AnalysisResult, AnomalyRecord, Recommendation, RecommendationKind};
use crate::config::{History, LogRetention};
use crate::telemetry::SystemSnapshot;

use super::{HistoryEntry, HistoryStore};

fn entry(index: i64, cpu: f64, memory: f64, total_processes: u32) -> HistoryEntry {
    let timestamp = Utc::now() + Duration::seconds(index * 2);
    HistoryEntry {
        timestamp,
        processes: Vec::new(),
        system: SystemSnapshot::at(cpu, memory, total_processes, timestamp),
        analysis: AnalysisResult::default(),
    }
}

fn anomaly(pid: u32) -> AnomalyRecord {
    AnomalyRecord {
        pid,
        process_name: format!("proc-{pid}"),
        score: 0.9,
        reason: "CPU usage spike".to_string(),
    }
}

fn recommendation(index: usize) -> Recommendation {
    Recommendation {
        kind: RecommendationKind::System,
        message: format!("recommendation {index}"),
    }
}

#[test]
fn evicts_oldest_after_capacity_is_exceeded() {
    let mut store = HistoryStore::default();

    for index in 0..101 {
        store.record(entry(index, index as f64 / 2.0, 10.0, 100));
    }

    assert_eq!(store.len(), 100);
    let cpus: Vec<f64> = store
        .entries()
        .map(|item| item.system.cpu_usage_percent)
        .collect();
    assert_eq!(cpus.first().copied(), Some(0.5));
    assert_eq!(cpus.last().copied(), Some(50.0));
    assert!(cpus.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn never_holds_more_than_capacity() {
    let mut store = HistoryStore::from_config(&History {
        capacity: 3,
        ..History::default()
    });

    for index in 0..10 {
        store.record(entry(index, 10.0, 10.0, 100));
        assert!(store.len() <= 3);
    }
    assert_eq!(store.capacity(), 3);
}

#[test]
fn anomaly_stats_report_total_and_last_ten() {
    let mut store = HistoryStore::default();
    let batch: Vec<_> = (0..25).map(anomaly).collect();
    store.log_anomalies(&batch[..12]);
    store.log_anomalies(&batch[12..]);

    let stats = store.anomaly_stats();
    assert_eq!(stats.total_detected, 25);
    assert_eq!(stats.recent.len(), 10);
    assert_eq!(stats.recent.first().map(|item| item.pid), Some(15));
    assert_eq!(stats.recent.last().map(|item| item.pid), Some(24));
}

#[test]
fn recommendation_history_is_the_last_twenty() {
    for retention in [LogRetention::Capped, LogRetention::Unbounded] {
        let mut store = HistoryStore::from_config(&History {
            log_retention: retention,
            ..History::default()
        });
        let batch: Vec<_> = (0..30).map(recommendation).collect();
        store.log_recommendations(&batch);

        let history = store.recommendation_history();
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].message, "recommendation 10");
        assert_eq!(history[19].message, "recommendation 29");
    }
}

#[test]
fn summary_computes_means_and_peaks() {
    let mut store = HistoryStore::default();
    assert!(store.summarize().is_none());

    store.record(entry(0, 20.0, 40.0, 150));
    store.record(entry(1, 60.0, 50.0, 170));
    store.record(entry(2, 40.0, 90.0, 160));

    let summary = store.summarize().expect("summary should exist");
    assert_eq!(summary.entry_count, 3);
    assert!((summary.average_cpu - 40.0).abs() < 1e-9);
    assert!((summary.average_memory - 60.0).abs() < 1e-9);
    assert_eq!(summary.peak_cpu, 60.0);
    assert_eq!(summary.peak_memory, 90.0);
    assert!((summary.average_processes - 160.0).abs() < 1e-9);
    assert_eq!(summary.max_concurrent_processes, 170);
}

#[test]
fn trend_returns_latest_system_samples_in_order() {
    let mut store = HistoryStore::default();
    for index in 0..30 {
        store.record(entry(index, index as f64, 10.0, 100));
    }

    let trend = store.trend();
    assert_eq!(trend.len(), 20);
    assert_eq!(trend[0].cpu_usage_percent, 10.0);
    assert_eq!(trend[19].cpu_usage_percent, 29.0);
    assert_eq!(store.recent_system_samples(5).len(), 5);
    assert_eq!(
        store.latest().map(|item| item.system.cpu_usage_percent),
        Some(29.0)
    );
}
