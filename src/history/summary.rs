use serde::Serialize;

use super::HistoryEntry;

/// Aggregates over the retained history window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub entry_count: usize,
    pub average_cpu: f64,
    pub peak_cpu: f64,
    pub average_memory: f64,
    pub peak_memory: f64,
    pub average_processes: f64,
    pub max_concurrent_processes: u32,
    pub anomaly_count: usize,
    pub alert_count: usize,
}

pub(super) fn summarize_entries<'a, I>(entries: I) -> Option<HistorySummary>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let mut entries = entries.into_iter();
    let first = entries.next()?;

    let mut count: usize = 1;
    let mut cpu_sum = first.system.cpu_usage_percent;
    let mut memory_sum = first.system.memory_usage_percent;
    let mut process_sum = f64::from(first.system.total_processes);
    let mut peak_cpu = first.system.cpu_usage_percent;
    let mut peak_memory = first.system.memory_usage_percent;
    let mut max_processes = first.system.total_processes;
    let mut anomaly_count = first.analysis.anomalies.len();
    let mut alert_count = first.analysis.alerts.len();

    for entry in entries {
        let system = &entry.system;
        count += 1;
        cpu_sum += system.cpu_usage_percent;
        memory_sum += system.memory_usage_percent;
        process_sum += f64::from(system.total_processes);
        peak_cpu = peak_cpu.max(system.cpu_usage_percent);
        peak_memory = peak_memory.max(system.memory_usage_percent);
        max_processes = max_processes.max(system.total_processes);
        anomaly_count += entry.analysis.anomalies.len();
        alert_count += entry.analysis.alerts.len();
    }

    Some(HistorySummary {
        entry_count: count,
        average_cpu: cpu_sum / count as f64,
        peak_cpu,
        average_memory: memory_sum / count as f64,
        peak_memory,
        average_processes: process_sum / count as f64,
        max_concurrent_processes: max_processes,
        anomaly_count,
        alert_count,
    })
}
