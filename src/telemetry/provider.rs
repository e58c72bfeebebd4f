use std::future::Future;

use sysinfo::{CpuExt, PidExt, ProcessExt, System, SystemExt};
use thiserror::Error;

use crate::config::SimulationProfile;

use super::snapshot::{ProcessSnapshot, ProcessStatus, SystemSnapshot, Telemetry};

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TelemetryError {
    #[error("telemetry source unavailable: {0}")]
    Unavailable(String),
    #[error("telemetry collection timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl TelemetryError {
    #[cfg(test)]
    pub(crate) fn mock_telemetry_exhausted() -> Self {
        Self::Unavailable("mock telemetry exhausted".to_string())
    }
}

pub trait TelemetryProvider {
    fn collect(&mut self) -> impl Future<Output = Result<Telemetry, TelemetryError>> + Send;
}

pub enum ActiveTelemetryProvider {
    Real(Box<RealTelemetryProvider>),
    Simulated(SimulatedTelemetryProvider),
}

impl ActiveTelemetryProvider {
    pub fn new(simulation_enabled: bool, profile: SimulationProfile) -> Self {
        if simulation_enabled {
            Self::Simulated(SimulatedTelemetryProvider::new(profile))
        } else {
            Self::Real(Box::new(RealTelemetryProvider::new()))
        }
    }
}

impl TelemetryProvider for ActiveTelemetryProvider {
    async fn collect(&mut self) -> Result<Telemetry, TelemetryError> {
        match self {
            ActiveTelemetryProvider::Real(provider) => provider.collect().await,
            ActiveTelemetryProvider::Simulated(provider) => provider.collect().await,
        }
    }
}

pub struct RealTelemetryProvider {
    system: System,
}

impl RealTelemetryProvider {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl Default for RealTelemetryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryProvider for RealTelemetryProvider {
    async fn collect(&mut self) -> Result<Telemetry, TelemetryError> {
        self.system.refresh_cpu();
        self.system.refresh_memory();
        self.system.refresh_processes();

        let total_memory = self.system.total_memory();
        if total_memory == 0 {
            return Err(TelemetryError::Unavailable(
                "total memory reported as zero".to_string(),
            ));
        }

        let cpu_count = self.system.cpus().len().max(1) as f64;
        let cpu = f64::from(self.system.global_cpu_info().cpu_usage());
        let memory = self.system.used_memory() as f64 / total_memory as f64 * 100.0;

        let mut processes: Vec<ProcessSnapshot> = self
            .system
            .processes()
            .iter()
            .map(|(pid, process)| ProcessSnapshot {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                // sysinfo reports per-core usage; normalize to the whole host
                cpu_percent: (f64::from(process.cpu_usage()) / cpu_count).clamp(0.0, 100.0),
                memory_percent: process.memory() as f64 / total_memory as f64 * 100.0,
                memory_mb: process.memory() / BYTES_PER_MB,
                status: map_status(process.status()),
            })
            .collect();
        sort_by_cpu_desc(&mut processes);

        let system = SystemSnapshot::new(
            cpu.clamp(0.0, 100.0),
            memory.clamp(0.0, 100.0),
            u32::try_from(processes.len()).unwrap_or(u32::MAX),
        );

        Ok(Telemetry::new(system, processes))
    }
}

fn map_status(status: sysinfo::ProcessStatus) -> ProcessStatus {
    match status {
        sysinfo::ProcessStatus::Run => ProcessStatus::Running,
        sysinfo::ProcessStatus::Sleep => ProcessStatus::Sleeping,
        sysinfo::ProcessStatus::Idle | sysinfo::ProcessStatus::Parked => ProcessStatus::Idle,
        sysinfo::ProcessStatus::Stop | sysinfo::ProcessStatus::Tracing => ProcessStatus::Stopped,
        sysinfo::ProcessStatus::Zombie | sysinfo::ProcessStatus::Dead => ProcessStatus::Zombie,
        _ => ProcessStatus::Unknown,
    }
}

fn sort_by_cpu_desc(processes: &mut [ProcessSnapshot]) {
    processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
}

const SIMULATED_PROCESS_NAMES: [&str; 10] = [
    "chrome.exe",
    "node.exe",
    "code.exe",
    "mysqld.exe",
    "python.exe",
    "explorer.exe",
    "svchost.exe",
    "winlogon.exe",
    "csrss.exe",
    "system",
];
const SIMULATED_PROCESS_COUNT: u32 = 15;
const SIMULATED_BASE_PID: u32 = 1000;

pub struct SimulatedTelemetryProvider {
    tick: u64,
    profile: SimulationProfile,
}

impl SimulatedTelemetryProvider {
    pub fn new(profile: SimulationProfile) -> Self {
        Self { tick: 0, profile }
    }

    fn load_offset(&self) -> f64 {
        match self.profile {
            SimulationProfile::Default => 0.0,
            SimulationProfile::Stress => 35.0,
        }
    }
}

impl TelemetryProvider for SimulatedTelemetryProvider {
    async fn collect(&mut self) -> Result<Telemetry, TelemetryError> {
        self.tick = self.tick.saturating_add(1);
        let phase = self.tick as f64 / 8.0;
        let offset = self.load_offset();

        let mut cpu = 45.0 + offset + (phase.sin() * 20.0);
        let mut memory = 55.0 + (offset / 2.0) + ((phase * 0.7).sin() * 12.0);
        if self.tick.is_multiple_of(30) {
            cpu = 97.0;
        }
        if self.tick.is_multiple_of(47) {
            memory = 96.0;
        }

        let mut processes: Vec<ProcessSnapshot> = (0..SIMULATED_PROCESS_COUNT)
            .map(|index| {
                let seed = phase + f64::from(index) * 1.7;
                let mut process_cpu = (seed.sin().abs() * 60.0) + (offset / 2.0);
                if (self.tick + u64::from(index)).is_multiple_of(23) {
                    process_cpu = 96.0;
                }
                let process_memory = ((seed * 0.5).cos().abs() * 45.0) + (offset / 3.0);
                let name = SIMULATED_PROCESS_NAMES[index as usize % SIMULATED_PROCESS_NAMES.len()];

                ProcessSnapshot::new(
                    SIMULATED_BASE_PID + index,
                    name,
                    process_cpu.clamp(0.0, 100.0),
                    process_memory.clamp(0.0, 100.0),
                )
                .with_memory_mb((process_memory * 50.0) as u64)
            })
            .collect();
        sort_by_cpu_desc(&mut processes);

        let total_processes = 150 + (self.tick % 50) as u32;
        let system = SystemSnapshot::new(
            cpu.clamp(0.0, 100.0),
            memory.clamp(0.0, 100.0),
            total_processes,
        );

        Ok(Telemetry::new(system, processes))
    }
}

#[cfg(test)]
pub(crate) struct MockTelemetryProvider {
    sequence: Vec<Result<Telemetry, TelemetryError>>,
}

#[cfg(test)]
impl MockTelemetryProvider {
    pub(crate) fn new(sequence: Vec<Result<Telemetry, TelemetryError>>) -> Self {
        Self { sequence }
    }
}

#[cfg(test)]
impl TelemetryProvider for MockTelemetryProvider {
    async fn collect(&mut self) -> Result<Telemetry, TelemetryError> {
        if self.sequence.is_empty() {
            return Err(TelemetryError::mock_telemetry_exhausted());
        }

        self.sequence.remove(0)
    }
}

/// Never completes a collection, like a source that stopped answering.
#[cfg(test)]
pub(crate) struct StalledTelemetryProvider;

#[cfg(test)]
impl TelemetryProvider for StalledTelemetryProvider {
    async fn collect(&mut self) -> Result<Telemetry, TelemetryError> {
        std::future::pending().await
    }
}
