mod provider;
mod snapshot;

#[cfg(test)]
pub(crate) use provider::{MockTelemetryProvider, StalledTelemetryProvider};
pub use provider::{
    ActiveTelemetryProvider, RealTelemetryProvider, SimulatedTelemetryProvider, TelemetryError,
    TelemetryProvider,
};
pub(crate) use snapshot::clamp_percent;
pub use snapshot::{ProcessSnapshot, ProcessStatus, SystemSnapshot, Telemetry};
