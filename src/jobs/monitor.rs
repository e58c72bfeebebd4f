use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::analysis::AnalysisEngine;
use crate::telemetry::TelemetryProvider;

use super::observer::AnalysisObserver;

/// Handle to a running tick loop.
///
/// Stopping only prevents further ticks; a tick already in flight completes
/// and is recorded.
pub struct MonitorSchedule {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl MonitorSchedule {
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Waits for the loop to exit after [`stop`](Self::stop).
    pub async fn join(self) -> Result<(), JoinError> {
        self.handle.await
    }

    pub async fn shutdown(self) -> Result<(), JoinError> {
        self.stop();
        self.join().await
    }
}

/// Ticks once immediately, then at a fixed rate of `interval`; a tick that
/// overruns pushes the cadence back instead of queueing a burst.
pub fn start_monitor_job<P>(
    engine: Arc<Mutex<AnalysisEngine>>,
    mut provider: P,
    observers: Vec<Arc<dyn AnalysisObserver>>,
    interval: Duration,
) -> MonitorSchedule
where
    P: TelemetryProvider + Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut previous_tick: Option<Instant> = None;
        log::info!("monitor_job_started interval_secs={}", interval.as_secs());

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            if *stop_rx.borrow_and_update() {
                break;
            }

            let now = Instant::now();
            if let Some(previous) = previous_tick {
                let elapsed = now.duration_since(previous);
                let threshold = interval * 2;
                if elapsed > threshold {
                    log::warn!(
                        "monitor_loop_delayed elapsed_ms={} threshold_ms={}",
                        elapsed.as_millis(),
                        threshold.as_millis()
                    );
                }
            }
            previous_tick = Some(now);

            let outcome = {
                let mut engine = engine.lock().await;
                engine.tick(&mut provider).await
            };

            for observer in &observers {
                observer.on_tick(&outcome);
            }
        }

        log::info!("monitor_job_stopped");
    });

    MonitorSchedule { stop_tx, handle }
}
