use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use process_analyzer::analysis::AnalysisEngine;
use process_analyzer::config::{Config, load_config_or_default};
use process_analyzer::export::{build_report, write_report};
use process_analyzer::jobs::{AnalysisObserver, LogObserver, start_monitor_job};
use process_analyzer::telemetry::ActiveTelemetryProvider;

const CONFIG_PATH: &str = "config.toml";

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

async fn export_on_shutdown(config: &Config, engine: &Arc<Mutex<AnalysisEngine>>) {
    if !config.export.enabled {
        return;
    }

    let report = {
        let engine = engine.lock().await;
        build_report(engine.history(), config.monitor_interval, Utc::now())
    };

    match write_report(&report, &config.export.dir) {
        Ok(path) => log::info!("report_exported path={}", path.display()),
        Err(error) => log::error!("report_export_failed error={}", error),
    }
}

#[tokio::main]
async fn main() {
    init_json_logging();

    let config = match load_config_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    log::info!(
        "process analyzer starting interval_secs={} history_capacity={} log_retention={:?}",
        config.monitor_interval,
        config.history.capacity,
        config.history.log_retention
    );

    let provider =
        ActiveTelemetryProvider::new(config.simulation.enabled, config.simulation.profile);
    if config.simulation.enabled {
        log::warn!(
            "simulation_mode_enabled profile={} source=telemetry_provider",
            config.simulation.profile.as_str()
        );
    }

    let engine = Arc::new(Mutex::new(AnalysisEngine::from_config(&config)));
    let observers: Vec<Arc<dyn AnalysisObserver>> = vec![Arc::new(LogObserver)];
    let schedule = start_monitor_job(
        Arc::clone(&engine),
        provider,
        observers,
        Duration::from_secs(config.monitor_interval),
    );

    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("shutdown signal listener failed: {}", error);
    }

    log::info!("shutdown requested, waiting for in-flight tick");
    if let Err(error) = schedule.shutdown().await {
        log::error!("monitor job ended abnormally: {}", error);
    }

    export_on_shutdown(&config, &engine).await;
    log::info!("process analyzer stopped");
}
