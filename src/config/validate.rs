use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor_interval == 0 {
            return Err(ConfigError::Validation(
                "monitor_interval must be greater than 0".to_string(),
            ));
        }

        if self.collection_timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "collection_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let threshold = self.analysis.anomaly_threshold;
        if threshold.is_nan() || threshold <= 0.0 || threshold > 1.0 {
            return Err(ConfigError::Validation(
                "analysis.anomaly_threshold must be in (0, 1]".to_string(),
            ));
        }
        validate_percentage(
            "analysis.classifier_baseline_cpu",
            self.analysis.classifier_baseline_cpu,
        )?;
        if self.analysis.max_recommendations == 0 {
            return Err(ConfigError::Validation(
                "analysis.max_recommendations must be greater than 0".to_string(),
            ));
        }

        validate_positive("history.capacity", self.history.capacity)?;
        validate_positive("history.anomaly_tail", self.history.anomaly_tail)?;
        validate_positive(
            "history.recommendation_tail",
            self.history.recommendation_tail,
        )?;
        validate_positive("history.trend_window", self.history.trend_window)?;

        if self.export.enabled && self.export.dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "export.dir must not be empty when export.enabled is true".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_percentage(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}

fn validate_positive(field: &str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(())
}
