mod alerts;
mod classifier;
mod detector;
mod engine;
mod health;
mod model;
mod recommendation;

pub use alerts::AlertEngine;
pub use classifier::{
    Classification, DEFAULT_BASELINE_CPU_PERCENT, ProcessClassifier, ProcessLabel,
};
pub use detector::{AnomalyDetector, DEFAULT_ANOMALY_THRESHOLD};
pub use engine::{AnalysisEngine, ProcessRow, TickOutcome, TickReport};
pub use health::SystemHealth;
pub use model::{
    Alert, AlertKind, AlertSeverity, AnalysisResult, AnomalyRecord, Recommendation,
    RecommendationKind,
};
pub use recommendation::{DEFAULT_MAX_RECOMMENDATIONS, RecommendationEngine, RecommendationSet};
