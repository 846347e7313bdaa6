//! # lingo-srs
//!
//! Spaced repetition scheduling for MirrorLingo phrase review.
//!
//! ## Features
//!
//! - SM-2 family scheduler with Hard penalty and Easy bonus multipliers
//! - Due-item and upcoming-review selection against an injected clock
//! - Retention statistics over a review collection
//! - Cross-device merge of review progress
//! - TOML configuration of algorithm constants

pub mod algorithm;
pub mod clock;
pub mod config;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod sync;

pub use algorithm::{Sm2, SrsAlgorithm};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use config::{Config, Sm2Config, StatsThresholds};
pub use models::{PerformanceRating, Progress, RetentionStats, ReviewItem};
pub use scheduler::{SpacedRepetitionScheduler, DEFAULT_UPCOMING_DAYS};
pub use sync::{merge_review_items, SyncSnapshot};

/// Error types for configuration and sync operations.
///
/// Scheduling itself never fails; only the edges that touch files or
/// serialized data return errors.
#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible operations.
pub type SrsResult<T> = Result<T, SrsError>;
