//! Data models for phrase review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ease factor every new item starts with.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor an item can reach.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// How well the learner recalled an item, from worst to best.
///
/// The declaration order is the numeric order; comparisons between
/// ratings follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PerformanceRating {
    /// Complete failure.
    Again = 0,
    /// Difficult but correct.
    Hard = 1,
    /// Correct with normal effort.
    Good = 2,
    /// Effortless and immediate.
    Easy = 3,
}

impl PerformanceRating {
    /// All ratings, worst first.
    pub const ALL: [PerformanceRating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

    /// Numeric value used by the ease formula.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Map a numeric value back to a rating.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Again),
            1 => Some(Self::Hard),
            2 => Some(Self::Good),
            3 => Some(Self::Easy),
            _ => None,
        }
    }

    /// Whether the review is a lapse that resets progress. Only `Again` is;
    /// `Hard` still counts toward the repetition streak.
    pub fn is_lapse(self) -> bool {
        self == Self::Again
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Again => "Again",
            Self::Hard => "Hard",
            Self::Good => "Good",
            Self::Easy => "Easy",
        }
    }
}

/// The scheduling part of a review item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Difficulty multiplier; higher means longer intervals.
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    /// Consecutive non-lapse reviews.
    pub repetitions: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
        }
    }
}

/// One phrase under spaced repetition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    /// Stable identifier of the source phrase.
    pub id: String,
    /// Prompt text.
    pub content: String,
    /// Answer text.
    pub translation: String,
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
    /// When the item becomes due.
    pub next_review: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Most recent review, `None` if never reviewed.
    #[serde(default)]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl ReviewItem {
    /// Create a new item that is due immediately.
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        translation: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let progress = Progress::default();
        Self {
            id: id.into(),
            content: content.into(),
            translation: translation.into(),
            ease_factor: progress.ease_factor,
            interval: progress.interval,
            repetitions: progress.repetitions,
            next_review: created_at,
            created_at,
            last_reviewed: None,
        }
    }

    /// Create a new item with a random UUID as its id.
    pub fn with_generated_id(
        content: impl Into<String>,
        translation: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::new(Uuid::new_v4().to_string(), content, translation, created_at)
    }

    /// Current scheduling state.
    pub fn progress(&self) -> Progress {
        Progress {
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
        }
    }

    /// Check if due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }
}

/// Aggregate figures over a review collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionStats {
    pub total_items: usize,
    /// Items with enough repetitions and a high ease factor.
    pub mastered_items: usize,
    /// Items whose ease factor has dropped low.
    pub struggling_items: usize,
    /// Mean ease factor, rounded to two decimals; 0 when empty.
    pub average_ease_factor: f64,
}
