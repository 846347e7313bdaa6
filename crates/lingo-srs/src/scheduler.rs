//! Review scheduling over collections of items.
//!
//! The scheduler holds no per-item state. Every operation takes items in
//! and hands new values back; the caller decides where they live.

use crate::algorithm::{Sm2, SrsAlgorithm};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, StatsThresholds};
use crate::models::{PerformanceRating, RetentionStats, ReviewItem};
use chrono::{DateTime, Duration, Utc};

/// Window used by [`SpacedRepetitionScheduler::upcoming_reviews`] when the
/// caller has no preference.
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

/// Schedules phrase reviews with an algorithm and a time source.
pub struct SpacedRepetitionScheduler<A = Sm2, C = SystemClock> {
    algorithm: A,
    clock: C,
    thresholds: StatsThresholds,
    upcoming_days: u32,
}

impl SpacedRepetitionScheduler {
    /// SM-2 with default constants on the system clock.
    pub fn new() -> Self {
        Self::with_parts(Sm2::default(), SystemClock)
    }

    /// SM-2 configured from `config` on the system clock.
    pub fn from_config(config: &Config) -> Self {
        Self::with_parts(Sm2::from(&config.sm2), SystemClock)
            .with_thresholds(config.stats.clone())
            .with_upcoming_days(config.upcoming_days)
    }
}

impl Default for SpacedRepetitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> SpacedRepetitionScheduler<Sm2, C> {
    /// SM-2 with default constants on a custom clock.
    pub fn with_clock(clock: C) -> Self {
        Self::with_parts(Sm2::default(), clock)
    }
}

impl<A: SrsAlgorithm, C: Clock> SpacedRepetitionScheduler<A, C> {
    pub fn with_parts(algorithm: A, clock: C) -> Self {
        Self {
            algorithm,
            clock,
            thresholds: StatsThresholds::default(),
            upcoming_days: DEFAULT_UPCOMING_DAYS,
        }
    }

    /// Replace the retention statistics cut-offs.
    pub fn with_thresholds(mut self, thresholds: StatsThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Replace the window used by [`Self::upcoming`].
    pub fn with_upcoming_days(mut self, days: u32) -> Self {
        self.upcoming_days = days;
        self
    }

    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// A fresh item created now, due immediately, starting at the
    /// algorithm's initial ease.
    pub fn new_item(
        &self,
        id: impl Into<String>,
        content: impl Into<String>,
        translation: impl Into<String>,
    ) -> ReviewItem {
        ReviewItem {
            ease_factor: self.algorithm.initial_ease(),
            ..ReviewItem::new(id, content, translation, self.clock.now())
        }
    }

    /// Apply one review to `item` and return its new state.
    ///
    /// `last_reviewed` becomes now and `next_review` lands `interval` days
    /// later. Identity and content fields are carried over untouched.
    pub fn process_review(&self, item: &ReviewItem, rating: PerformanceRating) -> ReviewItem {
        let now = self.clock.now();
        let progress = self.algorithm.next_progress(&item.progress(), rating);

        tracing::debug!(
            id = %item.id,
            rating = rating.name(),
            old_interval = item.interval,
            new_interval = progress.interval,
            ease = progress.ease_factor,
            repetitions = progress.repetitions,
            "processed review"
        );

        ReviewItem {
            ease_factor: progress.ease_factor,
            interval: progress.interval,
            repetitions: progress.repetitions,
            next_review: add_days(now, progress.interval),
            last_reviewed: Some(now),
            ..item.clone()
        }
    }

    /// Items whose `next_review` is at or before now, in input order.
    pub fn due_items(&self, items: &[ReviewItem]) -> Vec<ReviewItem> {
        let now = self.clock.now();
        let due: Vec<ReviewItem> = items
            .iter()
            .filter(|item| item.is_due(now))
            .cloned()
            .collect();
        tracing::trace!(total = items.len(), due = due.len(), "filtered due items");
        due
    }

    /// Items coming due within the next `days` days, soonest first.
    ///
    /// Items already due are excluded.
    pub fn upcoming_reviews(&self, items: &[ReviewItem], days: u32) -> Vec<ReviewItem> {
        let now = self.clock.now();
        let horizon = add_days(now, days);

        let mut upcoming: Vec<ReviewItem> = items
            .iter()
            .filter(|item| item.next_review > now && item.next_review <= horizon)
            .cloned()
            .collect();
        upcoming.sort_by_key(|item| item.next_review);

        tracing::trace!(
            total = items.len(),
            upcoming = upcoming.len(),
            days,
            "filtered upcoming items"
        );
        upcoming
    }

    /// [`Self::upcoming_reviews`] over the configured window.
    pub fn upcoming(&self, items: &[ReviewItem]) -> Vec<ReviewItem> {
        self.upcoming_reviews(items, self.upcoming_days)
    }

    /// Mastery and difficulty figures for a collection.
    pub fn retention_stats(&self, items: &[ReviewItem]) -> RetentionStats {
        let t = &self.thresholds;
        let total_items = items.len();
        let mastered_items = items
            .iter()
            .filter(|item| {
                item.repetitions >= t.mastered_repetitions && item.ease_factor >= t.mastered_ease
            })
            .count();
        let struggling_items = items
            .iter()
            .filter(|item| item.ease_factor < t.struggling_ease)
            .count();

        let average_ease_factor = if total_items == 0 {
            0.0
        } else {
            let sum: f64 = items.iter().map(|item| item.ease_factor).sum();
            (sum / total_items as f64 * 100.0).round() / 100.0
        };

        RetentionStats {
            total_items,
            mastered_items,
            struggling_items,
            average_ease_factor,
        }
    }
}

fn add_days(at: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    at.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
