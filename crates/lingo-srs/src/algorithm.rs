//! Spaced repetition algorithms.

use crate::config::Sm2Config;
use crate::models::{PerformanceRating, Progress, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR};

/// Trait for spaced repetition algorithms.
pub trait SrsAlgorithm: Send + Sync {
    /// Algorithm name.
    fn name(&self) -> &str;

    /// Ease factor for new items.
    fn initial_ease(&self) -> f64;

    /// Calculate the scheduling state after one review.
    fn next_progress(&self, progress: &Progress, rating: PerformanceRating) -> Progress;
}

/// SM-2 variant with a Hard penalty and an Easy bonus.
#[derive(Debug, Clone, PartialEq)]
pub struct Sm2 {
    /// Initial ease factor.
    pub initial_ease: f64,
    /// Minimum ease factor.
    pub min_ease: f64,
    /// Interval after the first successful review.
    pub first_interval: u32,
    /// Interval after the second successful review.
    pub second_interval: u32,
    /// Hard interval multiplier, floored.
    pub hard_multiplier: f64,
    /// Easy bonus multiplier, rounded.
    pub easy_bonus: f64,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: INITIAL_EASE_FACTOR,
            min_ease: MIN_EASE_FACTOR,
            first_interval: 1,
            second_interval: 6,
            hard_multiplier: 1.2,
            easy_bonus: 1.3,
        }
    }
}

impl From<&Sm2Config> for Sm2 {
    fn from(config: &Sm2Config) -> Self {
        Self {
            initial_ease: config.initial_ease,
            min_ease: config.min_ease,
            first_interval: config.first_interval,
            second_interval: config.second_interval,
            hard_multiplier: config.hard_multiplier,
            easy_bonus: config.easy_bonus,
        }
    }
}

impl Sm2 {
    /// EF' = EF + (0.1 - (3 - q) * (0.08 + (3 - q) * 0.02)), floored at `min_ease`.
    ///
    /// A configured `min_ease` below [`MIN_EASE_FACTOR`] never lowers the floor.
    pub fn next_ease(&self, ease: f64, rating: PerformanceRating) -> f64 {
        let distance = 3.0 - f64::from(rating.value());
        let next = ease + (0.1 - distance * (0.08 + distance * 0.02));
        next.max(self.min_ease.max(MIN_EASE_FACTOR))
    }
}

impl SrsAlgorithm for Sm2 {
    fn name(&self) -> &str {
        "SM-2"
    }

    fn initial_ease(&self) -> f64 {
        self.initial_ease
    }

    fn next_progress(&self, progress: &Progress, rating: PerformanceRating) -> Progress {
        let ease_factor = self.next_ease(progress.ease_factor, rating);

        let (interval, repetitions) = if rating.is_lapse() {
            (1, 0)
        } else {
            let repetitions = progress.repetitions.saturating_add(1);
            let base = match repetitions {
                1 => self.first_interval,
                2 => self.second_interval,
                _ => to_days((f64::from(progress.interval) * ease_factor).round()),
            };
            let interval = match rating {
                PerformanceRating::Hard => {
                    to_days((f64::from(base) * self.hard_multiplier).floor()).max(1)
                }
                PerformanceRating::Easy => to_days((f64::from(base) * self.easy_bonus).round()),
                _ => base,
            };
            (interval, repetitions)
        };

        Progress {
            ease_factor,
            // Stored intervals of 0 would otherwise stay at 0.
            interval: interval.max(1),
            repetitions,
        }
    }
}

// Saturating; NaN maps to 0.
fn to_days(days: f64) -> u32 {
    days as u32
}
