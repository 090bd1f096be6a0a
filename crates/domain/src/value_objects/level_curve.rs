//! Level curve value object
//!
//! Maps lifetime XP to a level through a power-law threshold:
//!
//! ```text
//! threshold(1) = 0
//! threshold(L) = floor(base * (L - 1)^exponent)   for L > 1
//! ```
//!
//! A level owns the half-open interval `[threshold(L), threshold(L + 1))`,
//! so XP exactly on a boundary belongs to the higher level.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Highest reachable level. Keeps the inverse bounded for huge XP totals.
pub const MAX_LEVEL: u32 = 1000;

/// Power-law XP curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurve {
    base: f64,
    exponent: f64,
}

impl LevelCurve {
    pub const DEFAULT_BASE: f64 = 100.0;
    pub const DEFAULT_EXPONENT: f64 = 2.22;

    /// Create a curve from its two parameters.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` unless both parameters are finite
    /// and strictly positive (anything else breaks monotonicity).
    pub fn new(base: f64, exponent: f64) -> Result<Self, DomainError> {
        if !base.is_finite() || base <= 0.0 {
            return Err(DomainError::validation(format!(
                "Level curve base must be a positive number, got {}",
                base
            )));
        }
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(DomainError::validation(format!(
                "Level curve exponent must be a positive number, got {}",
                exponent
            )));
        }
        Ok(Self { base, exponent })
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Minimum lifetime XP required to be at `level`.
    pub fn threshold(&self, level: u32) -> i64 {
        if level <= 1 {
            return 0;
        }
        let steps = f64::from(level - 1);
        // `as` saturates, so absurd levels clamp to i64::MAX instead of wrapping
        (self.base * steps.powf(self.exponent)).floor() as i64
    }

    /// Greatest level whose threshold is `<= xp`.
    pub fn level_for_xp(&self, xp: i64) -> u32 {
        if xp <= 0 {
            return 1;
        }

        // Invariant: threshold(low) <= xp
        let (mut low, mut high) = (1u32, MAX_LEVEL);
        while low < high {
            let mid = low + (high - low).div_ceil(2);
            if self.threshold(mid) <= xp {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        low
    }

    /// Position of `xp` inside its level band.
    pub fn progress(&self, xp: i64) -> LevelProgress {
        let xp = xp.max(0);
        let level = self.level_for_xp(xp);
        let current_level_xp = self.threshold(level);
        let next_level_xp = self.threshold(level.saturating_add(1));
        let span = next_level_xp.saturating_sub(current_level_xp);
        let gained = xp.saturating_sub(current_level_xp);

        let progress = if span <= 0 {
            0.0
        } else {
            (gained as f64 / span as f64).clamp(0.0, 1.0)
        };

        LevelProgress {
            level,
            current_level_xp,
            next_level_xp,
            progress,
            xp_needed: next_level_xp.saturating_sub(xp).max(0),
        }
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            base: Self::DEFAULT_BASE,
            exponent: Self::DEFAULT_EXPONENT,
        }
    }
}

/// Where a learner sits between two level thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    /// Threshold of the current level
    pub current_level_xp: i64,
    /// Threshold of the next level
    pub next_level_xp: i64,
    /// Fraction of the band already covered, in `[0, 1]`
    pub progress: f64,
    pub xp_needed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_starts_at_zero() {
        let curve = LevelCurve::default();
        assert_eq!(curve.threshold(1), 0);
        assert_eq!(curve.threshold(0), 0);
        assert_eq!(curve.level_for_xp(0), 1);
        assert_eq!(curve.level_for_xp(-50), 1);
    }

    #[test]
    fn level_two_starts_at_base() {
        let curve = LevelCurve::default();
        assert_eq!(curve.threshold(2), 100);
        assert_eq!(curve.level_for_xp(99), 1);
        assert_eq!(curve.level_for_xp(100), 2);
    }

    #[test]
    fn threshold_matches_power_law() {
        let curve = LevelCurve::default();
        let expected = (100.0 * 2f64.powf(2.22)).floor() as i64;
        assert_eq!(curve.threshold(3), expected);
    }

    #[test]
    fn boundary_belongs_to_higher_level() {
        let curve = LevelCurve::default();
        for level in 2..40 {
            let t = curve.threshold(level);
            assert_eq!(curve.level_for_xp(t), level, "at threshold of {level}");
            assert_eq!(curve.level_for_xp(t - 1), level - 1, "just below {level}");
        }
    }

    #[test]
    fn threshold_is_monotonic() {
        let curve = LevelCurve::default();
        let mut previous = curve.threshold(1);
        for level in 2..=MAX_LEVEL {
            let current = curve.threshold(level);
            assert!(current >= previous, "threshold dropped at level {level}");
            previous = current;
        }
    }

    #[test]
    fn level_is_capped() {
        let curve = LevelCurve::default();
        assert_eq!(curve.level_for_xp(i64::MAX), MAX_LEVEL);
    }

    #[test]
    fn rejects_non_positive_parameters() {
        assert!(LevelCurve::new(0.0, 2.22).is_err());
        assert!(LevelCurve::new(100.0, -1.0).is_err());
        assert!(LevelCurve::new(f64::NAN, 2.0).is_err());
        assert!(LevelCurve::new(50.0, 2.0).is_ok());
    }

    #[test]
    fn progress_inside_band() {
        let curve = LevelCurve::new(100.0, 2.0).unwrap();
        // Level 2 spans [100, 400)
        let progress = curve.progress(250);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.current_level_xp, 100);
        assert_eq!(progress.next_level_xp, 400);
        assert!((progress.progress - 0.5).abs() < f64::EPSILON);
        assert_eq!(progress.xp_needed, 150);
    }

    #[test]
    fn progress_for_fresh_learner() {
        let progress = LevelCurve::default().progress(0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.current_level_xp, 0);
        assert_eq!(progress.next_level_xp, 100);
        assert_eq!(progress.progress, 0.0);
        assert_eq!(progress.xp_needed, 100);
    }
}
