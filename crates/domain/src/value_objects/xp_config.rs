//! XP reward table
//!
//! Fixed per deployment: loaded once at startup and shared read-only.
//! Rebalancing progression means changing these values, never the award logic.

use serde::{Deserialize, Serialize};

use super::level_curve::LevelCurve;
use crate::entities::XpEventType;
use crate::error::DomainError;

/// XP amounts per milestone type plus the level curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpConfig {
    /// XP per phase completion
    pub xp_per_phase: i64,
    /// Bonus when every phase of a chapter (mission) is complete
    pub xp_per_mission: i64,
    /// Bonus when every chapter of a zone is complete
    pub xp_per_zone: i64,
    /// Folded into the phase event when the phase was completed perfectly
    pub perfect_score_bonus: i64,
    /// Only consulted by the ledger backfill, which cannot see chapter sizes
    /// as they were when the progress was recorded
    pub phases_per_mission: u32,
    pub level_curve: LevelCurve,
}

impl XpConfig {
    pub const DEFAULT_XP_PER_PHASE: i64 = 20;
    pub const DEFAULT_XP_PER_MISSION: i64 = 50;
    pub const DEFAULT_XP_PER_ZONE: i64 = 200;
    pub const DEFAULT_PERFECT_SCORE_BONUS: i64 = 25;
    pub const DEFAULT_PHASES_PER_MISSION: u32 = 5;
    /// Upper bound for any single configured amount; keeps ledger sums far
    /// from `i64` overflow.
    pub const MAX_XP_AMOUNT: i64 = 1_000_000;

    /// Check the table for values that would corrupt the ledger.
    pub fn validate(&self) -> Result<(), DomainError> {
        let amounts = [
            ("XP_PER_PHASE", self.xp_per_phase),
            ("XP_PER_MISSION", self.xp_per_mission),
            ("XP_PER_ZONE", self.xp_per_zone),
            ("XP_PERFECT_SCORE_BONUS", self.perfect_score_bonus),
        ];
        for (name, value) in amounts {
            if value < 0 {
                return Err(DomainError::validation(format!(
                    "{} cannot be negative (got {})",
                    name, value
                )));
            }
            if value > Self::MAX_XP_AMOUNT {
                return Err(DomainError::validation(format!(
                    "{} cannot exceed {} (got {})",
                    name,
                    Self::MAX_XP_AMOUNT,
                    value
                )));
            }
        }
        if self.phases_per_mission == 0 {
            return Err(DomainError::validation(
                "PHASES_PER_MISSION must be at least 1",
            ));
        }
        Ok(())
    }

    /// Configured amount for a milestone type, without bonuses.
    pub fn amount_for(&self, event_type: XpEventType) -> i64 {
        match event_type {
            XpEventType::PhaseComplete => self.xp_per_phase,
            XpEventType::MissionComplete => self.xp_per_mission,
            XpEventType::ZoneComplete => self.xp_per_zone,
        }
    }

    /// Amount recorded on a `PHASE_COMPLETE` event.
    pub fn phase_amount(&self, perfect_score: bool) -> i64 {
        if perfect_score {
            self.xp_per_phase + self.perfect_score_bonus
        } else {
            self.xp_per_phase
        }
    }
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            xp_per_phase: Self::DEFAULT_XP_PER_PHASE,
            xp_per_mission: Self::DEFAULT_XP_PER_MISSION,
            xp_per_zone: Self::DEFAULT_XP_PER_ZONE,
            perfect_score_bonus: Self::DEFAULT_PERFECT_SCORE_BONUS,
            phases_per_mission: Self::DEFAULT_PHASES_PER_MISSION,
            level_curve: LevelCurve::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = XpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.amount_for(XpEventType::PhaseComplete), 20);
        assert_eq!(config.amount_for(XpEventType::MissionComplete), 50);
        assert_eq!(config.amount_for(XpEventType::ZoneComplete), 200);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let config = XpConfig {
            xp_per_zone: -1,
            ..XpConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("XP_PER_ZONE"));
    }

    #[test]
    fn oversized_amount_is_rejected() {
        let config = XpConfig {
            perfect_score_bonus: i64::MAX,
            ..XpConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("XP_PERFECT_SCORE_BONUS"));

        let at_limit = XpConfig {
            xp_per_phase: XpConfig::MAX_XP_AMOUNT,
            perfect_score_bonus: XpConfig::MAX_XP_AMOUNT,
            ..XpConfig::default()
        };
        assert!(at_limit.validate().is_ok());
        assert_eq!(at_limit.phase_amount(true), 2 * XpConfig::MAX_XP_AMOUNT);
    }

    #[test]
    fn zero_phases_per_mission_is_rejected() {
        let config = XpConfig {
            phases_per_mission: 0,
            ..XpConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn perfect_score_folds_into_phase_amount() {
        let config = XpConfig::default();
        assert_eq!(config.phase_amount(false), 20);
        assert_eq!(config.phase_amount(true), 45);
    }
}
