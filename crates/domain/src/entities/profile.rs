//! Profile XP summary - the cached projection of the ledger onto a learner
//!
//! The ledger is the source of truth. A summary is always rebuilt from the
//! ledger sum, never incremented, so concurrent writers can race harmlessly.

use serde::{Deserialize, Serialize};

use crate::ids::StudentId;
use crate::value_objects::LevelCurve;

/// XP fields cached on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileXp {
    /// Display XP; kept equal to `total_xp_earned`
    pub xp: i64,
    pub level: u32,
    /// Lifetime XP, the sum of every ledger event
    pub total_xp_earned: i64,
}

impl ProfileXp {
    /// Summary for a ledger whose events sum to `total`.
    pub fn from_ledger_total(total: i64, curve: &LevelCurve) -> Self {
        Self {
            xp: total,
            level: curve.level_for_xp(total),
            total_xp_earned: total,
        }
    }
}

impl Default for ProfileXp {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            total_xp_earned: 0,
        }
    }
}

/// Learner profile as far as the ledger cares about it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: StudentId,
    pub full_name: String,
    #[serde(flatten)]
    pub xp: ProfileXp,
}

/// One row of the XP leaderboard (rank is 1-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub student_id: StudentId,
    pub full_name: String,
    pub xp: i64,
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_from_ledger_total_keeps_fields_equal() {
        let curve = LevelCurve::default();
        let summary = ProfileXp::from_ledger_total(270, &curve);
        assert_eq!(summary.xp, 270);
        assert_eq!(summary.total_xp_earned, 270);
        assert_eq!(summary.level, curve.level_for_xp(270));
    }

    #[test]
    fn default_summary_is_level_one() {
        assert_eq!(ProfileXp::default().level, 1);
        assert_eq!(
            ProfileXp::from_ledger_total(0, &LevelCurve::default()),
            ProfileXp::default()
        );
    }
}
