//! XP use case request and result types.

use serde::{Deserialize, Serialize};
use xpledger_domain::{LevelProgress, PhaseId, StudentId, XpBreakdown};

/// Input of the award flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardXpRequest {
    pub student_id: StudentId,
    pub phase_id: PhaseId,
    /// Folds the perfect-score bonus into the phase event
    pub perfect_score: bool,
}

impl AwardXpRequest {
    pub fn new(student_id: StudentId, phase_id: PhaseId) -> Self {
        Self {
            student_id,
            phase_id,
            perfect_score: false,
        }
    }

    pub fn with_perfect_score(mut self, perfect_score: bool) -> Self {
        self.perfect_score = perfect_score;
        self
    }
}

/// Why an award call granted nothing. For UI purposes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    RepeatCompletion,
}

/// Profile state after an award run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub xp: i64,
    pub level: u32,
    pub total_xp_earned: i64,
    pub old_level: u32,
    pub leveled_up: bool,
}

/// Output of the award flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardResult {
    /// XP newly granted by this call only; zero for milestones already on the ledger
    pub xp_awarded: XpBreakdown,
    pub profile: ProfileSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<ReasonCode>,
}

/// A student's XP as shown on dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentXp {
    pub xp: i64,
    pub level: u32,
    pub total_xp_earned: i64,
    pub level_progress: LevelProgress,
    /// Lifetime ledger totals per milestone type
    pub breakdown: XpBreakdown,
}
