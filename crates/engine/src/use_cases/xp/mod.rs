//! XP use cases.
//!
//! Awarding XP for phase completions, reading XP summaries and the
//! leaderboard, and rebuilding the ledger from progress.

use std::sync::Arc;

mod award;
mod backfill;
mod complete_phase;
mod completion;
mod error;
mod leaderboard;
mod student_xp;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use award::AwardXpForPhaseCompletion;
pub use backfill::{BackfillOptions, BackfillReport, BackfillXpLedger};
pub use complete_phase::CompletePhase;
pub use completion::CompletionAggregator;
pub use error::XpError;
pub use leaderboard::XpLeaderboard;
pub use student_xp::GetStudentXp;
pub use types::{AwardResult, AwardXpRequest, ProfileSnapshot, ReasonCode, StudentXp};

/// Container for XP use cases.
pub struct XpUseCases {
    pub award: Arc<AwardXpForPhaseCompletion>,
    pub complete_phase: Arc<CompletePhase>,
    pub student_xp: Arc<GetStudentXp>,
    pub leaderboard: Arc<XpLeaderboard>,
    pub backfill: Arc<BackfillXpLedger>,
}

impl XpUseCases {
    pub fn new(
        award: Arc<AwardXpForPhaseCompletion>,
        complete_phase: Arc<CompletePhase>,
        student_xp: Arc<GetStudentXp>,
        leaderboard: Arc<XpLeaderboard>,
        backfill: Arc<BackfillXpLedger>,
    ) -> Self {
        Self {
            award,
            complete_phase,
            student_xp,
            leaderboard,
            backfill,
        }
    }
}
