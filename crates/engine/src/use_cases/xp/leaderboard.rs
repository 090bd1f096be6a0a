//! XP leaderboard.

use std::sync::Arc;

use xpledger_domain::LeaderboardEntry;

use crate::infrastructure::ports::ProfileRepo;

use super::error::XpError;

/// Students ranked by cached XP, highest first.
pub struct XpLeaderboard {
    profiles: Arc<dyn ProfileRepo>,
}

impl XpLeaderboard {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { profiles }
    }

    /// Top `limit` students (default 10, clamped to `1..=100`). Ranks are 1-based
    /// and ties keep the store's ordering.
    pub async fn execute(&self, limit: Option<u32>) -> Result<Vec<LeaderboardEntry>, XpError> {
        let limit = limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);

        let profiles = self.profiles.top_by_xp(limit).await?;

        Ok(profiles
            .into_iter()
            .zip(1u32..)
            .map(|(profile, rank)| LeaderboardEntry {
                rank,
                student_id: profile.id,
                full_name: profile.full_name,
                xp: profile.xp.xp,
                level: profile.xp.level,
            })
            .collect())
    }
}
