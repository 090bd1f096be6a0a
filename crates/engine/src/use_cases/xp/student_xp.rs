//! Read a student's XP, level progress and ledger breakdown.

use std::sync::Arc;

use xpledger_domain::{StudentId, XpConfig, XpEvent};

use crate::infrastructure::ports::{ProfileRepo, XpLedgerRepo};

use super::error::XpError;
use super::types::StudentXp;

pub struct GetStudentXp {
    profiles: Arc<dyn ProfileRepo>,
    ledger: Arc<dyn XpLedgerRepo>,
    config: Arc<XpConfig>,
}

impl GetStudentXp {
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        ledger: Arc<dyn XpLedgerRepo>,
        config: Arc<XpConfig>,
    ) -> Self {
        Self {
            profiles,
            ledger,
            config,
        }
    }

    /// XP summary for a student. A student without a profile reads as level 1
    /// with no XP.
    pub async fn execute(&self, student_id: &StudentId) -> Result<StudentXp, XpError> {
        let summary = self
            .profiles
            .get(student_id)
            .await?
            .map(|profile| profile.xp)
            .unwrap_or_default();
        let breakdown = self.ledger.totals_by_type(student_id).await?;

        Ok(StudentXp {
            xp: summary.xp,
            level: summary.level,
            total_xp_earned: summary.total_xp_earned,
            level_progress: self.config.level_curve.progress(summary.total_xp_earned),
            breakdown,
        })
    }

    /// Ledger history of a student, oldest first.
    pub async fn events(&self, student_id: &StudentId) -> Result<Vec<XpEvent>, XpError> {
        Ok(self.ledger.list_for_student(student_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockProfileRepo, MockXpLedgerRepo};
    use crate::use_cases::xp::test_support::student;
    use xpledger_domain::{ProfileXp, StudentProfile, XpBreakdown};

    #[tokio::test]
    async fn missing_profile_reads_as_level_one() {
        let mut profiles = MockProfileRepo::new();
        profiles.expect_get().returning(|_| Ok(None));
        let mut ledger = MockXpLedgerRepo::new();
        ledger
            .expect_totals_by_type()
            .returning(|_| Ok(XpBreakdown::default()));

        let use_case = GetStudentXp::new(
            Arc::new(profiles),
            Arc::new(ledger),
            Arc::new(XpConfig::default()),
        );
        let xp = use_case.execute(&student("new-student")).await.unwrap();

        assert_eq!(xp.level, 1);
        assert_eq!(xp.total_xp_earned, 0);
        assert_eq!(xp.level_progress.next_level_xp, 100);
        assert!(xp.breakdown.is_empty());
    }

    #[tokio::test]
    async fn summary_combines_profile_and_breakdown() {
        let mut profiles = MockProfileRepo::new();
        profiles.expect_get().returning(|id| {
            Ok(Some(StudentProfile {
                id: id.clone(),
                full_name: "Ada".to_string(),
                xp: ProfileXp {
                    xp: 270,
                    level: 2,
                    total_xp_earned: 270,
                },
            }))
        });
        let mut ledger = MockXpLedgerRepo::new();
        ledger
            .expect_totals_by_type()
            .returning(|_| Ok(XpBreakdown::new(20, 50, 200)));

        let use_case = GetStudentXp::new(
            Arc::new(profiles),
            Arc::new(ledger),
            Arc::new(XpConfig::default()),
        );
        let xp = use_case.execute(&student("ada")).await.unwrap();

        assert_eq!(xp.level, 2);
        assert_eq!(xp.breakdown.total, 270);
        assert_eq!(xp.level_progress.level, 2);
        assert_eq!(xp.level_progress.current_level_xp, 100);
    }
}
