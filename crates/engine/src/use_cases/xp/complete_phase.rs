//! Complete a phase: record progress, then award XP.

use std::sync::Arc;

use crate::infrastructure::ports::{ClockPort, CompletionFactsRepo, ProgressRepo};

use super::award::AwardXpForPhaseCompletion;
use super::error::XpError;
use super::types::{AwardResult, AwardXpRequest};

/// Marks the phase completed for the student and runs the award flow.
///
/// Progress is written before the award so the completion counts include
/// the phase just finished. Repeating the call is harmless on both sides.
pub struct CompletePhase {
    facts: Arc<dyn CompletionFactsRepo>,
    progress: Arc<dyn ProgressRepo>,
    clock: Arc<dyn ClockPort>,
    award: Arc<AwardXpForPhaseCompletion>,
}

impl CompletePhase {
    pub fn new(
        facts: Arc<dyn CompletionFactsRepo>,
        progress: Arc<dyn ProgressRepo>,
        clock: Arc<dyn ClockPort>,
        award: Arc<AwardXpForPhaseCompletion>,
    ) -> Self {
        Self {
            facts,
            progress,
            clock,
            award,
        }
    }

    pub async fn execute(&self, request: AwardXpRequest) -> Result<AwardResult, XpError> {
        let context = self
            .facts
            .phase_context(request.phase_id)
            .await?
            .ok_or_else(|| XpError::phase_not_found(request.phase_id))?;

        let newly_completed = self
            .progress
            .mark_phase_completed(&request.student_id, &context, self.clock.now())
            .await?;

        tracing::debug!(
            student_id = %request.student_id,
            phase_id = %request.phase_id,
            newly_completed,
            "Phase progress recorded"
        );

        self.award.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{
        MockCompletionFactsRepo, MockNotificationPort, MockProgressRepo,
    };
    use crate::use_cases::xp::test_support::{
        fixed_time, student, InMemoryLedger, InMemoryProfiles,
    };
    use xpledger_domain::{ChapterId, ChapterProgress, PhaseContext, PhaseId, XpConfig};

    fn facts() -> MockCompletionFactsRepo {
        let mut facts = MockCompletionFactsRepo::new();
        facts.expect_phase_context().returning(|phase_id| {
            Ok((phase_id == PhaseId::new(10)).then_some(PhaseContext {
                phase_id,
                chapter_id: ChapterId::new(3),
                zone_id: None,
            }))
        });
        facts
            .expect_chapter_progress()
            .returning(|_, _| Ok(ChapterProgress::new(5, 1)));
        facts
    }

    fn complete_phase(progress: MockProgressRepo) -> CompletePhase {
        let facts: Arc<dyn CompletionFactsRepo> = Arc::new(facts());
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(fixed_time()));
        let mut notifications = MockNotificationPort::new();
        notifications.expect_notify().returning(|_| Ok(()));
        let award = AwardXpForPhaseCompletion::new(
            facts.clone(),
            Arc::new(InMemoryLedger::default()),
            Arc::new(InMemoryProfiles::default()),
            Arc::new(notifications),
            clock.clone(),
            Arc::new(XpConfig::default()),
        );
        CompletePhase::new(facts, Arc::new(progress), clock, Arc::new(award))
    }

    #[tokio::test]
    async fn marks_progress_then_awards() {
        let mut progress = MockProgressRepo::new();
        progress
            .expect_mark_phase_completed()
            .withf(|student_id, context, completed_at| {
                student_id.as_str() == "student-1"
                    && context.phase_id == PhaseId::new(10)
                    && *completed_at == fixed_time()
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let result = complete_phase(progress)
            .execute(AwardXpRequest::new(student("student-1"), PhaseId::new(10)))
            .await
            .unwrap();

        assert_eq!(result.xp_awarded.phase, 20);
    }

    #[tokio::test]
    async fn unknown_phase_records_no_progress() {
        let mut progress = MockProgressRepo::new();
        progress.expect_mark_phase_completed().never();

        let result = complete_phase(progress)
            .execute(AwardXpRequest::new(student("student-1"), PhaseId::new(77)))
            .await;

        assert!(matches!(result, Err(XpError::NotFound { .. })));
    }
}
