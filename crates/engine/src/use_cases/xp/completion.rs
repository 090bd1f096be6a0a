//! Completion aggregator: which milestones does completing a phase reach?

use std::sync::Arc;

use xpledger_domain::{Milestone, PhaseContext, StudentId, ZoneId};

use crate::infrastructure::ports::{CompletionFactsRepo, RepoError};

/// Decides which milestones a student has reached after completing a phase.
///
/// Everything is computed from live counts, so asking again always yields the
/// same answer for the same state. Whether a milestone is *new* is the
/// ledger's call, not this one.
pub struct CompletionAggregator {
    facts: Arc<dyn CompletionFactsRepo>,
}

impl CompletionAggregator {
    pub fn new(facts: Arc<dyn CompletionFactsRepo>) -> Self {
        Self { facts }
    }

    /// Milestones reached, in recording order: phase, then mission, then zone.
    ///
    /// The phase milestone is always present. The mission milestone follows
    /// when every phase of the chapter is completed, and the zone milestone
    /// when, additionally, every chapter of the zone is.
    pub async fn milestones_for(
        &self,
        student_id: &StudentId,
        context: &PhaseContext,
    ) -> Result<Vec<Milestone>, RepoError> {
        let mut milestones = vec![Milestone::phase(context.phase_id)];

        let chapter = self
            .facts
            .chapter_progress(student_id, context.chapter_id)
            .await?;
        if !chapter.is_complete() {
            return Ok(milestones);
        }
        milestones.push(Milestone::mission(context.chapter_id));

        let Some(zone_id) = context.zone_id else {
            return Ok(milestones);
        };
        if self.is_zone_complete(student_id, zone_id).await? {
            milestones.push(Milestone::zone(zone_id));
        }

        Ok(milestones)
    }

    async fn is_zone_complete(
        &self,
        student_id: &StudentId,
        zone_id: ZoneId,
    ) -> Result<bool, RepoError> {
        let chapters = self.facts.chapters_in_zone(zone_id).await?;
        if chapters.is_empty() {
            return Ok(false);
        }

        for chapter_id in chapters {
            let progress = self.facts.chapter_progress(student_id, chapter_id).await?;
            if !progress.is_complete() {
                tracing::debug!(
                    student_id = %student_id,
                    zone_id = %zone_id,
                    chapter_id = %chapter_id,
                    "Zone not complete yet"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
