//! Award XP for a phase completion.
//!
//! The ledger's insert-if-absent is the only thing that decides whether XP is
//! newly granted. Everything downstream of it (the profile summary, the
//! returned breakdown, the notifications) is derived from what the ledger
//! reported, so the whole flow can be retried or run concurrently.

use std::sync::Arc;

use xpledger_domain::{
    PhaseContext, ProfileXp, StudentId, XpBreakdown, XpConfig, XpEvent, XpEventType,
};

use crate::infrastructure::ports::{
    ClockPort, CompletionFactsRepo, Notification, NotificationPort, ProfileRepo, RecordOutcome,
    XpLedgerRepo,
};

use super::completion::CompletionAggregator;
use super::error::XpError;
use super::types::{AwardResult, AwardXpRequest, ProfileSnapshot, ReasonCode};

/// Award XP use case.
///
/// Orchestrates: context resolution, milestone detection, ledger recording,
/// profile recompute, notifications.
pub struct AwardXpForPhaseCompletion {
    facts: Arc<dyn CompletionFactsRepo>,
    ledger: Arc<dyn XpLedgerRepo>,
    profiles: Arc<dyn ProfileRepo>,
    notifications: Arc<dyn NotificationPort>,
    clock: Arc<dyn ClockPort>,
    config: Arc<XpConfig>,
    aggregator: CompletionAggregator,
}

impl AwardXpForPhaseCompletion {
    pub fn new(
        facts: Arc<dyn CompletionFactsRepo>,
        ledger: Arc<dyn XpLedgerRepo>,
        profiles: Arc<dyn ProfileRepo>,
        notifications: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
        config: Arc<XpConfig>,
    ) -> Self {
        Self {
            aggregator: CompletionAggregator::new(facts.clone()),
            facts,
            ledger,
            profiles,
            notifications,
            clock,
            config,
        }
    }

    /// Execute the award flow.
    ///
    /// # Returns
    /// * `Ok(AwardResult)` - XP newly granted by this call (possibly zero) and the
    ///   recomputed profile
    /// * `Err(XpError::NotFound)` - Unknown phase; nothing was written
    /// * `Err(XpError::Transient)` - Storage failure; safe to retry the whole call
    pub async fn execute(&self, request: AwardXpRequest) -> Result<AwardResult, XpError> {
        let student_id = &request.student_id;

        let context = self
            .facts
            .phase_context(request.phase_id)
            .await?
            .ok_or_else(|| XpError::phase_not_found(request.phase_id))?;

        let milestones = self.aggregator.milestones_for(student_id, &context).await?;

        let now = self.clock.now();
        let mut awarded = XpBreakdown::default();
        let mut newly_recorded = 0usize;
        for milestone in milestones {
            let amount = match milestone.event_type {
                XpEventType::PhaseComplete => self.config.phase_amount(request.perfect_score),
                other => self.config.amount_for(other),
            };
            let event = XpEvent::new(student_id.clone(), milestone, amount, now)?;

            match self.ledger.try_record(&event).await? {
                RecordOutcome::Inserted => {
                    newly_recorded += 1;
                    awarded.add(milestone.event_type, amount);
                    tracing::debug!(
                        student_id = %student_id,
                        milestone = %milestone,
                        xp = amount,
                        "Milestone recorded"
                    );
                }
                RecordOutcome::Duplicate => {
                    tracing::debug!(
                        student_id = %student_id,
                        milestone = %milestone,
                        "Milestone already on ledger"
                    );
                }
            }
        }

        // Recompute from the ledger even when nothing was inserted: a racing
        // call may have won every insert and not yet saved its summary.
        let total = self.ledger.sum_xp(student_id).await?;
        let summary = ProfileXp::from_ledger_total(total, &self.config.level_curve);
        let old_level = self
            .profiles
            .get(student_id)
            .await?
            .map(|profile| profile.xp.level)
            .unwrap_or(1);
        self.profiles.save_xp(student_id, &summary).await?;

        // A call that recorded nothing never celebrates, even if it reads a
        // cached level a racing winner has not yet saved.
        let leveled_up = newly_recorded > 0 && summary.level > old_level;
        self.send_notifications(student_id, &context, &awarded, leveled_up.then_some(summary.level))
            .await;

        tracing::info!(
            student_id = %student_id,
            phase_id = %request.phase_id,
            xp_awarded = awarded.total,
            total_xp = summary.total_xp_earned,
            level = summary.level,
            leveled_up,
            "XP award processed"
        );

        Ok(AwardResult {
            xp_awarded: awarded,
            profile: ProfileSnapshot {
                xp: summary.xp,
                level: summary.level,
                total_xp_earned: summary.total_xp_earned,
                old_level,
                leveled_up,
            },
            reason_code: (newly_recorded == 0).then_some(ReasonCode::RepeatCompletion),
        })
    }

    async fn send_notifications(
        &self,
        student_id: &StudentId,
        context: &PhaseContext,
        awarded: &XpBreakdown,
        new_level: Option<u32>,
    ) {
        if awarded.mission > 0 {
            self.notify(Notification::mission_complete(
                student_id.clone(),
                context.chapter_id.get(),
                awarded.mission,
            ))
            .await;
        }
        if let Some(zone_id) = context.zone_id.filter(|_| awarded.zone > 0) {
            self.notify(Notification::zone_complete(
                student_id.clone(),
                zone_id.get(),
                awarded.zone,
            ))
            .await;
        }
        if let Some(level) = new_level {
            self.notify(Notification::level_up(student_id.clone(), level))
                .await;
        }
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifications.notify(&notification).await {
            tracing::warn!(
                student_id = %notification.student_id,
                kind = notification.kind.as_str(),
                error = %e,
                "Failed to deliver notification, XP award unaffected"
            );
        }
    }
}
