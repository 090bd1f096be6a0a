//! Ledger backfill: rebuild XP events from recorded progress.
//!
//! Used once when the ledger is introduced on a database that already has
//! progress, and afterwards to repair drift. Inserts go through the same
//! insert-if-absent as live awards, so running it twice changes nothing.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use xpledger_domain::{
    ChapterId, Milestone, PhaseContext, ProfileXp, StudentId, XpConfig, XpEvent, ZoneId,
};

use crate::infrastructure::ports::{ClockPort, CompletionFactsRepo, ProfileRepo, XpLedgerRepo};

use super::error::XpError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillOptions {
    /// Compute and report, write nothing
    pub dry_run: bool,
    /// Delete the student's existing events before rebuilding
    pub reset: bool,
    /// Restrict the run to one student
    pub student: Option<StudentId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    pub students_processed: usize,
    /// Events the run derived from progress, inserted or not
    pub events_planned: usize,
    pub events_inserted: usize,
    pub profiles_updated: usize,
}

pub struct BackfillXpLedger {
    facts: Arc<dyn CompletionFactsRepo>,
    ledger: Arc<dyn XpLedgerRepo>,
    profiles: Arc<dyn ProfileRepo>,
    clock: Arc<dyn ClockPort>,
    config: Arc<XpConfig>,
}

impl BackfillXpLedger {
    pub fn new(
        facts: Arc<dyn CompletionFactsRepo>,
        ledger: Arc<dyn XpLedgerRepo>,
        profiles: Arc<dyn ProfileRepo>,
        clock: Arc<dyn ClockPort>,
        config: Arc<XpConfig>,
    ) -> Self {
        Self {
            facts,
            ledger,
            profiles,
            clock,
            config,
        }
    }

    pub async fn execute(&self, options: BackfillOptions) -> Result<BackfillReport, XpError> {
        let students: Vec<StudentId> = self
            .profiles
            .list_student_ids()
            .await?
            .into_iter()
            .filter(|id| options.student.as_ref().map_or(true, |only| only == id))
            .collect();

        let mut chapters_per_zone: HashMap<ZoneId, usize> = HashMap::new();
        for chapter in self.facts.list_chapters().await? {
            if let Some(zone_id) = chapter.zone_id {
                *chapters_per_zone.entry(zone_id).or_default() += 1;
            }
        }

        tracing::info!(
            students = students.len(),
            dry_run = options.dry_run,
            reset = options.reset,
            "Starting XP ledger backfill"
        );

        let mut report = BackfillReport::default();
        for student_id in students {
            let completed = self.facts.completed_phases(&student_id).await?;
            let milestones =
                plan_milestones(&completed, &chapters_per_zone, self.config.phases_per_mission);
            report.students_processed += 1;
            report.events_planned += milestones.len();

            if options.dry_run {
                tracing::info!(
                    student_id = %student_id,
                    completed_phases = completed.len(),
                    events = milestones.len(),
                    reset = options.reset,
                    "[dry-run] Would rebuild ledger"
                );
                continue;
            }

            if options.reset {
                let deleted = self.ledger.delete_for_student(&student_id).await?;
                tracing::info!(student_id = %student_id, deleted, "Reset XP ledger");
            }

            let inserted = self.record(&student_id, &milestones).await?;
            report.events_inserted += inserted;

            let total = self.ledger.sum_xp(&student_id).await?;
            let summary = ProfileXp::from_ledger_total(total, &self.config.level_curve);
            self.profiles.save_xp(&student_id, &summary).await?;
            report.profiles_updated += 1;

            tracing::info!(
                student_id = %student_id,
                inserted,
                total_xp = total,
                level = summary.level,
                "Backfilled student"
            );
        }

        tracing::info!(
            students_processed = report.students_processed,
            events_inserted = report.events_inserted,
            profiles_updated = report.profiles_updated,
            "XP ledger backfill complete"
        );
        Ok(report)
    }

    async fn record(
        &self,
        student_id: &StudentId,
        milestones: &[Milestone],
    ) -> Result<usize, XpError> {
        let now = self.clock.now();
        let mut inserted = 0;
        for milestone in milestones {
            let amount = self.config.amount_for(milestone.event_type);
            let event = XpEvent::new(student_id.clone(), *milestone, amount, now)?;
            if self.ledger.try_record(&event).await?.is_inserted() {
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

/// Milestones implied by a student's completed phases.
///
/// Phases come first, then missions, then zones, each in id order. Perfect
/// score bonuses are not part of progress and cannot be rebuilt.
fn plan_milestones(
    completed: &[PhaseContext],
    chapters_per_zone: &HashMap<ZoneId, usize>,
    phases_per_mission: u32,
) -> Vec<Milestone> {
    let mut phases: Vec<Milestone> = completed
        .iter()
        .map(|context| Milestone::phase(context.phase_id))
        .collect();
    phases.sort_by_key(|m| m.ref_id);
    phases.dedup();

    let mut per_chapter: BTreeMap<ChapterId, (usize, Option<ZoneId>)> = BTreeMap::new();
    for context in completed {
        let entry = per_chapter.entry(context.chapter_id).or_default();
        entry.0 += 1;
        entry.1 = context.zone_id;
    }

    let mut milestones = phases;
    let mut missions_per_zone: BTreeMap<ZoneId, usize> = BTreeMap::new();
    for (chapter_id, (count, zone_id)) in per_chapter {
        if count < phases_per_mission as usize {
            continue;
        }
        milestones.push(Milestone::mission(chapter_id));
        if let Some(zone_id) = zone_id {
            *missions_per_zone.entry(zone_id).or_default() += 1;
        }
    }

    for (zone_id, missions) in missions_per_zone {
        let total = chapters_per_zone.get(&zone_id).copied().unwrap_or(0);
        if total > 0 && missions >= total {
            milestones.push(Milestone::zone(zone_id));
        }
    }

    milestones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockCompletionFactsRepo;
    use crate::use_cases::xp::test_support::{
        fixed_time, student, InMemoryLedger, InMemoryProfiles,
    };
    use xpledger_domain::{Chapter, PhaseId, XpEventType};

    fn ctx(phase: i64, chapter: i64, zone: Option<i64>) -> PhaseContext {
        PhaseContext {
            phase_id: PhaseId::new(phase),
            chapter_id: ChapterId::new(chapter),
            zone_id: zone.map(ZoneId::new),
        }
    }

    /// Zone 1 holds chapters 1 and 2; chapter 3 has no zone.
    fn chapters() -> Vec<Chapter> {
        [(1, Some(1)), (2, Some(1)), (3, None)]
            .into_iter()
            .map(|(id, zone)| Chapter {
                id: ChapterId::new(id),
                zone_id: zone.map(ZoneId::new),
                title: format!("Chapter {}", id),
            })
            .collect()
    }

    fn full_chapter(chapter: i64, zone: Option<i64>) -> Vec<PhaseContext> {
        (0..5).map(|i| ctx(chapter * 100 + i, chapter, zone)).collect()
    }

    #[test]
    fn plan_derives_missions_and_zones_from_counts() {
        let mut completed = full_chapter(1, Some(1));
        completed.extend(full_chapter(2, Some(1)));
        completed.push(ctx(300, 3, None));
        let per_zone = HashMap::from([(ZoneId::new(1), 2)]);

        let plan = plan_milestones(&completed, &per_zone, 5);

        let count = |t: XpEventType| plan.iter().filter(|m| m.event_type == t).count();
        assert_eq!(count(XpEventType::PhaseComplete), 11);
        assert_eq!(count(XpEventType::MissionComplete), 2);
        assert_eq!(plan.last(), Some(&Milestone::zone(ZoneId::new(1))));
    }

    #[test]
    fn plan_skips_zone_with_unfinished_chapter() {
        let mut completed = full_chapter(1, Some(1));
        completed.push(ctx(200, 2, Some(1)));
        let per_zone = HashMap::from([(ZoneId::new(1), 2)]);

        let plan = plan_milestones(&completed, &per_zone, 5);

        assert!(plan
            .iter()
            .all(|m| m.event_type != XpEventType::ZoneComplete));
        assert!(plan.contains(&Milestone::mission(ChapterId::new(1))));
        assert!(!plan.contains(&Milestone::mission(ChapterId::new(2))));
    }

    fn facts(completed: Vec<PhaseContext>) -> MockCompletionFactsRepo {
        let mut facts = MockCompletionFactsRepo::new();
        facts.expect_list_chapters().returning(|| Ok(chapters()));
        facts
            .expect_completed_phases()
            .returning(move |id| {
                Ok(if id.as_str() == "ada" {
                    completed.clone()
                } else {
                    Vec::new()
                })
            });
        facts
    }

    fn backfill(
        completed: Vec<PhaseContext>,
        ledger: Arc<InMemoryLedger>,
        profiles: Arc<InMemoryProfiles>,
    ) -> BackfillXpLedger {
        BackfillXpLedger::new(
            Arc::new(facts(completed)),
            ledger,
            profiles,
            Arc::new(FixedClock(fixed_time())),
            Arc::new(XpConfig::default()),
        )
    }

    fn profiles() -> Arc<InMemoryProfiles> {
        Arc::new(
            InMemoryProfiles::default()
                .with_profile(&student("ada"), ProfileXp::default())
                .with_profile(&student("bob"), ProfileXp::default()),
        )
    }

    #[tokio::test]
    async fn backfill_rebuilds_ledger_and_profiles() {
        let mut completed = full_chapter(1, Some(1));
        completed.extend(full_chapter(2, Some(1)));
        let ledger = Arc::new(InMemoryLedger::default());
        let profiles = profiles();

        let report = backfill(completed, ledger.clone(), profiles.clone())
            .execute(BackfillOptions::default())
            .await
            .unwrap();

        // 10 phases, 2 missions, 1 zone
        assert_eq!(report.students_processed, 2);
        assert_eq!(report.events_inserted, 13);
        assert_eq!(report.profiles_updated, 2);
        let ada = profiles.xp_of(&student("ada")).unwrap();
        assert_eq!(ada.total_xp_earned, 10 * 20 + 2 * 50 + 200);
        assert_eq!(ada.level, XpConfig::default().level_curve.level_for_xp(500));
    }

    #[tokio::test]
    async fn second_run_inserts_nothing() {
        let completed = full_chapter(1, Some(1));
        let ledger = Arc::new(InMemoryLedger::default());
        let profiles = profiles();
        let use_case = backfill(completed, ledger.clone(), profiles.clone());

        use_case.execute(BackfillOptions::default()).await.unwrap();
        let report = use_case.execute(BackfillOptions::default()).await.unwrap();

        assert_eq!(report.events_inserted, 0);
        assert_eq!(report.events_planned, 6);
        assert_eq!(profiles.xp_of(&student("ada")).unwrap().xp, 150);
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let ledger = Arc::new(InMemoryLedger::default());
        let profiles = profiles();

        let report = backfill(full_chapter(1, Some(1)), ledger.clone(), profiles.clone())
            .execute(BackfillOptions {
                dry_run: true,
                reset: true,
                student: None,
            })
            .await
            .unwrap();

        assert_eq!(report.events_planned, 6);
        assert_eq!(report.events_inserted, 0);
        assert_eq!(report.profiles_updated, 0);
        assert!(ledger.events().is_empty());
        assert_eq!(profiles.xp_of(&student("ada")).unwrap().xp, 0);
    }

    #[tokio::test]
    async fn reset_replaces_bonus_amounts_with_base_amounts() {
        let ledger = Arc::new(InMemoryLedger::default());
        let bonus = XpEvent::new(
            student("ada"),
            Milestone::phase(PhaseId::new(100)),
            45,
            fixed_time(),
        )
        .unwrap();
        ledger.try_record(&bonus).await.unwrap();
        let profiles = profiles();

        let report = backfill(full_chapter(1, Some(1)), ledger.clone(), profiles.clone())
            .execute(BackfillOptions {
                dry_run: false,
                reset: true,
                student: Some(student("ada")),
            })
            .await
            .unwrap();

        assert_eq!(report.students_processed, 1);
        assert_eq!(report.events_inserted, 6);
        assert_eq!(ledger.sum_xp(&student("ada")).await.unwrap(), 150);
    }
}
