//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use xpledger_domain::*;

use super::error::RepoError;

// =============================================================================
// XP Ledger
// =============================================================================

/// Result of an insert-if-absent on the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The event was stored by this call
    Inserted,
    /// An event with the same (student, type, ref) already existed
    Duplicate,
}

impl RecordOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Append-only XP event store.
///
/// `try_record` must be atomic with respect to the
/// `(student_id, event_type, ref_id)` uniqueness: of any number of racing
/// calls for the same key exactly one observes `Inserted`, the rest observe
/// `Duplicate`, and none observes an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait XpLedgerRepo: Send + Sync {
    async fn try_record(&self, event: &XpEvent) -> Result<RecordOutcome, RepoError>;

    /// Sum of `xp_amount` over every event of the student.
    async fn sum_xp(&self, student_id: &StudentId) -> Result<i64, RepoError>;

    /// Ledger totals split by event type.
    async fn totals_by_type(&self, student_id: &StudentId) -> Result<XpBreakdown, RepoError>;

    async fn list_for_student(&self, student_id: &StudentId) -> Result<Vec<XpEvent>, RepoError>;

    /// Administrative reset. Never called on the award path.
    async fn delete_for_student(&self, student_id: &StudentId) -> Result<u64, RepoError>;
}

// =============================================================================
// Completion Facts (read side)
// =============================================================================

/// Read-only view of content structure and student progress.
///
/// Counts are computed from live data on every call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionFactsRepo: Send + Sync {
    /// Resolve phase → chapter → zone.
    async fn phase_context(&self, phase_id: PhaseId) -> Result<Option<PhaseContext>, RepoError>;

    /// Phases currently in the chapter and how many of them the student completed.
    async fn chapter_progress(
        &self,
        student_id: &StudentId,
        chapter_id: ChapterId,
    ) -> Result<ChapterProgress, RepoError>;

    async fn chapters_in_zone(&self, zone_id: ZoneId) -> Result<Vec<ChapterId>, RepoError>;

    /// Every phase the student has completed, resolved against current content.
    async fn completed_phases(&self, student_id: &StudentId)
        -> Result<Vec<PhaseContext>, RepoError>;

    async fn list_chapters(&self) -> Result<Vec<Chapter>, RepoError>;
}

// =============================================================================
// Progress (write side)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepo: Send + Sync {
    /// Mark a phase completed for the student.
    ///
    /// Returns `false` when it was already completed; the first
    /// `completed_at` is kept.
    async fn mark_phase_completed(
        &self,
        student_id: &StudentId,
        context: &PhaseContext,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Profiles
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get(&self, student_id: &StudentId) -> Result<Option<StudentProfile>, RepoError>;

    /// Overwrite the cached XP fields in a single write, creating the profile
    /// row if needed.
    async fn save_xp(&self, student_id: &StudentId, xp: &ProfileXp) -> Result<(), RepoError>;

    /// Create or rename a student profile without touching its XP.
    async fn register(&self, student_id: &StudentId, full_name: &str) -> Result<(), RepoError>;

    async fn list_student_ids(&self) -> Result<Vec<StudentId>, RepoError>;

    /// Students ordered by XP, highest first.
    async fn top_by_xp(&self, limit: u32) -> Result<Vec<StudentProfile>, RepoError>;
}

// =============================================================================
// Content (authoring side)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepo: Send + Sync {
    async fn save_zone(&self, zone: &Zone) -> Result<(), RepoError>;
    async fn save_chapter(&self, chapter: &Chapter) -> Result<(), RepoError>;
    async fn save_phase(&self, phase: &Phase) -> Result<(), RepoError>;
}
