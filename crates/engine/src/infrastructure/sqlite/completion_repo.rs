//! SQLite completion facts: content structure plus student progress.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use xpledger_domain::{
    Chapter, ChapterId, ChapterProgress, PhaseContext, PhaseId, StudentId, ZoneId,
};

use super::helpers::RowExt;
use crate::infrastructure::ports::{CompletionFactsRepo, ProgressRepo, RepoError};

pub struct SqliteCompletionRepo {
    pool: SqlitePool,
}

impl SqliteCompletionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_phase_context(row: &SqliteRow) -> Result<PhaseContext, RepoError> {
    let zone_id: Option<i64> = row.column("zone_id")?;
    Ok(PhaseContext {
        phase_id: PhaseId::new(row.column("phase_id")?),
        chapter_id: ChapterId::new(row.column("chapter_id")?),
        zone_id: zone_id.map(ZoneId::new),
    })
}

#[async_trait]
impl CompletionFactsRepo for SqliteCompletionRepo {
    async fn phase_context(&self, phase_id: PhaseId) -> Result<Option<PhaseContext>, RepoError> {
        let row = sqlx::query(
            r#"
            SELECT p.id AS phase_id, p.chapter_id AS chapter_id, c.zone_id AS zone_id
            FROM phases p
            JOIN chapters c ON c.id = p.chapter_id
            WHERE p.id = ?
            "#,
        )
        .bind(phase_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("phases.context", e))?;

        row.as_ref().map(row_to_phase_context).transpose()
    }

    async fn chapter_progress(
        &self,
        student_id: &StudentId,
        chapter_id: ChapterId,
    ) -> Result<ChapterProgress, RepoError> {
        // Completed phases are joined against the live phase list so phases
        // removed from the chapter stop counting.
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM phases WHERE chapter_id = ?) AS total_phases,
                (SELECT COUNT(*)
                   FROM student_progress sp
                   JOIN phases p ON p.id = sp.phase_id
                  WHERE sp.student_id = ?
                    AND p.chapter_id = ?
                    AND sp.completed_at IS NOT NULL) AS completed_phases
            "#,
        )
        .bind(chapter_id.get())
        .bind(student_id.as_str())
        .bind(chapter_id.get())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("student_progress.chapter_counts", e))?;

        Ok(ChapterProgress::new(
            row.column_u32("total_phases")?,
            row.column_u32("completed_phases")?,
        ))
    }

    async fn chapters_in_zone(&self, zone_id: ZoneId) -> Result<Vec<ChapterId>, RepoError> {
        let rows = sqlx::query("SELECT id FROM chapters WHERE zone_id = ? ORDER BY id")
            .bind(zone_id.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("chapters.in_zone", e))?;

        rows.iter()
            .map(|row| row.column("id").map(ChapterId::new))
            .collect()
    }

    async fn completed_phases(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<PhaseContext>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT p.id AS phase_id, p.chapter_id AS chapter_id, c.zone_id AS zone_id
            FROM student_progress sp
            JOIN phases p ON p.id = sp.phase_id
            JOIN chapters c ON c.id = p.chapter_id
            WHERE sp.student_id = ? AND sp.completed_at IS NOT NULL
            ORDER BY p.id
            "#,
        )
        .bind(student_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("student_progress.completed", e))?;

        rows.iter().map(row_to_phase_context).collect()
    }

    async fn list_chapters(&self) -> Result<Vec<Chapter>, RepoError> {
        let rows = sqlx::query("SELECT id, zone_id, title FROM chapters ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("chapters.list", e))?;

        rows.iter()
            .map(|row| {
                let zone_id: Option<i64> = row.column("zone_id")?;
                Ok(Chapter {
                    id: ChapterId::new(row.column("id")?),
                    zone_id: zone_id.map(ZoneId::new),
                    title: row.column("title")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl ProgressRepo for SqliteCompletionRepo {
    async fn mark_phase_completed(
        &self,
        student_id: &StudentId,
        context: &PhaseContext,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            INSERT INTO student_progress (student_id, phase_id, chapter_id, zone_id, completed_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(student_id, phase_id) DO UPDATE SET
                completed_at = excluded.completed_at
            WHERE student_progress.completed_at IS NULL
            "#,
        )
        .bind(student_id.as_str())
        .bind(context.phase_id.get())
        .bind(context.chapter_id.get())
        .bind(context.zone_id.map(ZoneId::get))
        .bind(completed_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("student_progress.complete", e))?;

        Ok(result.rows_affected() > 0)
    }
}
