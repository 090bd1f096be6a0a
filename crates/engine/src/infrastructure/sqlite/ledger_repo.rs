//! SQLite XP ledger.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;
use xpledger_domain::{StudentId, XpBreakdown, XpEvent, XpEventId, XpEventType};

use super::helpers::{parse_timestamp, RowExt};
use crate::infrastructure::ports::{RecordOutcome, RepoError, XpLedgerRepo};

pub struct SqliteXpLedgerRepo {
    pool: SqlitePool,
}

impl SqliteXpLedgerRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl XpLedgerRepo for SqliteXpLedgerRepo {
    async fn try_record(&self, event: &XpEvent) -> Result<RecordOutcome, RepoError> {
        // DO NOTHING turns a uniqueness hit into "0 rows affected" instead of an error,
        // which is how racing callers learn they lost.
        let result = sqlx::query(
            r#"
            INSERT INTO xp_events (id, user_id, event_type, ref_id, xp_amount, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, event_type, ref_id) DO NOTHING
            "#,
        )
        .bind(event.id.to_string())
        .bind(event.student_id.as_str())
        .bind(event.event_type.as_str())
        .bind(event.ref_id)
        .bind(event.xp_amount)
        .bind(event.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("xp_events.insert", e))?;

        if result.rows_affected() > 0 {
            Ok(RecordOutcome::Inserted)
        } else {
            Ok(RecordOutcome::Duplicate)
        }
    }

    async fn sum_xp(&self, student_id: &StudentId) -> Result<i64, RepoError> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(xp_amount), 0) AS total FROM xp_events WHERE user_id = ?",
        )
        .bind(student_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database("xp_events.sum", e))?;

        row.column("total")
    }

    async fn totals_by_type(&self, student_id: &StudentId) -> Result<XpBreakdown, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT event_type, COALESCE(SUM(xp_amount), 0) AS total
            FROM xp_events
            WHERE user_id = ?
            GROUP BY event_type
            "#,
        )
        .bind(student_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("xp_events.totals_by_type", e))?;

        let mut breakdown = XpBreakdown::default();
        for row in rows {
            let event_type: String = row.column("event_type")?;
            let event_type: XpEventType = event_type.parse().map_err(RepoError::serialization)?;
            let total: i64 = row.column("total")?;
            breakdown.add(event_type, total);
        }
        Ok(breakdown)
    }

    async fn list_for_student(&self, student_id: &StudentId) -> Result<Vec<XpEvent>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, event_type, ref_id, xp_amount, created_at
            FROM xp_events
            WHERE user_id = ?
            ORDER BY created_at, rowid
            "#,
        )
        .bind(student_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("xp_events.list", e))?;

        rows.iter()
            .map(|row| {
                let id: String = row.column("id")?;
                let id = Uuid::parse_str(&id).map_err(RepoError::serialization)?;
                let event_type: String = row.column("event_type")?;
                let created_at: String = row.column("created_at")?;
                Ok(XpEvent {
                    id: XpEventId::from_uuid(id),
                    student_id: row.column_student_id("user_id")?,
                    event_type: event_type.parse().map_err(RepoError::serialization)?,
                    ref_id: row.column("ref_id")?,
                    xp_amount: row.column("xp_amount")?,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    async fn delete_for_student(&self, student_id: &StudentId) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM xp_events WHERE user_id = ?")
            .bind(student_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("xp_events.delete", e))?;

        tracing::warn!(
            student_id = %student_id,
            deleted = result.rows_affected(),
            "XP ledger reset for student"
        );
        Ok(result.rows_affected())
    }
}
