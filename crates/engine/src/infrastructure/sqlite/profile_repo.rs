//! SQLite profile storage (XP summary cache and display names).

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use xpledger_domain::{ProfileXp, StudentId, StudentProfile};

use super::helpers::RowExt;
use crate::infrastructure::ports::{ClockPort, ProfileRepo, RepoError};

const STUDENT_ROLE: &str = "student";

pub struct SqliteProfileRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteProfileRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

fn row_to_profile(row: &SqliteRow) -> Result<StudentProfile, RepoError> {
    Ok(StudentProfile {
        id: row.column_student_id("id")?,
        full_name: row.column("full_name")?,
        xp: ProfileXp {
            xp: row.column("xp")?,
            level: row.column_u32("level")?,
            total_xp_earned: row.column("total_xp_earned")?,
        },
    })
}

#[async_trait]
impl ProfileRepo for SqliteProfileRepo {
    async fn get(&self, student_id: &StudentId) -> Result<Option<StudentProfile>, RepoError> {
        let row = sqlx::query(
            "SELECT id, full_name, xp, level, total_xp_earned FROM profiles WHERE id = ?",
        )
        .bind(student_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("profiles.get", e))?;

        row.as_ref().map(row_to_profile).transpose()
    }

    async fn save_xp(&self, student_id: &StudentId, xp: &ProfileXp) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO profiles (id, role, xp, level, total_xp_earned, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                xp = excluded.xp,
                level = excluded.level,
                total_xp_earned = excluded.total_xp_earned,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(student_id.as_str())
        .bind(STUDENT_ROLE)
        .bind(xp.xp)
        .bind(i64::from(xp.level))
        .bind(xp.total_xp_earned)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("profiles.save_xp", e))?;

        Ok(())
    }

    async fn register(&self, student_id: &StudentId, full_name: &str) -> Result<(), RepoError> {
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO profiles (id, full_name, role, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(student_id.as_str())
        .bind(full_name)
        .bind(STUDENT_ROLE)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("profiles.register", e))?;

        Ok(())
    }

    async fn list_student_ids(&self) -> Result<Vec<StudentId>, RepoError> {
        let rows = sqlx::query("SELECT id FROM profiles WHERE role = ? ORDER BY id")
            .bind(STUDENT_ROLE)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("profiles.list_students", e))?;

        rows.iter().map(|row| row.column_student_id("id")).collect()
    }

    async fn top_by_xp(&self, limit: u32) -> Result<Vec<StudentProfile>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, full_name, xp, level, total_xp_earned
            FROM profiles
            WHERE role = ?
            ORDER BY xp DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(STUDENT_ROLE)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("profiles.top_by_xp", e))?;

        rows.iter().map(row_to_profile).collect()
    }
}
