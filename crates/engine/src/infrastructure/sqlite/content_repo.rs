//! SQLite content authoring (zones, chapters, phases).

use async_trait::async_trait;
use sqlx::SqlitePool;
use xpledger_domain::{Chapter, Phase, Zone, ZoneId};

use crate::infrastructure::ports::{ContentRepo, RepoError};

pub struct SqliteContentRepo {
    pool: SqlitePool,
}

impl SqliteContentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepo for SqliteContentRepo {
    async fn save_zone(&self, zone: &Zone) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO zones (id, title) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET title = excluded.title
            "#,
        )
        .bind(zone.id.get())
        .bind(&zone.title)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("zones.save", e))?;
        Ok(())
    }

    async fn save_chapter(&self, chapter: &Chapter) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (id, zone_id, title) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                zone_id = excluded.zone_id,
                title = excluded.title
            "#,
        )
        .bind(chapter.id.get())
        .bind(chapter.zone_id.map(ZoneId::get))
        .bind(&chapter.title)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("chapters.save", e))?;
        Ok(())
    }

    async fn save_phase(&self, phase: &Phase) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO phases (id, chapter_id, title) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                chapter_id = excluded.chapter_id,
                title = excluded.title
            "#,
        )
        .bind(phase.id.get())
        .bind(phase.chapter_id.get())
        .bind(&phase.title)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("phases.save", e))?;
        Ok(())
    }
}
