//! SQLite schema initialization - tables, constraints and indexes.

use sqlx::SqlitePool;

/// Statements are idempotent (`IF NOT EXISTS`) so this runs on every startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS zones (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chapters (
        id INTEGER PRIMARY KEY,
        zone_id INTEGER REFERENCES zones(id),
        title TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_chapters_zone ON chapters(zone_id)",
    r#"
    CREATE TABLE IF NOT EXISTS phases (
        id INTEGER PRIMARY KEY,
        chapter_id INTEGER NOT NULL REFERENCES chapters(id),
        title TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_phases_chapter ON phases(chapter_id)",
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'student',
        xp INTEGER NOT NULL DEFAULT 0,
        level INTEGER NOT NULL DEFAULT 1,
        total_xp_earned INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS student_progress (
        student_id TEXT NOT NULL,
        phase_id INTEGER NOT NULL,
        chapter_id INTEGER NOT NULL,
        zone_id INTEGER,
        completed_at TEXT,
        PRIMARY KEY (student_id, phase_id)
    )
    "#,
    // The UNIQUE triple is the ledger's only idempotence mechanism.
    r#"
    CREATE TABLE IF NOT EXISTS xp_events (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        event_type TEXT NOT NULL
            CHECK (event_type IN ('PHASE_COMPLETE', 'MISSION_COMPLETE', 'ZONE_COMPLETE')),
        ref_id INTEGER NOT NULL,
        xp_amount INTEGER NOT NULL CHECK (xp_amount >= 0),
        created_at TEXT NOT NULL,
        UNIQUE (user_id, event_type, ref_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_xp_events_user ON xp_events(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        message TEXT NOT NULL,
        metadata TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id)",
];

/// Create every table and index the engine needs.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("SQLite schema initialized (tables, constraints and indexes ensured)");
    Ok(())
}
