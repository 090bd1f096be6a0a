//! Row conversion helpers shared by the SQLite repositories.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use xpledger_domain::StudentId;

use crate::infrastructure::ports::RepoError;

/// Extension trait mapping column decode failures to `RepoError::Serialization`.
pub(super) trait RowExt {
    fn column<'r, T>(&'r self, name: &str) -> Result<T, RepoError>
    where
        T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>;

    /// Read a non-negative count or level stored as INTEGER.
    fn column_u32(&self, name: &str) -> Result<u32, RepoError>;

    fn column_student_id(&self, name: &str) -> Result<StudentId, RepoError>;
}

impl RowExt for SqliteRow {
    fn column<'r, T>(&'r self, name: &str) -> Result<T, RepoError>
    where
        T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
    {
        self.try_get(name)
            .map_err(|e| RepoError::serialization(format!("column {name}: {e}")))
    }

    fn column_u32(&self, name: &str) -> Result<u32, RepoError> {
        let value: i64 = RowExt::column(self, name)?;
        u32::try_from(value)
            .map_err(|_| RepoError::serialization(format!("column {name}: {value} out of range")))
    }

    fn column_student_id(&self, name: &str) -> Result<StudentId, RepoError> {
        let raw: String = RowExt::column(self, name)?;
        StudentId::new(raw).map_err(RepoError::serialization)
    }
}

/// Timestamps are stored as RFC 3339 text.
pub(super) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(format!("timestamp {raw}: {e}")))
}
