//! SQLite notification inbox.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use xpledger_domain::NotificationId;

use crate::infrastructure::ports::{ClockPort, Notification, NotificationError, NotificationPort};

pub struct SqliteNotificationRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteNotificationRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl NotificationPort for SqliteNotificationRepo {
    async fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, kind, title, message, metadata, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(NotificationId::new().to_string())
        .bind(notification.student_id.as_str())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.metadata.to_string())
        .bind(self.clock.now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;

        tracing::debug!(
            student_id = %notification.student_id,
            kind = notification.kind.as_str(),
            "Notification stored"
        );
        Ok(())
    }
}
