//! External service port traits (learner notifications).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use xpledger_domain::StudentId;

use super::error::NotificationError;

/// What a notification celebrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MissionComplete,
    ZoneComplete,
    LevelUp,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissionComplete => "mission_complete",
            Self::ZoneComplete => "zone_complete",
            Self::LevelUp => "level_up",
        }
    }
}

/// A message for the learner's inbox
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub student_id: StudentId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
}

impl Notification {
    pub fn mission_complete(student_id: StudentId, chapter_id: i64, xp: i64) -> Self {
        Self {
            student_id,
            kind: NotificationKind::MissionComplete,
            title: "Mission Complete!".to_string(),
            message: format!("You finished every phase of this mission. +{} XP", xp),
            metadata: serde_json::json!({ "chapterId": chapter_id, "xp": xp }),
        }
    }

    pub fn zone_complete(student_id: StudentId, zone_id: i64, xp: i64) -> Self {
        Self {
            student_id,
            kind: NotificationKind::ZoneComplete,
            title: "Zone Mastered!".to_string(),
            message: format!("You completed every mission in this zone. +{} XP", xp),
            metadata: serde_json::json!({ "zoneId": zone_id, "xp": xp }),
        }
    }

    pub fn level_up(student_id: StudentId, level: u32) -> Self {
        Self {
            student_id,
            kind: NotificationKind::LevelUp,
            title: format!("Level Up! You're now Level {}", level),
            message: format!(
                "Congratulations! You've reached Level {}. Keep up the great work!",
                level
            ),
            metadata: serde_json::json!({ "level": level }),
        }
    }
}

/// Delivery channel for learner notifications.
///
/// Delivery is best-effort: callers log failures and carry on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPort: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotificationError>;
}
