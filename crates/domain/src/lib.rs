//! XP Ledger domain.
//!
//! Pure types and invariants for the XP ledger: milestone events, the cached
//! profile summary, the content hierarchy and the level curve. Nothing in
//! this crate performs I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{
    Chapter, ChapterProgress, LeaderboardEntry, Milestone, Phase, PhaseContext, ProfileXp,
    StudentProfile, XpEvent, XpEventType, Zone,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{ChapterId, NotificationId, PhaseId, StudentId, XpEventId, ZoneId};

pub use value_objects::{LevelCurve, LevelProgress, XpBreakdown, XpConfig, MAX_LEVEL};
