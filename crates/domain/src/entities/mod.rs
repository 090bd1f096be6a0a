//! Domain entities - Core business objects with identity

mod content;
mod profile;
mod xp_event;

pub use content::{Chapter, ChapterProgress, Phase, PhaseContext, Zone};
pub use profile::{LeaderboardEntry, ProfileXp, StudentProfile};
pub use xp_event::{Milestone, XpEvent, XpEventType};
