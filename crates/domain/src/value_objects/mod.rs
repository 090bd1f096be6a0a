//! Value objects - Immutable objects defined by their attributes

mod level_curve;
mod xp_breakdown;
mod xp_config;

pub use level_curve::{LevelCurve, LevelProgress, MAX_LEVEL};
pub use xp_breakdown::XpBreakdown;
pub use xp_config::XpConfig;
