//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases orchestrate across ports to fulfill user stories.

pub mod content;
pub mod xp;

pub use content::ContentUseCases;
pub use xp::XpUseCases;
