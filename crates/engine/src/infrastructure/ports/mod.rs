//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - Notification delivery (could swap the SQLite inbox -> push/e-mail)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{NotificationError, RepoError};

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::*;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{Notification, NotificationKind, NotificationPort};

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use external::MockNotificationPort;

