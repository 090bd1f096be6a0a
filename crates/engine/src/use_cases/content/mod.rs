//! Content use cases.
//!
//! Seeding zones, chapters, phases and students from a manifest.

use std::sync::Arc;

mod import;

pub use import::{ContentError, ContentManifest, ImportContent, ImportReport, StudentSeed};

/// Container for content use cases.
pub struct ContentUseCases {
    pub import: Arc<ImportContent>,
}

impl ContentUseCases {
    pub fn new(import: Arc<ImportContent>) -> Self {
        Self { import }
    }
}
