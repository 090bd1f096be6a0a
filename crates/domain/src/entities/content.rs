//! Content hierarchy: Zone → Chapter (mission) → Phase
//!
//! The award engine only reads this structure. Chapters may exist outside any
//! zone; such chapters can complete a mission but never a zone.

use serde::{Deserialize, Serialize};

use crate::ids::{ChapterId, PhaseId, ZoneId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    #[serde(default)]
    pub zone_id: Option<ZoneId>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub id: PhaseId,
    pub chapter_id: ChapterId,
    pub title: String,
}

/// A phase resolved to its position in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseContext {
    pub phase_id: PhaseId,
    pub chapter_id: ChapterId,
    pub zone_id: Option<ZoneId>,
}

/// Live phase counts of one chapter for one student
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChapterProgress {
    pub total_phases: u32,
    pub completed_phases: u32,
}

impl ChapterProgress {
    pub fn new(total_phases: u32, completed_phases: u32) -> Self {
        Self {
            total_phases,
            completed_phases,
        }
    }

    /// All phases done. An empty chapter is never complete.
    pub fn is_complete(&self) -> bool {
        self.total_phases > 0 && self.completed_phases >= self.total_phases
    }
}
