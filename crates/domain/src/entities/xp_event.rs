//! XP Event entity - one immutable row of the XP ledger
//!
//! An event records that a student reached a milestone and how much XP that
//! milestone was worth at the time. `(student_id, event_type, ref_id)` is
//! unique: recording the same milestone twice is a no-op, which is what makes
//! every award flow safe to repeat.
//!
//! Events are never updated. They are only deleted by the administrative
//! ledger reset that precedes a backfill.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ChapterId, PhaseId, StudentId, XpEventId, ZoneId};

/// Kind of milestone an event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum XpEventType {
    /// A single phase was completed. `ref_id` is the phase id.
    PhaseComplete,
    /// Every phase of a chapter was completed. `ref_id` is the chapter id.
    MissionComplete,
    /// Every chapter of a zone was completed. `ref_id` is the zone id.
    ZoneComplete,
}

impl XpEventType {
    pub const ALL: [XpEventType; 3] = [
        XpEventType::PhaseComplete,
        XpEventType::MissionComplete,
        XpEventType::ZoneComplete,
    ];

    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PhaseComplete => "PHASE_COMPLETE",
            Self::MissionComplete => "MISSION_COMPLETE",
            Self::ZoneComplete => "ZONE_COMPLETE",
        }
    }
}

impl fmt::Display for XpEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XpEventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PHASE_COMPLETE" => Ok(Self::PhaseComplete),
            "MISSION_COMPLETE" => Ok(Self::MissionComplete),
            "ZONE_COMPLETE" => Ok(Self::ZoneComplete),
            _ => Err(DomainError::parse(format!("Unknown XP event type: {}", s))),
        }
    }
}

/// A milestone a student may have reached: the natural key of the ledger
/// without the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub event_type: XpEventType,
    pub ref_id: i64,
}

impl Milestone {
    pub fn phase(phase_id: PhaseId) -> Self {
        Self {
            event_type: XpEventType::PhaseComplete,
            ref_id: phase_id.get(),
        }
    }

    pub fn mission(chapter_id: ChapterId) -> Self {
        Self {
            event_type: XpEventType::MissionComplete,
            ref_id: chapter_id.get(),
        }
    }

    pub fn zone(zone_id: ZoneId) -> Self {
        Self {
            event_type: XpEventType::ZoneComplete,
            ref_id: zone_id.get(),
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.event_type, self.ref_id)
    }
}

/// A recorded milestone with its XP value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XpEvent {
    pub id: XpEventId,
    pub student_id: StudentId,
    pub event_type: XpEventType,
    pub ref_id: i64,
    pub xp_amount: i64,
    pub created_at: DateTime<Utc>,
}

impl XpEvent {
    /// Create a new event for `milestone`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `xp_amount` is negative; the
    /// ledger only ever grows a learner's total.
    pub fn new(
        student_id: StudentId,
        milestone: Milestone,
        xp_amount: i64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if xp_amount < 0 {
            return Err(DomainError::validation(format!(
                "XP amount for {} cannot be negative",
                milestone
            )));
        }
        Ok(Self {
            id: XpEventId::new(),
            student_id,
            event_type: milestone.event_type,
            ref_id: milestone.ref_id,
            xp_amount,
            created_at,
        })
    }
}
