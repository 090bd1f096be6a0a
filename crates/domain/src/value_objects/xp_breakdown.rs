//! Per-category XP totals

use serde::{Deserialize, Serialize};

use crate::entities::XpEventType;

/// XP split by milestone type. `total` is always the sum of the three tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBreakdown {
    pub phase: i64,
    pub mission: i64,
    pub zone: i64,
    pub total: i64,
}

impl XpBreakdown {
    pub fn new(phase: i64, mission: i64, zone: i64) -> Self {
        Self {
            phase,
            mission,
            zone,
            total: phase + mission + zone,
        }
    }

    /// Add `amount` to the tier of `event_type`, keeping `total` in sync.
    pub fn add(&mut self, event_type: XpEventType, amount: i64) {
        match event_type {
            XpEventType::PhaseComplete => self.phase += amount,
            XpEventType::MissionComplete => self.mission += amount,
            XpEventType::ZoneComplete => self.zone += amount,
        }
        self.total += amount;
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_total_in_sync() {
        let mut breakdown = XpBreakdown::default();
        breakdown.add(XpEventType::PhaseComplete, 20);
        breakdown.add(XpEventType::ZoneComplete, 200);
        assert_eq!(breakdown, XpBreakdown::new(20, 0, 200));
        assert_eq!(breakdown.total, 220);
        assert!(!breakdown.is_empty());
    }
}
