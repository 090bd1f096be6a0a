//! In-memory ledger and profile stores for XP use case tests.
//!
//! Mocks cover single calls well; the award flow reads back what it wrote,
//! so these keep real state instead.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use xpledger_domain::{
    ProfileXp, StudentId, StudentProfile, XpBreakdown, XpEvent, XpEventType,
};

use crate::infrastructure::ports::{ProfileRepo, RecordOutcome, RepoError, XpLedgerRepo};

pub(crate) fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) fn student(id: &str) -> StudentId {
    StudentId::new(id).unwrap()
}

#[derive(Default)]
pub(crate) struct InMemoryLedger {
    events: Mutex<Vec<XpEvent>>,
    fail_on: Mutex<Option<XpEventType>>,
}

impl InMemoryLedger {
    /// Make every `try_record` for `event_type` fail like a dropped connection.
    pub(crate) fn fail_on(&self, event_type: XpEventType) {
        *self.fail_on.lock().unwrap() = Some(event_type);
    }

    pub(crate) fn recover(&self) {
        *self.fail_on.lock().unwrap() = None;
    }

    pub(crate) fn events(&self) -> Vec<XpEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl XpLedgerRepo for InMemoryLedger {
    async fn try_record(&self, event: &XpEvent) -> Result<RecordOutcome, RepoError> {
        if *self.fail_on.lock().unwrap() == Some(event.event_type) {
            return Err(RepoError::database("xp_events.insert", "connection reset"));
        }
        let mut events = self.events.lock().unwrap();
        let exists = events.iter().any(|e| {
            e.student_id == event.student_id
                && e.event_type == event.event_type
                && e.ref_id == event.ref_id
        });
        if exists {
            return Ok(RecordOutcome::Duplicate);
        }
        events.push(event.clone());
        Ok(RecordOutcome::Inserted)
    }

    async fn sum_xp(&self, student_id: &StudentId) -> Result<i64, RepoError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.student_id == student_id)
            .map(|e| e.xp_amount)
            .sum())
    }

    async fn totals_by_type(&self, student_id: &StudentId) -> Result<XpBreakdown, RepoError> {
        let mut totals = XpBreakdown::default();
        for event in self.events.lock().unwrap().iter() {
            if &event.student_id == student_id {
                totals.add(event.event_type, event.xp_amount);
            }
        }
        Ok(totals)
    }

    async fn list_for_student(&self, student_id: &StudentId) -> Result<Vec<XpEvent>, RepoError> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn delete_for_student(&self, student_id: &StudentId) -> Result<u64, RepoError> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| &e.student_id != student_id);
        Ok((before - events.len()) as u64)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProfiles {
    profiles: Mutex<HashMap<StudentId, StudentProfile>>,
}

impl InMemoryProfiles {
    pub(crate) fn with_profile(self, student_id: &StudentId, xp: ProfileXp) -> Self {
        self.profiles.lock().unwrap().insert(
            student_id.clone(),
            StudentProfile {
                id: student_id.clone(),
                full_name: student_id.to_string(),
                xp,
            },
        );
        self
    }

    pub(crate) fn xp_of(&self, student_id: &StudentId) -> Option<ProfileXp> {
        self.profiles
            .lock()
            .unwrap()
            .get(student_id)
            .map(|p| p.xp)
    }
}

#[async_trait]
impl ProfileRepo for InMemoryProfiles {
    async fn get(&self, student_id: &StudentId) -> Result<Option<StudentProfile>, RepoError> {
        Ok(self.profiles.lock().unwrap().get(student_id).cloned())
    }

    async fn save_xp(&self, student_id: &StudentId, xp: &ProfileXp) -> Result<(), RepoError> {
        self.profiles
            .lock()
            .unwrap()
            .entry(student_id.clone())
            .or_insert_with(|| StudentProfile {
                id: student_id.clone(),
                full_name: String::new(),
                xp: ProfileXp::default(),
            })
            .xp = *xp;
        Ok(())
    }

    async fn register(&self, student_id: &StudentId, full_name: &str) -> Result<(), RepoError> {
        self.profiles
            .lock()
            .unwrap()
            .entry(student_id.clone())
            .or_insert_with(|| StudentProfile {
                id: student_id.clone(),
                full_name: String::new(),
                xp: ProfileXp::default(),
            })
            .full_name = full_name.to_string();
        Ok(())
    }

    async fn list_student_ids(&self) -> Result<Vec<StudentId>, RepoError> {
        let mut ids: Vec<StudentId> = self.profiles.lock().unwrap().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn top_by_xp(&self, limit: u32) -> Result<Vec<StudentProfile>, RepoError> {
        let mut profiles: Vec<StudentProfile> =
            self.profiles.lock().unwrap().values().cloned().collect();
        profiles.sort_by(|a, b| b.xp.xp.cmp(&a.xp.xp).then_with(|| a.id.cmp(&b.id)));
        profiles.truncate(limit as usize);
        Ok(profiles)
    }
}
