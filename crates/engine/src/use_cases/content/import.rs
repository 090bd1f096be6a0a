//! Import content from a JSON manifest.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use xpledger_domain::{Chapter, Phase, StudentId, Zone};

use crate::infrastructure::ports::{ContentRepo, ProfileRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// A student to register, as listed in a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSeed {
    pub id: StudentId,
    pub full_name: String,
}

/// Content hierarchy and students to upsert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentManifest {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub phases: Vec<Phase>,
    #[serde(default)]
    pub students: Vec<StudentSeed>,
}

impl ContentManifest {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        serde_json::from_str(json).map_err(|e| ContentError::InvalidManifest(e.to_string()))
    }

    /// Reject blank titles and ids listed twice.
    ///
    /// References to parents that are not in the manifest are allowed; they
    /// may already exist in the store.
    pub fn validate(&self) -> Result<(), ContentError> {
        check_unique("zone", self.zones.iter().map(|z| z.id.get()))?;
        check_unique("chapter", self.chapters.iter().map(|c| c.id.get()))?;
        check_unique("phase", self.phases.iter().map(|p| p.id.get()))?;

        let titles = self
            .zones
            .iter()
            .map(|z| ("zone", z.id.get(), z.title.as_str()))
            .chain(
                self.chapters
                    .iter()
                    .map(|c| ("chapter", c.id.get(), c.title.as_str())),
            )
            .chain(
                self.phases
                    .iter()
                    .map(|p| ("phase", p.id.get(), p.title.as_str())),
            );
        for (kind, id, title) in titles {
            if title.trim().is_empty() {
                return Err(ContentError::InvalidManifest(format!(
                    "{} {} has an empty title",
                    kind, id
                )));
            }
        }

        let mut students = HashSet::new();
        for seed in &self.students {
            if !students.insert(&seed.id) {
                return Err(ContentError::InvalidManifest(format!(
                    "student {} listed twice",
                    seed.id
                )));
            }
        }
        Ok(())
    }
}

fn check_unique(kind: &str, ids: impl Iterator<Item = i64>) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::InvalidManifest(format!(
                "{} {} listed twice",
                kind, id
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub zones: usize,
    pub chapters: usize,
    pub phases: usize,
    pub students: usize,
}

/// Upserts a manifest parents first, so foreign keys always resolve.
pub struct ImportContent {
    content: Arc<dyn ContentRepo>,
    profiles: Arc<dyn ProfileRepo>,
}

impl ImportContent {
    pub fn new(content: Arc<dyn ContentRepo>, profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { content, profiles }
    }

    pub async fn execute(&self, manifest: &ContentManifest) -> Result<ImportReport, ContentError> {
        manifest.validate()?;

        for zone in &manifest.zones {
            self.content.save_zone(zone).await?;
        }
        for chapter in &manifest.chapters {
            self.content.save_chapter(chapter).await?;
        }
        for phase in &manifest.phases {
            self.content.save_phase(phase).await?;
        }
        for seed in &manifest.students {
            self.profiles.register(&seed.id, &seed.full_name).await?;
        }

        let report = ImportReport {
            zones: manifest.zones.len(),
            chapters: manifest.chapters.len(),
            phases: manifest.phases.len(),
            students: manifest.students.len(),
        };
        tracing::info!(
            zones = report.zones,
            chapters = report.chapters,
            phases = report.phases,
            students = report.students,
            "Content imported"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockContentRepo, MockProfileRepo};
    use std::sync::Mutex;

    const MANIFEST: &str = r#"{
        "zones": [{ "id": 1, "title": "Foundations" }],
        "chapters": [
            { "id": 10, "zoneId": 1, "title": "Variables" },
            { "id": 11, "title": "Side quest" }
        ],
        "phases": [
            { "id": 100, "chapterId": 10, "title": "Intro" },
            { "id": 101, "chapterId": 10, "title": "Practice" }
        ],
        "students": [{ "id": "ada", "fullName": "Ada Lovelace" }]
    }"#;

    #[test]
    fn manifest_parses_with_optional_zone() {
        let manifest = ContentManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.chapters[1].zone_id, None);
        assert_eq!(manifest.phases.len(), 2);
        assert_eq!(manifest.students[0].id.as_str(), "ada");
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let manifest = ContentManifest::from_json(r#"{ "zones": [] }"#).unwrap();
        assert_eq!(manifest, ContentManifest::default());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut manifest = ContentManifest::from_json(MANIFEST).unwrap();
        manifest.phases.push(manifest.phases[0].clone());
        assert!(matches!(
            manifest.validate(),
            Err(ContentError::InvalidManifest(msg)) if msg.contains("phase 100")
        ));
    }

    #[test]
    fn blank_student_id_fails_to_parse() {
        let result = ContentManifest::from_json(r#"{ "students": [{ "id": " ", "fullName": "X" }] }"#);
        assert!(matches!(result, Err(ContentError::InvalidManifest(_))));
    }

    #[tokio::test]
    async fn import_saves_parents_before_children() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut content = MockContentRepo::new();
        let zones = order.clone();
        content.expect_save_zone().returning(move |z| {
            zones.lock().unwrap().push(format!("zone:{}", z.id));
            Ok(())
        });
        let chapters = order.clone();
        content.expect_save_chapter().returning(move |c| {
            chapters.lock().unwrap().push(format!("chapter:{}", c.id));
            Ok(())
        });
        let phases = order.clone();
        content.expect_save_phase().returning(move |p| {
            phases.lock().unwrap().push(format!("phase:{}", p.id));
            Ok(())
        });
        let mut profiles = MockProfileRepo::new();
        profiles
            .expect_register()
            .withf(|id, name| id.as_str() == "ada" && name == "Ada Lovelace")
            .times(1)
            .returning(|_, _| Ok(()));

        let manifest = ContentManifest::from_json(MANIFEST).unwrap();
        let report = ImportContent::new(Arc::new(content), Arc::new(profiles))
            .execute(&manifest)
            .await
            .unwrap();

        assert_eq!(report.chapters, 2);
        assert_eq!(
            *order.lock().unwrap(),
            vec![
                "zone:1",
                "chapter:10",
                "chapter:11",
                "phase:100",
                "phase:101"
            ]
        );
    }

    #[tokio::test]
    async fn invalid_manifest_writes_nothing() {
        let mut content = MockContentRepo::new();
        content.expect_save_zone().never();
        let profiles = MockProfileRepo::new();
        let manifest = ContentManifest {
            zones: vec![Zone {
                id: xpledger_domain::ZoneId::new(1),
                title: "  ".to_string(),
            }],
            ..Default::default()
        };

        let result = ImportContent::new(Arc::new(content), Arc::new(profiles))
            .execute(&manifest)
            .await;

        assert!(matches!(result, Err(ContentError::InvalidManifest(_))));
    }
}
