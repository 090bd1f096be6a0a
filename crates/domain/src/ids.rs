use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Maximum length accepted for an opaque student identifier
const MAX_STUDENT_ID_LENGTH: usize = 128;

macro_rules! define_uuid_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Content identifiers are integer keys owned by the content store.
macro_rules! define_ref_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Ledger row IDs
define_uuid_id!(XpEventId);
define_uuid_id!(NotificationId);

// Content IDs
define_ref_id!(ZoneId);
define_ref_id!(ChapterId);
define_ref_id!(PhaseId);

// ============================================================================
// StudentId
// ============================================================================

/// Opaque learner identifier (non-empty, <=128 chars, trimmed).
///
/// The identity provider owns the format; the ledger only requires that the
/// same learner always maps to the same string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StudentId(String);

impl StudentId {
    /// Create a validated student identifier.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` if the identifier is empty after
    /// trimming or longer than 128 characters.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("Student id cannot be empty"));
        }
        if trimmed.chars().count() > MAX_STUDENT_ID_LENGTH {
            return Err(DomainError::invalid_id(format!(
                "Student id cannot exceed {} characters",
                MAX_STUDENT_ID_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for StudentId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<StudentId> for String {
    fn from(id: StudentId) -> String {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_id_is_trimmed() {
        let id = StudentId::new("  u1 ").unwrap();
        assert_eq!(id.as_str(), "u1");
    }

    #[test]
    fn student_id_rejects_blank() {
        assert!(matches!(
            StudentId::new("   "),
            Err(DomainError::InvalidId(_))
        ));
    }

    #[test]
    fn student_id_rejects_overlong() {
        let long = "x".repeat(MAX_STUDENT_ID_LENGTH + 1);
        assert!(StudentId::new(long).is_err());
    }

    #[test]
    fn student_id_length_counts_characters_not_bytes() {
        let accented = "é".repeat(MAX_STUDENT_ID_LENGTH);
        assert_eq!(StudentId::new(accented.clone()).unwrap().as_str(), accented);
        assert!(StudentId::new("é".repeat(MAX_STUDENT_ID_LENGTH + 1)).is_err());
    }

    #[test]
    fn student_id_deserialization_validates() {
        let ok: StudentId = serde_json::from_str("\"u1\"").unwrap();
        assert_eq!(ok.as_str(), "u1");
        assert!(serde_json::from_str::<StudentId>("\"\"").is_err());
    }

    #[test]
    fn ref_ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&PhaseId::new(10)).unwrap();
        assert_eq!(json, "10");
        let back: ChapterId = serde_json::from_str("7").unwrap();
        assert_eq!(back.get(), 7);
    }
}
