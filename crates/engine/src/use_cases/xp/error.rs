//! XP operation errors.

use xpledger_domain::{DomainError, PhaseId};

use crate::infrastructure::ports::RepoError;

/// Errors that can fail an XP operation as a whole.
///
/// "Already awarded" is not an error: it shows up as zero XP in the result.
#[derive(Debug, thiserror::Error)]
pub enum XpError {
    /// The phase (or its chapter) could not be resolved. Nothing was written.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    /// Storage failed for a reason other than the ledger's uniqueness
    /// constraint. Writes made before the failure stay; retrying is safe.
    #[error("Transient storage error: {0}")]
    Transient(#[from] RepoError),
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
}

impl XpError {
    pub fn phase_not_found(phase_id: PhaseId) -> Self {
        Self::NotFound {
            entity_type: "Phase",
            id: phase_id.to_string(),
        }
    }
}
