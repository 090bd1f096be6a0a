//! Application state and composition.

use std::sync::Arc;

use xpledger_domain::XpConfig;

use crate::infrastructure::{
    ports::{
        ClockPort, CompletionFactsRepo, ContentRepo, NotificationPort, ProfileRepo, ProgressRepo,
        XpLedgerRepo,
    },
    sqlite::SqliteRepositories,
};
use crate::use_cases::content::{ContentUseCases, ImportContent};
use crate::use_cases::xp::{
    AwardXpForPhaseCompletion, BackfillXpLedger, CompletePhase, GetStudentXp, XpLeaderboard,
    XpUseCases,
};

/// Main application state.
///
/// Holds all ports and use cases.
/// Passed to HTTP handlers via Axum state and used directly by CLI commands.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub config: Arc<XpConfig>,
}

/// Container for all port implementations.
pub struct Repositories {
    pub ledger: Arc<dyn XpLedgerRepo>,
    pub facts: Arc<dyn CompletionFactsRepo>,
    pub progress: Arc<dyn ProgressRepo>,
    pub profile: Arc<dyn ProfileRepo>,
    pub content: Arc<dyn ContentRepo>,
    pub notifications: Arc<dyn NotificationPort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub xp: XpUseCases,
    pub content: ContentUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repos: SqliteRepositories, clock: Arc<dyn ClockPort>, config: XpConfig) -> Self {
        let repositories = Repositories {
            ledger: repos.ledger,
            facts: repos.completion.clone(),
            progress: repos.completion,
            profile: repos.profile,
            content: repos.content,
            notifications: repos.notifications,
        };
        Self::from_ports(repositories, clock, config)
    }

    /// Wire use cases over arbitrary port implementations.
    pub fn from_ports(
        repositories: Repositories,
        clock: Arc<dyn ClockPort>,
        config: XpConfig,
    ) -> Self {
        let config = Arc::new(config);

        let award = Arc::new(AwardXpForPhaseCompletion::new(
            repositories.facts.clone(),
            repositories.ledger.clone(),
            repositories.profile.clone(),
            repositories.notifications.clone(),
            clock.clone(),
            config.clone(),
        ));
        let complete_phase = Arc::new(CompletePhase::new(
            repositories.facts.clone(),
            repositories.progress.clone(),
            clock.clone(),
            award.clone(),
        ));
        let student_xp = Arc::new(GetStudentXp::new(
            repositories.profile.clone(),
            repositories.ledger.clone(),
            config.clone(),
        ));
        let leaderboard = Arc::new(XpLeaderboard::new(repositories.profile.clone()));
        let backfill = Arc::new(BackfillXpLedger::new(
            repositories.facts.clone(),
            repositories.ledger.clone(),
            repositories.profile.clone(),
            clock,
            config.clone(),
        ));

        let import = Arc::new(ImportContent::new(
            repositories.content.clone(),
            repositories.profile.clone(),
        ));

        let use_cases = UseCases {
            xp: XpUseCases::new(award, complete_phase, student_xp, leaderboard, backfill),
            content: ContentUseCases::new(import),
        };

        Self {
            repositories,
            use_cases,
            config,
        }
    }
}
