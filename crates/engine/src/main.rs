//! XP Ledger Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xpledger_domain::StudentId;
use xpledger_engine::{
    api,
    cli::{Cli, Commands},
    infrastructure::{
        clock::SystemClock, config::EngineConfig, ports::ClockPort, sqlite::SqliteRepositories,
    },
    use_cases::{content::ContentManifest, xp::BackfillOptions},
    App,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xpledger_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = EngineConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    tracing::info!(
        db_path = %config.db_path,
        xp_per_phase = config.xp.xp_per_phase,
        xp_per_mission = config.xp.xp_per_mission,
        xp_per_zone = config.xp.xp_per_zone,
        "Configuration loaded"
    );

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let repos = SqliteRepositories::connect(&config.db_path, clock.clone()).await?;
    let app = Arc::new(App::new(repos, clock, config.xp.clone()));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(app, &config).await,
        Commands::Backfill {
            dry_run,
            reset,
            student,
        } => {
            let student = student.map(StudentId::new).transpose()?;
            let report = app
                .use_cases
                .xp
                .backfill
                .execute(BackfillOptions {
                    dry_run,
                    reset,
                    student,
                })
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Commands::ImportContent { path } => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read manifest {}", path.display()))?;
            let manifest = ContentManifest::from_json(&json)?;
            let report = app.use_cases.content.import.execute(&manifest).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(app: Arc<App>, config: &EngineConfig) -> anyhow::Result<()> {
    tracing::info!("Starting XP Ledger Engine");

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
