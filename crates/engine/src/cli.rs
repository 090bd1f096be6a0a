//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// XP Ledger Engine
#[derive(Parser)]
#[command(name = "xpledger-engine")]
#[command(about = "XP award engine - HTTP API and ledger maintenance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database path (overrides $XP_DB)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Subcommand (if not provided, serves the HTTP API)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve,

    /// Rebuild XP events from recorded progress and recompute profiles
    Backfill {
        /// Report what would be written without writing
        #[arg(long)]
        dry_run: bool,

        /// Delete each student's existing events first
        #[arg(long)]
        reset: bool,

        /// Only process this student
        #[arg(long)]
        student: Option<String>,
    },

    /// Upsert zones, chapters, phases and students from a JSON manifest
    ImportContent {
        /// Manifest file
        path: PathBuf,
    },
}
