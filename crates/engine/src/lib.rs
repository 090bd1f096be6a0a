//! XP Ledger Engine library.
//!
//! This crate contains all server-side code for the XP award engine.
//!
//! ## Structure
//!
//! - `use_cases/` - Award orchestration, reads, backfill, content import
//! - `infrastructure/` - Port traits, SQLite adapters, clock, env config
//! - `api/` - HTTP entry points
//! - `cli` - Command-line surface of the binary
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod cli;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
