//! Process configuration from environment variables.
//!
//! Read once at startup. Unset variables fall back to defaults; set but
//! unparsable ones are errors, so a typo never silently changes XP amounts.

use std::str::FromStr;

use xpledger_domain::{DomainError, LevelCurve, XpConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid value: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("Invalid XP configuration: {0}")]
    Xp(#[from] DomainError),
}

/// Everything the engine reads from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub db_path: String,
    pub server_host: String,
    pub server_port: u16,
    /// Comma-separated origins, `*`, or unset for no CORS layer
    pub cors_allowed_origins: Option<String>,
    pub xp: XpConfig,
}

impl EngineConfig {
    pub const DEFAULT_DB_PATH: &'static str = "xpledger.db";
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3000;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = XpConfig::default();
        let level_curve = LevelCurve::new(
            parse(&get, "LEVEL_CURVE_BASE", defaults.level_curve.base())?,
            parse(&get, "LEVEL_CURVE_EXPONENT", defaults.level_curve.exponent())?,
        )?;
        let xp = XpConfig {
            xp_per_phase: parse(&get, "XP_PER_PHASE", defaults.xp_per_phase)?,
            xp_per_mission: parse(&get, "XP_PER_MISSION", defaults.xp_per_mission)?,
            xp_per_zone: parse(&get, "XP_PER_ZONE", defaults.xp_per_zone)?,
            perfect_score_bonus: parse(
                &get,
                "XP_PERFECT_SCORE_BONUS",
                defaults.perfect_score_bonus,
            )?,
            phases_per_mission: parse(&get, "PHASES_PER_MISSION", defaults.phases_per_mission)?,
            level_curve,
        };
        xp.validate()?;

        let server_port = match get("SERVER_PORT") {
            Some(value) => parse_value("SERVER_PORT", value)?,
            None => parse(&get, "PORT", Self::DEFAULT_PORT)?,
        };

        Ok(Self {
            db_path: get("XP_DB").unwrap_or_else(|| Self::DEFAULT_DB_PATH.to_string()),
            server_host: get("SERVER_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            server_port,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS"),
            xp,
        })
    }
}

fn parse<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(name) {
        Some(value) => parse_value(name, value),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
