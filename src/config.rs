// Configuration loading and parsing (waiver-scout.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::roster::aggregate::LeagueRef;
use crate::roster::snapshot::Provider;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub refresh: RefreshConfig,
    pub scoring: ScoringConfig,
    pub leagues: Vec<LeagueRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshConfig {
    /// Fast polling tier used while games are live, in seconds.
    pub live_interval_secs: u64,
    /// Per-league roster fetch deadline for the fan-out, in seconds.
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Scoring format label ("ppr", "half_ppr", "standard"); unrecognized
    /// labels fall back to full PPR at use sites.
    pub format: String,
    pub week: u8,
    pub year: u16,
}

// ---------------------------------------------------------------------------
// Raw file structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole waiver-scout.toml file.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    refresh: RefreshConfig,
    scoring: ScoringConfig,
    #[serde(default)]
    leagues: Vec<RawLeague>,
}

#[derive(Debug, Deserialize)]
struct RawLeague {
    provider: String,
    league_id: String,
    #[serde(default)]
    name: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `waiver-scout.toml` under the given
/// base directory.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("waiver-scout.toml");
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;

    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let mut leagues = Vec::with_capacity(file.leagues.len());
    for raw in file.leagues {
        let provider = parse_provider(&raw.provider)?;
        leagues.push(LeagueRef {
            provider,
            league_id: raw.league_id,
            name: raw.name,
        });
    }

    let config = Config {
        refresh: file.refresh,
        scoring: file.scoring,
        leagues,
    };

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

fn parse_provider(s: &str) -> Result<Provider, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "sleeper" | "native" => Ok(Provider::Native),
        "espn" | "foreign" => Ok(Provider::Foreign),
        other => Err(ConfigError::ValidationError {
            field: "leagues.provider".into(),
            message: format!("unknown provider `{other}` (expected sleeper or espn)"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.refresh.live_interval_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "refresh.live_interval_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.refresh.fetch_timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "refresh.fetch_timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if !(1..=18).contains(&config.scoring.week) {
        return Err(ConfigError::ValidationError {
            field: "scoring.week".into(),
            message: format!("must be between 1 and 18, got {}", config.scoring.week),
        });
    }

    for league in &config.leagues {
        if league.league_id.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: "leagues.league_id".into(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
