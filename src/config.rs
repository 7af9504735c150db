use crate::models::ScoringParams;
use crate::run::PollSchedule;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Hosted Postgres holding startups and investors. No URL means no store.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

/// Match-run API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_api_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_api_timeout(),
        }
    }
}

fn default_api_base_url() -> String { "http://localhost:3002/api".to_string() }
fn default_api_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

fn default_cache_ttl() -> u64 { 300 }
fn default_cache_capacity() -> u64 { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Rows loaded per ranking pass
    #[serde(default = "default_scan_limit")]
    pub scan_limit: usize,
    /// Serve built-in demo records when the database is missing or failing
    #[serde(default)]
    pub use_fallback_data: bool,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            scan_limit: default_scan_limit(),
            use_fallback_data: false,
        }
    }
}

fn default_limit() -> usize { 20 }
fn default_max_limit() -> usize { 100 }
fn default_scan_limit() -> usize { 5000 }

/// Score heuristic constants. These are tuning knobs, not derived values.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_sector_points")]
    pub sector_points: f64,
    #[serde(default = "default_sector_bonus_cap")]
    pub sector_bonus_cap: f64,
    #[serde(default = "default_penalty_multiplier")]
    pub penalty_multiplier: f64,
    #[serde(default = "default_base_offset")]
    pub base_offset: f64,
    #[serde(default = "default_god_score")]
    pub default_god_score: f64,
    #[serde(default = "default_good_fit_threshold")]
    pub good_fit_threshold: u8,
    #[serde(default = "default_min_match")]
    pub min_match: u8,
    #[serde(default = "default_max_match")]
    pub max_match: u8,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            sector_points: default_sector_points(),
            sector_bonus_cap: default_sector_bonus_cap(),
            penalty_multiplier: default_penalty_multiplier(),
            base_offset: default_base_offset(),
            default_god_score: default_god_score(),
            good_fit_threshold: default_good_fit_threshold(),
            min_match: default_min_match(),
            max_match: default_max_match(),
        }
    }
}

fn default_sector_points() -> f64 { 8.0 }
fn default_sector_bonus_cap() -> f64 { 32.0 }
fn default_penalty_multiplier() -> f64 { 1.5 }
fn default_base_offset() -> f64 { 10.0 }
fn default_god_score() -> f64 { 40.0 }
fn default_good_fit_threshold() -> u8 { 60 }
fn default_min_match() -> u8 { 25 }
fn default_max_match() -> u8 { 99 }

impl ScoringSettings {
    /// Convert to scoring params, rejecting an inverted or out-of-range clamp
    pub fn to_params(&self) -> Result<ScoringParams, ConfigError> {
        if self.min_match > self.max_match || self.max_match > 100 {
            return Err(ConfigError::Message(format!(
                "scoring.min_match ({}) must be <= scoring.max_match ({}) <= 100",
                self.min_match, self.max_match
            )));
        }
        if self.sector_bonus_cap < 0.0 || self.penalty_multiplier < 0.0 {
            return Err(ConfigError::Message(
                "scoring.sector_bonus_cap and scoring.penalty_multiplier must be >= 0".to_string(),
            ));
        }

        Ok(ScoringParams {
            sector_points: self.sector_points,
            sector_bonus_cap: self.sector_bonus_cap,
            penalty_multiplier: self.penalty_multiplier,
            base_offset: self.base_offset,
            default_god_score: self.default_god_score,
            good_fit_threshold: self.good_fit_threshold,
            min_match: self.min_match,
            max_match: self.max_match,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    #[serde(default = "default_fast_interval")]
    pub fast_interval_ms: u64,
    #[serde(default = "default_slow_interval")]
    pub slow_interval_ms: u64,
    #[serde(default = "default_very_slow_interval")]
    pub very_slow_interval_ms: u64,
    #[serde(default = "default_slow_after")]
    pub slow_after: u32,
    #[serde(default = "default_very_slow_after")]
    pub very_slow_after: u32,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            fast_interval_ms: default_fast_interval(),
            slow_interval_ms: default_slow_interval(),
            very_slow_interval_ms: default_very_slow_interval(),
            slow_after: default_slow_after(),
            very_slow_after: default_very_slow_after(),
            max_polls: default_max_polls(),
        }
    }
}

fn default_fast_interval() -> u64 { 2_000 }
fn default_slow_interval() -> u64 { 5_000 }
fn default_very_slow_interval() -> u64 { 10_000 }
fn default_slow_after() -> u32 { 15 }
fn default_very_slow_after() -> u32 { 30 }
fn default_max_polls() -> u32 { 60 }

impl PollingSettings {
    pub fn schedule(&self) -> PollSchedule {
        PollSchedule {
            fast: Duration::from_millis(self.fast_interval_ms),
            slow: Duration::from_millis(self.slow_interval_ms),
            very_slow: Duration::from_millis(self.very_slow_interval_ms),
            slow_after: self.slow_after,
            very_slow_after: self.very_slow_after,
            max_polls: self.max_polls,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with HOTHONEY_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., HOTHONEY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("HOTHONEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("HOTHONEY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables on top of the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_base) = env::var("MATCH_API_URL") {
        builder = builder.set_override("api.base_url", api_base)?;
    }
    if let Ok(fallback) = env::var("USE_FALLBACK_DATA") {
        let enabled = matches!(fallback.as_str(), "1" | "true" | "TRUE" | "True");
        builder = builder.set_override("matching.use_fallback_data", enabled)?;
    }

    builder.build()
}
