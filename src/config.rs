//! Configuration module for the foundation API
//! Handles all configurable parameters, read from the environment with
//! sensible defaults for local development.

use std::path::PathBuf;
use std::time::Duration;

use crate::core::impact::ImpactCostTable;
use crate::utils::constants::{
    CACHE_SWEEP_INTERVAL_SECS, DEFAULT_ANNUAL_RATE_PERCENT, DEFAULT_CONTENT_TTL_SECS,
    DEFAULT_GATEWAY_TIMEOUT_SECS,
};

/// Configuration for the API server
pub struct AppConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Directory holding one JSON document per page
    pub content_dir: PathBuf,

    /// Directory form submissions are appended to
    pub submissions_dir: PathBuf,

    /// Directory telemetry exports land in
    pub telemetry_dir: PathBuf,

    /// Key required by mutating CMS routes (None disables them)
    pub admin_key: Option<String>,

    /// Payment gateway base URL
    pub gateway_base_url: String,

    /// Payment gateway secret key (None disables donation routes)
    pub gateway_secret_key: Option<String>,

    /// Timeout for gateway calls
    pub gateway_timeout: Duration,

    /// Redirect target after checkout
    pub donation_callback_url: Option<String>,

    /// Advertised annual interest rate for loan quotes (percent)
    pub annual_rate_percent: f64,

    /// Per-unit costs for the impact estimator
    pub impact_costs: ImpactCostTable,

    /// TTL for cached content documents (seconds)
    pub content_ttl_secs: u64,

    /// Interval between cache expiry sweeps (seconds)
    pub cache_sweep_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: env_or("AMANI_HOST", "0.0.0.0"),
            port: env_parsed("PORT")
                .or_else(|| env_parsed("AMANI_PORT"))
                .unwrap_or(8080),
            content_dir: PathBuf::from(env_or("AMANI_CONTENT_DIR", "./content")),
            submissions_dir: PathBuf::from(env_or("AMANI_SUBMISSIONS_DIR", "./submissions")),
            telemetry_dir: PathBuf::from(env_or("AMANI_TELEMETRY_DIR", "./telemetry")),
            admin_key: env_nonempty("AMANI_ADMIN_KEY"),
            gateway_base_url: env_or("AMANI_GATEWAY_URL", "https://api.paystack.co"),
            gateway_secret_key: env_nonempty("AMANI_GATEWAY_SECRET"),
            gateway_timeout: Duration::from_secs(
                env_parsed("AMANI_GATEWAY_TIMEOUT_SECS").unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
            ),
            donation_callback_url: env_nonempty("AMANI_DONATION_CALLBACK_URL"),
            annual_rate_percent: env_parsed("AMANI_ANNUAL_RATE_PERCENT")
                .filter(|rate: &f64| rate.is_finite() && *rate >= 0.0)
                .unwrap_or(DEFAULT_ANNUAL_RATE_PERCENT),
            impact_costs: impact_costs_from_env(),
            content_ttl_secs: env_parsed("AMANI_CONTENT_TTL_SECS").unwrap_or(DEFAULT_CONTENT_TTL_SECS),
            cache_sweep_interval_secs: env_parsed("AMANI_CACHE_SWEEP_SECS")
                .unwrap_or(CACHE_SWEEP_INTERVAL_SECS),
        }
    }
}

impl AppConfig {
    /// Bind address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}

fn impact_costs_from_env() -> ImpactCostTable {
    let defaults = ImpactCostTable::default();
    let table = ImpactCostTable {
        student: env_parsed("AMANI_COST_STUDENT").unwrap_or(defaults.student),
        microloan: env_parsed("AMANI_COST_MICROLOAN").unwrap_or(defaults.microloan),
        healthcare: env_parsed("AMANI_COST_HEALTHCARE").unwrap_or(defaults.healthcare),
        community: env_parsed("AMANI_COST_COMMUNITY").unwrap_or(defaults.community),
    };

    // A broken override falls back wholesale rather than serving nonsense
    if table.validate().is_err() {
        tracing::warn!("Invalid impact cost override in environment, using defaults");
        return defaults;
    }
    table
}
