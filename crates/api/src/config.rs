use std::time::Duration;

use roomdesigner_core::session::DEFAULT_SESSION_TIMEOUT_SECS;
use roomdesigner_core::stream_events::{
    DEFAULT_FINAL_PAUSE_MS, DEFAULT_PROGRESS_INTERVAL_MS, DEFAULT_THINKING_PAUSE_MS,
};

/// Smallest accepted SSE keep-alive interval.
pub const MIN_KEEP_ALIVE_SECS: u64 = 1;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// The single allowed CORS origin.
    pub cors_origin: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for running generations (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Lifetime of an SSE session stream (default: `180`).
    pub session_timeout_secs: u64,
    /// Interval between SSE keep-alive comments (default: `15`, minimum `1`).
    pub keep_alive_secs: u64,
    /// Upper bound on generation runs executing at once (default: `64`).
    pub max_concurrent_generations: usize,
    /// Simulated latencies of a generation run.
    pub timing: GenerationTiming,
}

/// Simulated latencies of a mocked generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTiming {
    pub thinking_pause: Duration,
    pub progress_interval: Duration,
    pub final_pause: Duration,
}

impl Default for GenerationTiming {
    fn default() -> Self {
        Self {
            thinking_pause: Duration::from_millis(DEFAULT_THINKING_PAUSE_MS),
            progress_interval: Duration::from_millis(DEFAULT_PROGRESS_INTERVAL_MS),
            final_pause: Duration::from_millis(DEFAULT_FINAL_PAUSE_MS),
        }
    }
}

impl GenerationTiming {
    /// No simulated latency at all. Used by tests.
    pub fn immediate() -> Self {
        Self {
            thinking_pause: Duration::ZERO,
            progress_interval: Duration::ZERO,
            final_pause: Duration::ZERO,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                  |
    /// |------------------------------|--------------------------|
    /// | `HOST`                       | `0.0.0.0`                |
    /// | `PORT`                       | `8080`                   |
    /// | `CORS_ORIGIN`                | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`      | `30`                     |
    /// | `SESSION_TIMEOUT_SECS`       | `180`                    |
    /// | `SSE_KEEP_ALIVE_SECS`        | `15`                     |
    /// | `MAX_CONCURRENT_GENERATIONS` | `64`                     |
    /// | `THINKING_PAUSE_MS`          | `300`                    |
    /// | `PROGRESS_INTERVAL_MS`       | `500`                    |
    /// | `FINAL_PAUSE_MS`             | `1000`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_parse("PORT", 8080);

        let cors_origin = std::env::var("CORS_ORIGIN")
            .map(|s| s.trim().to_string())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "http://localhost:3000".into());

        let timing = GenerationTiming {
            thinking_pause: Duration::from_millis(env_parse(
                "THINKING_PAUSE_MS",
                DEFAULT_THINKING_PAUSE_MS,
            )),
            progress_interval: Duration::from_millis(env_parse(
                "PROGRESS_INTERVAL_MS",
                DEFAULT_PROGRESS_INTERVAL_MS,
            )),
            final_pause: Duration::from_millis(env_parse(
                "FINAL_PAUSE_MS",
                DEFAULT_FINAL_PAUSE_MS,
            )),
        };

        Self {
            host,
            port,
            cors_origin,
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30),
            session_timeout_secs: env_parse("SESSION_TIMEOUT_SECS", DEFAULT_SESSION_TIMEOUT_SECS),
            keep_alive_secs: env_parse("SSE_KEEP_ALIVE_SECS", 15_u64).max(MIN_KEEP_ALIVE_SECS),
            max_concurrent_generations: env_parse("MAX_CONCURRENT_GENERATIONS", 64),
            timing,
        }
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    /// Keep-alive interval for SSE responses, never below
    /// `MIN_KEEP_ALIVE_SECS`.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(MIN_KEEP_ALIVE_SECS))
    }
}

/// Read and parse an env var, falling back to `default` when unset.
///
/// Panics on a value that does not parse; misconfiguration should fail at
/// startup.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}
