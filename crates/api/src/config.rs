use std::num::NonZeroU64;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks, in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Seed the demo patients on startup when the table is empty.
    pub seed_demo_data: bool,
    /// Synthetic vitals generator settings.
    pub simulation: SimulationConfig,
}

/// Settings for synthetic vitals runs.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// How long one run produces readings (default: 30 s).
    pub duration: Duration,
    /// Delay between ticks (default: 3 s).
    pub tick_interval: Duration,
    /// Base seed; each run derives its own seed from this and the patient id.
    /// Unset means every run is seeded from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(30),
            tick_interval: Duration::from_secs(3),
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                    |
    /// |----------------------------|----------------------------|
    /// | `HOST`                     | `0.0.0.0`                  |
    /// | `PORT`                     | `3000`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `30`                       |
    /// | `SEED_DEMO_DATA`           | `false`                    |
    /// | `SIMULATION_DURATION_SECS` | `30`                       |
    /// | `SIMULATION_TICK_MILLIS`   | `3000`                     |
    /// | `SIMULATION_SEED`          | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let seed_demo_data: bool = std::env::var("SEED_DEMO_DATA")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SEED_DEMO_DATA must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            seed_demo_data,
            simulation: SimulationConfig::from_env(),
        }
    }
}

impl SimulationConfig {
    /// Panics if the duration or tick is zero or not a number.
    pub fn from_env() -> Self {
        let duration_secs = positive_var(
            "SIMULATION_DURATION_SECS",
            &std::env::var("SIMULATION_DURATION_SECS").unwrap_or_else(|_| "30".into()),
        );

        let tick_millis = positive_var(
            "SIMULATION_TICK_MILLIS",
            &std::env::var("SIMULATION_TICK_MILLIS").unwrap_or_else(|_| "3000".into()),
        );

        let seed = std::env::var("SIMULATION_SEED").ok().map(|v| {
            v.parse::<u64>()
                .expect("SIMULATION_SEED must be a valid u64")
        });

        Self {
            duration: Duration::from_secs(duration_secs),
            tick_interval: Duration::from_millis(tick_millis),
            seed,
        }
    }
}

/// Parse a setting that must be a positive integer, failing fast otherwise.
fn positive_var(name: &str, raw: &str) -> u64 {
    match raw.trim().parse::<NonZeroU64>() {
        Ok(value) => value.get(),
        Err(_) => panic!("{name} must be a positive integer, got {raw:?}"),
    }
}
