use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scheduler: SchedulerConfig,
    pub evaluator: EvaluatorConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parse_env("APP_PORT", 3000u16)?;
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        // Daily sweep by default; the exact local wall-clock alignment is a
        // deployment concern, the core contract is a single non-reentrant timer.
        let sweep_interval_secs = parse_env("APP_STATUS_SWEEP_INTERVAL_SECS", 86_400u64)?;

        let evaluator = EvaluatorConfig {
            train_timeout: Duration::from_secs(parse_env("APP_EVALUATOR_TRAIN_TIMEOUT_SECS", 30)?),
            forward_timeout: Duration::from_secs(parse_env(
                "APP_EVALUATOR_FORWARD_TIMEOUT_SECS",
                10,
            )?),
            forward_queue_capacity: parse_env("APP_EVALUATOR_QUEUE_CAPACITY", 256usize)?,
            forward_max_attempts: parse_env("APP_EVALUATOR_FORWARD_ATTEMPTS", 3u32)?,
            forward_backoff: Duration::from_millis(parse_env(
                "APP_EVALUATOR_FORWARD_BACKOFF_MS",
                500,
            )?),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scheduler: SchedulerConfig {
                sweep_interval: Duration::from_secs(sweep_interval_secs),
            },
            evaluator,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Posting status sweep timer settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub sweep_interval: Duration,
}

/// Outbound evaluator call bounds and forwarding queue policy.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub train_timeout: Duration,
    pub forward_timeout: Duration,
    pub forward_queue_capacity: usize,
    pub forward_max_attempts: u32,
    pub forward_backoff: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { key: &'static str },
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key } => {
                write!(f, "{key} could not be parsed from the environment")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidValue { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
