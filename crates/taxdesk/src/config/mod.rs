use crate::pricing::{RateTableError, RateTables};
use crate::reports::{ReportThresholds, ThresholdsError};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub pricing: PricingConfig,
    pub reports: ReportsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let rate_tables_path = optional_path("APP_RATE_TABLES");

        let thresholds_path = optional_path("APP_REPORT_THRESHOLDS");

        let quote_validity_days = match env::var("APP_QUOTE_VALIDITY_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidValidityWindow)?,
            Err(_) => DEFAULT_QUOTE_VALIDITY_DAYS,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            pricing: PricingConfig {
                rate_tables_path,
                quote_validity_days,
            },
            reports: ReportsConfig { thresholds_path },
        })
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_QUOTE_VALIDITY_DAYS: u32 = 30;

/// Where rate tables come from and how long an issued quote stays valid.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub rate_tables_path: Option<PathBuf>,
    pub quote_validity_days: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rate_tables_path: None,
            quote_validity_days: DEFAULT_QUOTE_VALIDITY_DAYS,
        }
    }
}

impl PricingConfig {
    /// Loads the configured rate-table file, or the built-in tables when none is set.
    pub fn rate_tables(&self) -> Result<RateTables, ConfigError> {
        match &self.rate_tables_path {
            Some(path) => RateTables::from_path(path).map_err(|source| ConfigError::RateTables {
                path: path.clone(),
                source,
            }),
            None => Ok(RateTables::standard()),
        }
    }
}

/// Optional overrides for the report insight cut-offs.
#[derive(Debug, Clone, Default)]
pub struct ReportsConfig {
    pub thresholds_path: Option<PathBuf>,
}

impl ReportsConfig {
    pub fn thresholds(&self) -> Result<ReportThresholds, ConfigError> {
        match &self.thresholds_path {
            Some(path) => {
                ReportThresholds::from_path(path).map_err(|source| ConfigError::ReportThresholds {
                    path: path.clone(),
                    source,
                })
            }
            None => Ok(ReportThresholds::default()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidValidityWindow,
    RateTables { path: PathBuf, source: RateTableError },
    ReportThresholds { path: PathBuf, source: ThresholdsError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidValidityWindow => {
                write!(f, "APP_QUOTE_VALIDITY_DAYS must be a positive whole number")
            }
            ConfigError::RateTables { path, source } => {
                write!(f, "unable to load rate tables from {}: {source}", path.display())
            }
            ConfigError::ReportThresholds { path, source } => {
                write!(
                    f,
                    "unable to load report thresholds from {}: {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidValidityWindow => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RateTables { source, .. } => Some(source),
            ConfigError::ReportThresholds { source, .. } => Some(source),
        }
    }
}
