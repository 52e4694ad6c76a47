use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use crate::workflows::disputes::assessment::{
    AssessmentConfig, AssessmentConfigError, ConfidenceSource, RiskEngine, SeededConfidence,
    ThreadRngConfidence,
};

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
    pub assessment: AssessmentSettings,
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

        let confidence_seed = match env::var("CHARGEBACK_CONFIDENCE_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidSeed { value: raw.clone() })?,
            ),
            _ => None,
        };
        let config_path = env::var("CHARGEBACK_ASSESSMENT_CONFIG")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            assessment: AssessmentSettings {
                confidence_seed,
                config_path,
            },
        })
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

/// Engine tuning: optional JSON override of the default weights and thresholds, and an
/// optional seed that makes confidence values reproducible.
#[derive(Debug, Clone, Default)]
pub struct AssessmentSettings {
    pub confidence_seed: Option<u64>,
    pub config_path: Option<PathBuf>,
}

impl AssessmentSettings {
    pub fn assessment_config(&self) -> Result<AssessmentConfig, ConfigError> {
        let Some(path) = &self.config_path else {
            return Ok(AssessmentConfig::default());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::AssessmentFile {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::AssessmentFormat {
            path: path.clone(),
            source,
        })
    }

    pub fn confidence_source(&self) -> Arc<dyn ConfidenceSource> {
        match self.confidence_seed {
            Some(seed) => Arc::new(SeededConfidence::new(seed)),
            None => Arc::new(ThreadRngConfidence),
        }
    }

    pub fn engine(&self) -> Result<RiskEngine, ConfigError> {
        let config = self.assessment_config()?;
        RiskEngine::with_confidence_source(config, self.confidence_source())
            .map_err(ConfigError::InvalidAssessment)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidSeed {
        value: String,
    },
    AssessmentFile {
        path: PathBuf,
        source: std::io::Error,
    },
    AssessmentFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidAssessment(AssessmentConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSeed { value } => {
                write!(f, "CHARGEBACK_CONFIDENCE_SEED must be a u64 (found '{value}')")
            }
            ConfigError::AssessmentFile { path, .. } => {
                write!(f, "unable to read assessment config {}", path.display())
            }
            ConfigError::AssessmentFormat { path, .. } => {
                write!(f, "assessment config {} is not valid JSON", path.display())
            }
            ConfigError::InvalidAssessment(err) => write!(f, "invalid assessment config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidSeed { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::AssessmentFile { source, .. } => Some(source),
            ConfigError::AssessmentFormat { source, .. } => Some(source),
            ConfigError::InvalidAssessment(err) => Some(err),
        }
    }
}
