use crate::config::ConfigError;
use crate::scoring::{ProfileError, ScoreServiceError};
use crate::telemetry::TelemetryError;
use crate::tracking::{NetImportError, NetTrackingError};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Profile(ProfileError),
    Scoring(ScoreServiceError),
    Tracking(NetTrackingError),
    Import(NetImportError),
    /// Command-line input that could not be parsed.
    Input(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Profile(err) => write!(f, "{}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
            AppError::Tracking(err) => write!(f, "net tracking error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Input(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Profile(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Tracking(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Input(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ProfileError> for AppError {
    fn from(value: ProfileError) -> Self {
        Self::Profile(value)
    }
}

impl From<ScoreServiceError> for AppError {
    fn from(value: ScoreServiceError) -> Self {
        Self::Scoring(value)
    }
}

impl From<NetTrackingError> for AppError {
    fn from(value: NetTrackingError) -> Self {
        Self::Tracking(value)
    }
}

impl From<NetImportError> for AppError {
    fn from(value: NetImportError) -> Self {
        Self::Import(value)
    }
}
