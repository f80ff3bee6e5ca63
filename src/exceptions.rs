//! Error types for the launcher

use crate::exit_codes::{
    EXIT_COMMAND_NOT_EXECUTABLE, EXIT_COMMAND_NOT_FOUND, EXIT_CONFIG_ERROR,
    EXIT_ENVIRONMENT_ERROR, EXIT_ERROR, EXIT_IO_ERROR,
};
use std::fmt;

/// Main error type for launcher operations
#[derive(Debug)]
pub enum LauncherError {
    /// The isolated runtime environment is missing or cannot be activated
    EnvironmentActivation(String),

    /// The framework executable could not be found on the activated PATH
    CommandNotFound(String),

    /// The framework executable was found but could not be started
    ProcessLaunch(String),

    /// Invalid launch configuration
    Config(String),

    /// IO error
    IoError(std::io::Error),

    /// JSON serialization error
    JsonError(serde_json::Error),

    /// Generic error with message
    Generic(String),
}

impl LauncherError {
    /// Exit code the binary reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::EnvironmentActivation(_) => EXIT_ENVIRONMENT_ERROR,
            LauncherError::CommandNotFound(_) => EXIT_COMMAND_NOT_FOUND,
            LauncherError::ProcessLaunch(_) => EXIT_COMMAND_NOT_EXECUTABLE,
            LauncherError::Config(_) => EXIT_CONFIG_ERROR,
            LauncherError::IoError(_) => EXIT_IO_ERROR,
            LauncherError::JsonError(_) | LauncherError::Generic(_) => EXIT_ERROR,
        }
    }
}

impl fmt::Display for LauncherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LauncherError::EnvironmentActivation(msg) => {
                write!(f, "Environment activation failed: {msg}")
            }
            LauncherError::CommandNotFound(msg) => write!(f, "{msg}: command not found"),
            LauncherError::ProcessLaunch(msg) => write!(f, "Failed to launch process: {msg}"),
            LauncherError::Config(msg) => write!(f, "Configuration error: {msg}"),
            LauncherError::IoError(err) => write!(f, "IO error: {err}"),
            LauncherError::JsonError(err) => write!(f, "JSON error: {err}"),
            LauncherError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for LauncherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LauncherError::IoError(err) => Some(err),
            LauncherError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(err: std::io::Error) -> Self {
        LauncherError::IoError(err)
    }
}

impl From<serde_json::Error> for LauncherError {
    fn from(err: serde_json::Error) -> Self {
        LauncherError::JsonError(err)
    }
}

impl From<anyhow::Error> for LauncherError {
    fn from(err: anyhow::Error) -> Self {
        LauncherError::Generic(format!("{err:#}"))
    }
}

/// Result type for launcher operations
pub type Result<T> = std::result::Result<T, LauncherError>;
