//! Launch configuration
//!
//! Every value has a fixed default matching the stock invocation
//! (`streamlit run app.py` inside `venv`). `SES_MAILER_*` variables may
//! override them; nothing is read from the command line.

use crate::defaults::{
    DEFAULT_ADDRESS, DEFAULT_APP_NAME, DEFAULT_ENTRY_POINT, DEFAULT_FRAMEWORK, DEFAULT_PORT,
    DEFAULT_RUN_SUBCOMMAND, DEFAULT_VENV_DIR, ENV_ADDRESS, ENV_ENTRY_POINT, ENV_EXEC_MODE,
    ENV_FRAMEWORK, ENV_PORT, ENV_VENV,
};
use crate::exceptions::{LauncherError, Result};
use serde::Serialize;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How control is handed to the framework process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Replace the launcher process (Unix only)
    Exec,
    /// Run the framework as a child and wait for it
    Spawn,
}

impl Default for ExecMode {
    fn default() -> Self {
        if cfg!(unix) {
            ExecMode::Exec
        } else {
            ExecMode::Spawn
        }
    }
}

impl FromStr for ExecMode {
    type Err = LauncherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "exec" => Ok(ExecMode::Exec),
            "spawn" => Ok(ExecMode::Spawn),
            other => Err(LauncherError::Config(format!(
                "{ENV_EXEC_MODE} must be 'exec' or 'spawn', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecMode::Exec => write!(f, "exec"),
            ExecMode::Spawn => write!(f, "spawn"),
        }
    }
}

/// Everything the launcher needs to know before it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchConfig {
    /// Name shown in the startup banner
    pub app_name: String,
    /// Isolated runtime environment, relative to the working directory
    pub venv_dir: PathBuf,
    /// Framework executable name
    pub framework: String,
    /// Framework subcommand that serves an application
    pub run_subcommand: String,
    /// Application entry-point file handed to the framework
    pub entry_point: PathBuf,
    /// Advertised listen address
    pub address: String,
    /// Advertised listen port
    pub port: u16,
    /// Process model for the hand-off
    pub exec_mode: ExecMode,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            venv_dir: PathBuf::from(DEFAULT_VENV_DIR),
            framework: DEFAULT_FRAMEWORK.to_string(),
            run_subcommand: DEFAULT_RUN_SUBCOMMAND.to_string(),
            entry_point: PathBuf::from(DEFAULT_ENTRY_POINT),
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            exec_mode: ExecMode::default(),
        }
    }
}

impl LaunchConfig {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(venv) = non_empty(&lookup, ENV_VENV)? {
            config.venv_dir = PathBuf::from(venv);
        }
        if let Some(framework) = non_empty(&lookup, ENV_FRAMEWORK)? {
            config.framework = framework;
        }
        if let Some(entry_point) = non_empty(&lookup, ENV_ENTRY_POINT)? {
            config.entry_point = PathBuf::from(entry_point);
        }
        if let Some(address) = non_empty(&lookup, ENV_ADDRESS)? {
            config.address = address;
        }
        if let Some(port) = non_empty(&lookup, ENV_PORT)? {
            config.port = parse_port(&port)?;
        }
        if let Some(mode) = non_empty(&lookup, ENV_EXEC_MODE)? {
            config.exec_mode = mode.parse()?;
        }

        Ok(config)
    }

    /// URL announced in the banner
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }

    /// Whether the framework needs explicit address/port flags
    pub fn overrides_bind(&self) -> bool {
        self.address != DEFAULT_ADDRESS || self.port != DEFAULT_PORT
    }
}

/// Read an override; set-but-blank values are rejected rather than ignored
fn non_empty<F>(lookup: &F, key: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(LauncherError::Config(format!(
            "{key} is set but empty"
        ))),
        Some(value) => Ok(Some(value.trim().to_string())),
    }
}

fn parse_port(value: &str) -> Result<u16> {
    match value.parse::<u16>() {
        Ok(0) | Err(_) => Err(LauncherError::Config(format!(
            "{ENV_PORT} must be a port number between 1 and 65535, got '{value}'"
        ))),
        Ok(port) => Ok(port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_stock_invocation() {
        let config = LaunchConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.venv_dir, PathBuf::from("venv"));
        assert_eq!(config.framework, "streamlit");
        assert_eq!(config.run_subcommand, "run");
        assert_eq!(config.entry_point, PathBuf::from("app.py"));
        assert_eq!(config.url(), "http://localhost:8501");
        assert!(!config.overrides_bind());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = LaunchConfig::from_lookup(lookup_from(&[
            (ENV_VENV, ".venv"),
            (ENV_FRAMEWORK, "streamlit-nightly"),
            (ENV_ENTRY_POINT, "mailer.py"),
            (ENV_ADDRESS, "0.0.0.0"),
            (ENV_PORT, " 9000 "),
            (ENV_EXEC_MODE, "SPAWN"),
        ]))
        .unwrap();

        assert_eq!(config.venv_dir, PathBuf::from(".venv"));
        assert_eq!(config.framework, "streamlit-nightly");
        assert_eq!(config.entry_point, PathBuf::from("mailer.py"));
        assert_eq!(config.url(), "http://0.0.0.0:9000");
        assert_eq!(config.exec_mode, ExecMode::Spawn);
        assert!(config.overrides_bind());
    }

    #[test]
    fn test_invalid_port_is_a_config_error() {
        for bad in ["abc", "0", "70000", "-1"] {
            let err = LaunchConfig::from_lookup(lookup_from(&[(ENV_PORT, bad)])).unwrap_err();
            assert!(
                matches!(err, LauncherError::Config(_)),
                "expected config error for {bad}"
            );
        }
    }

    #[test]
    fn test_blank_override_is_rejected() {
        let err = LaunchConfig::from_lookup(lookup_from(&[(ENV_VENV, "  ")])).unwrap_err();
        assert!(err.to_string().contains(ENV_VENV));
    }

    #[test]
    fn test_unknown_exec_mode_is_rejected() {
        let err =
            LaunchConfig::from_lookup(lookup_from(&[(ENV_EXEC_MODE, "fork")])).unwrap_err();
        assert!(matches!(err, LauncherError::Config(_)));
    }

    #[test]
    fn test_config_serializes_for_reports() {
        let config = LaunchConfig {
            exec_mode: ExecMode::Spawn,
            ..LaunchConfig::default()
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["framework"], "streamlit");
        assert_eq!(value["port"], 8501);
        assert_eq!(value["exec_mode"], "spawn");
    }
}
