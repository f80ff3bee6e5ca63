//! Runtime environment validation

use super::pyvenv::PyvenvConfig;
use crate::defaults::{PYVENV_CFG_FILE, VENV_ACTIVATE_SCRIPT, VENV_BIN_DIR};
use crate::exceptions::{LauncherError, Result};
use log::{debug, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A runtime environment that passed validation and can be activated
#[derive(Debug, Clone, Serialize)]
pub struct VirtualEnv {
    root: PathBuf,
    bin_dir: PathBuf,
    activate_script: PathBuf,
    config: Option<PyvenvConfig>,
}

impl VirtualEnv {
    /// Absolute environment root, the value of `VIRTUAL_ENV`
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory prepended to `PATH`
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// The shell activation script that marks the directory as activatable
    pub fn activate_script(&self) -> &Path {
        &self.activate_script
    }

    /// Parsed `pyvenv.cfg`, if the environment has one
    pub fn config(&self) -> Option<&PyvenvConfig> {
        self.config.as_ref()
    }

    /// Prompt shown by shells: the configured one, else the directory name
    pub fn prompt(&self) -> String {
        self.config
            .as_ref()
            .and_then(|c| c.prompt.clone())
            .or_else(|| {
                self.root
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
            })
            .unwrap_or_default()
    }
}

/// Checks a directory against the layout of an activatable environment
#[derive(Debug)]
pub struct VenvValidator {
    root: PathBuf,
}

impl VenvValidator {
    /// Create a validator; relative paths are resolved against `cwd`
    pub fn new<P: AsRef<Path>>(venv_dir: P, cwd: &Path) -> Self {
        let venv_dir = venv_dir.as_ref();
        let root = if venv_dir.is_absolute() {
            venv_dir.to_path_buf()
        } else {
            cwd.join(venv_dir)
        };
        Self { root }
    }

    /// Absolute path being validated
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Executables directory of the environment
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(VENV_BIN_DIR)
    }

    /// Activation script inside the executables directory
    pub fn activate_script(&self) -> PathBuf {
        self.bin_dir().join(VENV_ACTIVATE_SCRIPT)
    }

    /// Location of `pyvenv.cfg`
    pub fn pyvenv_cfg(&self) -> PathBuf {
        self.root.join(PYVENV_CFG_FILE)
    }

    /// Validate the layout and return an activatable environment
    pub fn validate(&self) -> Result<VirtualEnv> {
        debug!("🔍 Validating runtime environment at {}", self.root.display());

        if !self.root.exists() {
            return Err(LauncherError::EnvironmentActivation(format!(
                "{}: No such file or directory",
                self.root.display()
            )));
        }
        if !self.root.is_dir() {
            return Err(LauncherError::EnvironmentActivation(format!(
                "{}: Not a directory",
                self.root.display()
            )));
        }

        let bin_dir = self.bin_dir();
        if !bin_dir.is_dir() {
            return Err(LauncherError::EnvironmentActivation(format!(
                "{}: missing executables directory '{}'",
                self.root.display(),
                VENV_BIN_DIR
            )));
        }

        let activate_script = self.activate_script();
        if !activate_script.is_file() {
            return Err(LauncherError::EnvironmentActivation(format!(
                "{}: No such file or directory",
                activate_script.display()
            )));
        }

        let cfg_path = self.pyvenv_cfg();
        let config = if cfg_path.is_file() {
            match PyvenvConfig::read(&cfg_path) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warn!("⚠️ Could not read {}: {}", cfg_path.display(), e);
                    None
                }
            }
        } else {
            debug!("📭 No {} in environment", PYVENV_CFG_FILE);
            None
        };

        debug!("✅ Runtime environment is activatable");
        Ok(VirtualEnv {
            root: self.root.clone(),
            bin_dir,
            activate_script,
            config,
        })
    }
}
