//! Mailer launcher
//!
//! The launch is linear: `Launcher` (start) → `PreparedLaunch` (runtime
//! environment active) → exec/spawn (control transferred). A
//! `PreparedLaunch` only exists once activation succeeded, so the framework
//! can never start without its execution context.

pub mod banner;
pub mod command;
pub mod process;

pub use command::{LaunchCommand, prepare_command, resolve_executable};

use crate::config::{ExecMode, LaunchConfig};
use crate::exceptions::Result;
use crate::venv::{self, ExecutionContext, VirtualEnv};
use log::{debug, error, info, trace};
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Launch in its initial state
#[derive(Debug)]
pub struct Launcher {
    config: LaunchConfig,
    cwd: PathBuf,
    base: ExecutionContext,
}

/// Launch whose runtime environment has been activated
#[derive(Debug)]
pub struct PreparedLaunch {
    config: LaunchConfig,
    cwd: PathBuf,
    venv: VirtualEnv,
    context: ExecutionContext,
}

impl Launcher {
    /// Launcher for the current working directory and environment
    pub fn new(config: LaunchConfig) -> Result<Self> {
        let cwd = env::current_dir()?;
        Ok(Self::with_context(config, cwd, ExecutionContext::inherited()))
    }

    /// Launcher with an explicit working directory and base environment
    pub fn with_context(config: LaunchConfig, cwd: PathBuf, base: ExecutionContext) -> Self {
        Self { config, cwd, base }
    }

    /// Active configuration
    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Print the startup message and activate the runtime environment
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentActivation` when the environment is missing or not
    /// activatable; nothing past the startup message is printed in that case.
    pub fn prepare<W: Write>(self, out: &mut W) -> Result<PreparedLaunch> {
        banner::starting(out, &self.config)?;

        trace!(
            "🔧 Environment variables: {} total",
            self.base.vars().len()
        );
        let (venv, context) = venv::activate(&self.config.venv_dir, &self.cwd, self.base)
            .inspect_err(|e| error!("❌ {e}"))?;
        info!("📁 Runtime environment: {}", venv.root().display());

        banner::environment_active(out, &venv)?;

        Ok(PreparedLaunch {
            config: self.config,
            cwd: self.cwd,
            venv,
            context,
        })
    }

    /// Run the whole launch sequence
    ///
    /// In exec mode this only returns on failure. In spawn mode it returns
    /// the framework's exit status.
    pub fn run<W: Write>(self, out: &mut W) -> Result<i32> {
        info!("🦀 Mailer launcher starting...");
        let prepared = self.prepare(out)?;
        prepared.announce(out)?;
        prepared.launch()
    }
}

impl PreparedLaunch {
    /// The activated runtime environment
    pub fn venv(&self) -> &VirtualEnv {
        &self.venv
    }

    /// The execution context the framework will receive
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Working directory the framework will run in
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Print where the framework will serve
    pub fn announce<W: Write>(&self, out: &mut W) -> Result<()> {
        banner::serving(out, &self.config)?;
        Ok(())
    }

    /// Resolve the framework command inside the activated context
    pub fn command(&self) -> Result<LaunchCommand> {
        prepare_command(&self.config, &self.context, &self.cwd)
    }

    /// Hand control to the framework
    pub fn launch(&self) -> Result<i32> {
        let command = self.command().inspect_err(|e| error!("❌ {e}"))?;

        match self.config.exec_mode {
            ExecMode::Exec => self.exec(&command),
            ExecMode::Spawn => process::spawn(&command),
        }
    }

    #[cfg(unix)]
    fn exec(&self, command: &LaunchCommand) -> Result<i32> {
        debug!("🔄 Using exec mode - process will be replaced");
        Err(process::exec(command))
    }

    #[cfg(not(unix))]
    fn exec(&self, command: &LaunchCommand) -> Result<i32> {
        debug!("📝 exec() not available on this platform, using spawn mode");
        process::spawn(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::VENV_BIN_DIR;
    use crate::exceptions::LauncherError;
    use crate::venv::validation::tests::make_venv;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn base_env() -> ExecutionContext {
        let mut vars = HashMap::new();
        vars.insert("PATH".to_string(), "/usr/bin:/bin".to_string());
        ExecutionContext::from_vars(vars)
    }

    fn spawn_config() -> LaunchConfig {
        LaunchConfig {
            exec_mode: ExecMode::Spawn,
            ..LaunchConfig::default()
        }
    }

    #[cfg(unix)]
    fn install_framework(venv_root: &Path, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = venv_root.join(VENV_BIN_DIR).join("streamlit");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_missing_environment_prints_only_startup() {
        let temp_dir = TempDir::new().unwrap();
        let launcher =
            Launcher::with_context(spawn_config(), temp_dir.path().to_path_buf(), base_env());

        let mut out = Vec::new();
        let err = launcher.run(&mut out).unwrap_err();

        assert!(matches!(err, LauncherError::EnvironmentActivation(_)));
        assert_ne!(err.exit_code(), 0);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("🚀 Starting AWS SES Mass Mailer"));
    }

    #[test]
    fn test_prepare_activates_context() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_venv(temp_dir.path(), "venv", None);
        let launcher =
            Launcher::with_context(spawn_config(), temp_dir.path().to_path_buf(), base_env());

        let mut out = Vec::new();
        let prepared = launcher.prepare(&mut out).unwrap();

        assert_eq!(prepared.venv().root(), root.as_path());
        assert_eq!(
            prepared.context().get("VIRTUAL_ENV"),
            Some(root.as_os_str())
        );
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_missing_framework_after_full_banner() {
        let temp_dir = TempDir::new().unwrap();
        make_venv(temp_dir.path(), "venv", None);
        let config = LaunchConfig {
            framework: "streamlit-does-not-exist".to_string(),
            ..spawn_config()
        };
        let launcher = Launcher::with_context(config, temp_dir.path().to_path_buf(), base_env());

        let mut out = Vec::new();
        let err = launcher.run(&mut out).unwrap_err();

        assert!(matches!(err, LauncherError::CommandNotFound(_)));
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_runs_framework_with_entry_point() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_venv(temp_dir.path(), "venv", None);
        fs::write(temp_dir.path().join("app.py"), "print('hi')\n").unwrap();
        // Succeeds only for `run app.py` inside the activated environment
        install_framework(
            &root,
            "#!/bin/sh\n[ \"$1\" = run ] && [ \"$2\" = app.py ] && [ -f \"$2\" ] && [ -n \"$VIRTUAL_ENV\" ] || exit 9\nexit 0\n",
        );
        let launcher =
            Launcher::with_context(spawn_config(), temp_dir.path().to_path_buf(), base_env());

        let mut out = Vec::new();
        assert_eq!(launcher.run(&mut out).unwrap(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_entry_point_uses_framework_status() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_venv(temp_dir.path(), "venv", None);
        install_framework(
            &root,
            "#!/bin/sh\n[ -f \"$2\" ] || { echo \"Error: File does not exist: $2\" >&2; exit 2; }\n",
        );
        let launcher =
            Launcher::with_context(spawn_config(), temp_dir.path().to_path_buf(), base_env());

        let mut out = Vec::new();
        assert_eq!(launcher.run(&mut out).unwrap(), 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_banner_is_identical_across_runs() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_venv(temp_dir.path(), "venv", None);
        install_framework(&root, "#!/bin/sh\nexit 0\n");

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let launcher =
                Launcher::with_context(spawn_config(), temp_dir.path().to_path_buf(), base_env());
            let mut out = Vec::new();
            launcher.run(&mut out).unwrap();
            outputs.push(String::from_utf8(out).unwrap());
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
