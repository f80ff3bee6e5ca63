//! Framework command preparation

use crate::config::LaunchConfig;
use crate::defaults::{FRAMEWORK_ADDRESS_FLAG, FRAMEWORK_PORT_FLAG};
use crate::exceptions::{LauncherError, Result};
use crate::venv::ExecutionContext;
use log::debug;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A fully resolved framework invocation
#[derive(Debug, Clone)]
pub struct LaunchCommand {
    /// Absolute path of the framework executable
    pub program: PathBuf,
    /// Arguments after the program name
    pub args: Vec<OsString>,
    /// Environment the process starts with (nothing else is inherited)
    pub context: ExecutionContext,
    /// Working directory of the process
    pub cwd: PathBuf,
}

impl LaunchCommand {
    /// Human-readable command line for logs and reports
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().to_string()));
        parts.join(" ")
    }
}

/// Resolve `executable` against the search path of the activated context
///
/// Names containing a path separator are resolved relative to `cwd`, the way
/// a shell would. Lookup failure is reported as "command not found".
pub fn resolve_executable(
    executable: &str,
    context: &ExecutionContext,
    cwd: &Path,
) -> Result<PathBuf> {
    match which::which_in(executable, context.search_path(), cwd) {
        Ok(path) => {
            debug!("🔍 Resolved executable '{}' to '{}'", executable, path.display());
            Ok(path)
        }
        Err(e) => {
            debug!("❌ Could not resolve '{}': {}", executable, e);
            Err(LauncherError::CommandNotFound(executable.to_string()))
        }
    }
}

/// Argument vector for the framework's run command
pub fn build_args(config: &LaunchConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        OsString::from(&config.run_subcommand),
        config.entry_point.clone().into_os_string(),
    ];

    // The framework already binds to the defaults; only pass what differs
    if config.overrides_bind() {
        args.push(FRAMEWORK_ADDRESS_FLAG.into());
        args.push(OsString::from(&config.address));
        args.push(FRAMEWORK_PORT_FLAG.into());
        args.push(config.port.to_string().into());
    }

    args
}

/// Prepare the command to execute
pub fn prepare_command(
    config: &LaunchConfig,
    context: &ExecutionContext,
    cwd: &Path,
) -> Result<LaunchCommand> {
    let entry_point = cwd.join(&config.entry_point);
    if !entry_point.is_file() {
        // The framework reports this itself; the launcher does not pre-empt it
        debug!(
            "⚠️ Entry point {} not found, {} will report the error",
            entry_point.display(),
            config.framework
        );
    }

    let program = resolve_executable(&config.framework, context, cwd)?;
    let command = LaunchCommand {
        program,
        args: build_args(config),
        context: context.clone(),
        cwd: cwd.to_path_buf(),
    };

    debug!("🎯 Final command: {}", command.display());
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::VENV_BIN_DIR;
    use crate::venv::validation::tests::make_venv;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn write_executable(path: &Path) {
        fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    fn context_with_path(entries: &[&Path]) -> ExecutionContext {
        let path = std::env::join_paths(entries).unwrap();
        let mut vars = HashMap::new();
        vars.insert("PATH".to_string(), path.to_string_lossy().to_string());
        ExecutionContext::from_vars(vars)
    }

    #[test]
    fn test_default_args() {
        let args = build_args(&LaunchConfig::default());
        assert_eq!(args, vec![OsString::from("run"), OsString::from("app.py")]);
    }

    #[test]
    fn test_bind_override_adds_flags() {
        let config = LaunchConfig {
            address: "0.0.0.0".to_string(),
            port: 9000,
            ..LaunchConfig::default()
        };
        let args: Vec<String> = build_args(&config)
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(
            args,
            vec![
                "run",
                "app.py",
                "--server.address",
                "0.0.0.0",
                "--server.port",
                "9000"
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_environment_copy_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_venv(temp_dir.path(), "venv", None);
        let venv_bin = root.join(VENV_BIN_DIR);
        let system_bin = temp_dir.path().join("system-bin");
        fs::create_dir_all(&system_bin).unwrap();
        write_executable(&venv_bin.join("streamlit"));
        write_executable(&system_bin.join("streamlit"));

        let context = context_with_path(&[venv_bin.as_path(), system_bin.as_path()]);
        let resolved = resolve_executable("streamlit", &context, temp_dir.path()).unwrap();
        assert_eq!(resolved, venv_bin.join("streamlit"));
    }

    #[test]
    fn test_missing_framework_is_command_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let context = context_with_path(&[temp_dir.path()]);
        let err = resolve_executable("streamlit", &context, temp_dir.path()).unwrap_err();
        assert!(matches!(err, LauncherError::CommandNotFound(ref name) if name == "streamlit"));
        assert_eq!(err.exit_code(), 127);
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_entry_point_still_prepares() {
        let temp_dir = TempDir::new().unwrap();
        let root = make_venv(temp_dir.path(), "venv", None);
        let venv_bin = root.join(VENV_BIN_DIR);
        write_executable(&venv_bin.join("streamlit"));

        let context = context_with_path(&[venv_bin.as_path()]);
        let command =
            prepare_command(&LaunchConfig::default(), &context, temp_dir.path()).unwrap();
        assert_eq!(command.program, venv_bin.join("streamlit"));
        assert!(command.display().ends_with("streamlit run app.py"));
        assert_eq!(command.cwd, temp_dir.path());
    }
}
