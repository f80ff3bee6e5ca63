//! CLI mode command handlers
//!
//! Only reachable when `SES_MAILER_CLI` is truthy; a normal launch never
//! interprets its arguments.

use crate::config::LaunchConfig;
use crate::exceptions::LauncherError;
use crate::exit_codes::{EXIT_ENVIRONMENT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};
use crate::launcher::{Launcher, resolve_executable};
use crate::utils::get_platform_string;
use crate::venv::{self, EnvChange, ExecutionContext, VirtualEnv};
use crate::version;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Diagnostic commands for the mailer launcher
#[derive(Parser, Debug)]
#[command(
    name = "ses-mailer",
    version = version::VERSION,
    about = "Launcher for the AWS SES Mass Mailer (CLI mode)"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Available CLI mode commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show launcher configuration (default)
    Info,
    /// Check that the application can be launched, without launching it
    Check,
    /// Show the environment changes activation makes
    Env,
    /// Launch the application as a normal run would
    Run,
}

/// Result of `check`
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub config: LaunchConfig,
    pub cwd: PathBuf,
    pub venv: Option<VirtualEnv>,
    pub venv_error: Option<String>,
    pub framework: Option<PathBuf>,
    pub framework_error: Option<String>,
    pub entry_point_exists: bool,
    pub launchable: bool,
}

/// Parse CLI mode arguments and run the selected command
pub fn dispatch<I, T>(args: I, config: LaunchConfig) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let parsed = match CliArgs::try_parse_from(args) {
        Ok(parsed) => parsed,
        Err(e) => {
            let code = if e.use_stderr() {
                EXIT_INVALID_ARGS
            } else {
                EXIT_SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    let result = match parsed.command.unwrap_or(CliCommand::Info) {
        CliCommand::Info => show_info(&config, &mut io::stdout()),
        CliCommand::Check => run_check(config, &mut io::stdout()),
        CliCommand::Env => show_env(&config, &mut io::stdout()),
        CliCommand::Run => {
            let mut stdout = io::stdout();
            Launcher::new(config).and_then(|launcher| launcher.run(&mut stdout))
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e}");
            e.exit_code()
        }
    }
}

/// Show launcher configuration
pub fn show_info<W: Write>(config: &LaunchConfig, out: &mut W) -> crate::Result<i32> {
    writeln!(out, "📧 {}", config.app_name)?;
    writeln!(out, "  Launcher: {}", version::full_version())?;
    writeln!(out, "  Platform: {}", get_platform_string())?;
    writeln!(out)?;
    writeln!(out, "🐍 Runtime environment:")?;
    writeln!(out, "  Directory: {}", config.venv_dir.display())?;
    writeln!(out)?;
    writeln!(out, "🚀 Execution:")?;
    writeln!(
        out,
        "  Command: {} {} {}",
        config.framework,
        config.run_subcommand,
        config.entry_point.display()
    )?;
    writeln!(out, "  Mode: {}", config.exec_mode)?;
    writeln!(out, "  URL: {}", config.url())?;
    Ok(EXIT_SUCCESS)
}

/// Build the check report for `cwd` and `base`
///
/// Problems are recorded in the report rather than returned.
pub fn check_report(config: LaunchConfig, cwd: &Path, base: ExecutionContext) -> CheckReport {
    let mut report = CheckReport {
        entry_point_exists: cwd.join(&config.entry_point).is_file(),
        cwd: cwd.to_path_buf(),
        config,
        venv: None,
        venv_error: None,
        framework: None,
        framework_error: None,
        launchable: false,
    };

    match venv::activate(&report.config.venv_dir, cwd, base) {
        Ok((venv, context)) => {
            match resolve_executable(&report.config.framework, &context, cwd) {
                Ok(path) => report.framework = Some(path),
                Err(e) => report.framework_error = Some(e.to_string()),
            }
            report.venv = Some(venv);
        }
        Err(e) => report.venv_error = Some(e.to_string()),
    }

    report.launchable =
        report.venv.is_some() && report.framework.is_some() && report.entry_point_exists;
    report
}

fn run_check<W: Write>(config: LaunchConfig, out: &mut W) -> crate::Result<i32> {
    let cwd = env::current_dir()
        .context("Failed to read working directory")
        .map_err(LauncherError::from)?;
    let report = check_report(config, &cwd, ExecutionContext::inherited());

    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(if report.launchable {
        EXIT_SUCCESS
    } else {
        EXIT_ENVIRONMENT_ERROR
    })
}

/// Print what activation adds, changes or removes
pub fn show_env<W: Write>(config: &LaunchConfig, out: &mut W) -> crate::Result<i32> {
    let cwd = env::current_dir()?;
    let base = ExecutionContext::inherited();
    let (_, context) = venv::activate(&config.venv_dir, &cwd, base.clone())?;
    write_changes(&context.diff(&base), out)?;
    Ok(EXIT_SUCCESS)
}

fn write_changes<W: Write>(changes: &[EnvChange], out: &mut W) -> io::Result<()> {
    for change in changes {
        match change {
            EnvChange::Added { key, value } => writeln!(out, "+ {key}={value}")?,
            EnvChange::Changed { key, new, .. } => writeln!(out, "~ {key}={new}")?,
            EnvChange::Removed { key } => writeln!(out, "- {key}")?,
        }
    }
    Ok(())
}
