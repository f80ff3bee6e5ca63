//! Console status messages printed before the hand-off
//!
//! Each line is flushed as it is written so it reaches the terminal (or a
//! pipe) ahead of anything the framework prints.

use crate::config::LaunchConfig;
use crate::venv::VirtualEnv;
use std::io::{self, Write};

/// Announce startup
pub fn starting<W: Write>(out: &mut W, config: &LaunchConfig) -> io::Result<()> {
    writeln!(out, "🚀 Starting {}...", config.app_name)?;
    out.flush()
}

/// Confirm the runtime environment is active
pub fn environment_active<W: Write>(out: &mut W, venv: &VirtualEnv) -> io::Result<()> {
    writeln!(out, "✅ Virtual environment activated ({})", venv.prompt())?;
    out.flush()
}

/// Announce where the framework will serve
pub fn serving<W: Write>(out: &mut W, config: &LaunchConfig) -> io::Result<()> {
    writeln!(out, "🌐 App will be available at {}", config.url())?;
    writeln!(out, "🛑 Press Ctrl+C to stop the server")?;
    out.flush()
}
