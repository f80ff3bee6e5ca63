//! Handing control to the framework process

use super::command::LaunchCommand;
use crate::exceptions::{LauncherError, Result};
use crate::exit_codes::{EXIT_ERROR, EXIT_SIGNAL_BASE};
use log::{debug, info, trace};
use std::io;
use std::process::{Command, ExitStatus};

fn build(command: &LaunchCommand) -> Command {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args);
    cmd.env_clear(); // Clear inherited environment first
    cmd.envs(command.context.vars());
    cmd.current_dir(&command.cwd);
    cmd
}

/// Map a failure to start the program onto the shell's taxonomy
fn launch_error(command: &LaunchCommand, err: io::Error) -> LauncherError {
    match err.kind() {
        io::ErrorKind::NotFound => {
            LauncherError::CommandNotFound(command.program.to_string_lossy().to_string())
        }
        _ => LauncherError::ProcessLaunch(format!("{}: {err}", command.program.display())),
    }
}

/// Replace the current process with the framework process
///
/// Only returns on failure.
#[cfg(unix)]
pub fn exec(command: &LaunchCommand) -> LauncherError {
    use std::os::unix::process::CommandExt;

    let mut cmd = build(command);
    debug!("🚀 Full command with args: {:?}", command.args);
    trace!("🔀 Using exec syscall to replace current process");
    info!("🔄 Replacing process via exec(): {}", command.display());

    let error = cmd.exec();
    launch_error(command, error)
}

/// Run the framework as a child process and return its exit status
///
/// While the child runs, termination signals sent to the launcher are
/// forwarded instead of ending the launcher. Interrupts are not forwarded:
/// a terminal delivers them to the whole foreground process group already.
pub fn spawn(command: &LaunchCommand) -> Result<i32> {
    debug!("👶 Using spawn mode - child process");
    let guard = signals::SignalGuard::install()?;

    let mut cmd = build(command);
    info!("🚀 Spawning: {}", command.display());
    let mut child = cmd.spawn().map_err(|e| launch_error(command, e))?;

    debug!("👶 Child PID: {}", child.id());
    let status = guard.wait(&mut child)?;
    let code = exit_code(status);
    debug!("✅ Child exited with status {code}");
    Ok(code)
}

/// Exit code for a finished child; signal deaths become `128 + signal`
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return EXIT_SIGNAL_BASE + signal;
        }
    }

    EXIT_ERROR
}

#[cfg(unix)]
mod signals {
    use crate::exceptions::Result;
    use log::{debug, warn};
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::SigId;
    use std::process::{Child, ExitStatus};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    /// Signal flags registered for the lifetime of one child
    pub(super) struct SignalGuard {
        interrupted: Arc<AtomicBool>,
        terminate: Arc<AtomicBool>,
        hangup: Arc<AtomicBool>,
        ids: Vec<SigId>,
    }

    impl SignalGuard {
        pub(super) fn install() -> Result<Self> {
            let interrupted = Arc::new(AtomicBool::new(false));
            let terminate = Arc::new(AtomicBool::new(false));
            let hangup = Arc::new(AtomicBool::new(false));
            let ids = vec![
                signal_hook::flag::register(SIGINT, Arc::clone(&interrupted))?,
                signal_hook::flag::register(SIGTERM, Arc::clone(&terminate))?,
                signal_hook::flag::register(SIGHUP, Arc::clone(&hangup))?,
            ];
            Ok(Self {
                interrupted,
                terminate,
                hangup,
                ids,
            })
        }

        pub(super) fn wait(&self, child: &mut Child) -> std::io::Result<ExitStatus> {
            loop {
                if let Some(status) = child.try_wait()? {
                    return Ok(status);
                }
                if self.interrupted.swap(false, Ordering::SeqCst) {
                    debug!("⏸️ Interrupt received, waiting for child to shut down");
                }
                if self.terminate.swap(false, Ordering::SeqCst) {
                    forward(child.id(), SIGTERM);
                }
                if self.hangup.swap(false, Ordering::SeqCst) {
                    forward(child.id(), SIGHUP);
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    }

    impl Drop for SignalGuard {
        fn drop(&mut self) {
            for id in self.ids.drain(..) {
                let _ = signal_hook::low_level::unregister(id);
            }
        }
    }

    impl std::fmt::Debug for SignalGuard {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SignalGuard")
                .field("registered", &self.ids.len())
                .finish()
        }
    }

    #[allow(unsafe_code)]
    fn forward(pid: u32, signal: i32) {
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            warn!("⚠️ Child PID {pid} out of range, cannot forward signal {signal}");
            return;
        };
        debug!("📡 Forwarding signal {signal} to child {pid}");
        // SAFETY: kill(2) has no memory-safety preconditions
        let rc = unsafe { libc::kill(pid, signal) };
        if rc != 0 {
            warn!(
                "⚠️ Failed to forward signal {signal} to child {pid}: {}",
                std::io::Error::last_os_error()
            );
        }
    }
}

#[cfg(not(unix))]
mod signals {
    use crate::exceptions::Result;
    use std::process::{Child, ExitStatus};

    #[derive(Debug)]
    pub(super) struct SignalGuard;

    impl SignalGuard {
        pub(super) fn install() -> Result<Self> {
            Ok(Self)
        }

        pub(super) fn wait(&self, child: &mut Child) -> std::io::Result<ExitStatus> {
            child.wait()
        }
    }
}
