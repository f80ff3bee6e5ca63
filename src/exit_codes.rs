//! Standard exit codes for the launcher
//!
//! Launch failures use the shell's conventions (126/127) so the launcher
//! reports the same status the original one-line invocation would.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Runtime environment missing or not activatable
pub const EXIT_ENVIRONMENT_ERROR: i32 = 103;

/// Invalid command-line arguments (CLI mode)
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// Configuration error (invalid override value)
pub const EXIT_CONFIG_ERROR: i32 = 109;

/// Framework executable found but could not be executed
pub const EXIT_COMMAND_NOT_EXECUTABLE: i32 = 126;

/// Framework executable not found on the activated PATH
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Base added to a signal number when a child is killed by that signal
pub const EXIT_SIGNAL_BASE: i32 = 128;
