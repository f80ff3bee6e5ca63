// Centralized default values and environment variable names

// =================================
// Application
// =================================
pub const DEFAULT_APP_NAME: &str = "AWS SES Mass Mailer";
pub const DEFAULT_ENTRY_POINT: &str = "app.py";

// =================================
// Framework invocation
// =================================
pub const DEFAULT_FRAMEWORK: &str = "streamlit";
pub const DEFAULT_RUN_SUBCOMMAND: &str = "run";
pub const FRAMEWORK_ADDRESS_FLAG: &str = "--server.address";
pub const FRAMEWORK_PORT_FLAG: &str = "--server.port";

// Where the framework binds when given no flags
pub const DEFAULT_ADDRESS: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8501;

// =================================
// Runtime environment
// =================================
pub const DEFAULT_VENV_DIR: &str = "venv";
pub const PYVENV_CFG_FILE: &str = "pyvenv.cfg";

#[cfg(windows)]
pub const VENV_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const VENV_BIN_DIR: &str = "bin";

#[cfg(windows)]
pub const VENV_ACTIVATE_SCRIPT: &str = "activate.bat";
#[cfg(not(windows))]
pub const VENV_ACTIVATE_SCRIPT: &str = "activate";

// =================================
// Logging
// =================================
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// =================================
// Environment variables read by the launcher
// =================================
pub const ENV_VENV: &str = "SES_MAILER_VENV";
pub const ENV_FRAMEWORK: &str = "SES_MAILER_FRAMEWORK";
pub const ENV_ENTRY_POINT: &str = "SES_MAILER_ENTRY_POINT";
pub const ENV_ADDRESS: &str = "SES_MAILER_ADDRESS";
pub const ENV_PORT: &str = "SES_MAILER_PORT";
pub const ENV_EXEC_MODE: &str = "SES_MAILER_EXEC_MODE";
pub const ENV_LOG_LEVEL: &str = "SES_MAILER_LOG_LEVEL";
pub const ENV_LOG_PATH: &str = "SES_MAILER_LOG_PATH";
pub const ENV_CLI: &str = "SES_MAILER_CLI";

// =================================
// Environment variables written by activation
// =================================
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
pub const VIRTUAL_ENV_PROMPT: &str = "VIRTUAL_ENV_PROMPT";
pub const PYTHONHOME: &str = "PYTHONHOME";
pub const PATH: &str = "PATH";
