//! SES Mailer launcher
//!
//! Prints a short banner, activates the application's Python virtual
//! environment and hands control to `streamlit run app.py`.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Documentation
    missing_docs,

    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::too_many_arguments,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::single_match_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![allow(
    missing_docs, // constants in defaults.rs and report fields
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cli;
pub mod config;
pub mod defaults;
pub mod exceptions;
pub mod exit_codes;
pub mod launcher;
pub mod logger;
pub mod utils;
pub mod venv;
pub mod version;

// Re-export main API
pub use config::{ExecMode, LaunchConfig};
pub use exceptions::{LauncherError, Result};
pub use launcher::{LaunchCommand, Launcher, PreparedLaunch};
pub use venv::{ExecutionContext, VirtualEnv};
