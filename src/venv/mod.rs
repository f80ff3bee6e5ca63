//! Isolated runtime environment (Python virtualenv) handling

pub mod activation;
pub mod pyvenv;
pub mod validation;

pub use activation::{EnvChange, ExecutionContext};
pub use pyvenv::PyvenvConfig;
pub use validation::{VenvValidator, VirtualEnv};

use crate::exceptions::Result;
use std::path::Path;

/// Validate the environment at `venv_dir` and activate it on top of `base`
pub fn activate<P: AsRef<Path>>(
    venv_dir: P,
    cwd: &Path,
    base: ExecutionContext,
) -> Result<(VirtualEnv, ExecutionContext)> {
    let venv = VenvValidator::new(venv_dir, cwd).validate()?;
    let context = base.activate(&venv)?;
    Ok((venv, context))
}
