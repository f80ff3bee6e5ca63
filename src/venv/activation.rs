//! Environment activation
//!
//! Reproduces what sourcing `bin/activate` does, but on an environment map
//! handed to the framework process instead of the caller's shell session.

use super::validation::VirtualEnv;
use crate::defaults::{PATH, PYTHONHOME, VIRTUAL_ENV, VIRTUAL_ENV_PROMPT};
use crate::exceptions::{LauncherError, Result};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Windows treats environment variable names case-insensitively
const CASE_INSENSITIVE_KEYS: bool = cfg!(windows);

/// Environment variables the framework process will start with
///
/// Names and values are kept as OS strings so nothing the launcher inherited
/// is lost on the way to the framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    vars: HashMap<OsString, OsString>,
}

/// One difference between the inherited environment and the activated one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "lowercase")]
pub enum EnvChange {
    /// Variable introduced by activation
    Added { key: String, value: String },
    /// Variable whose value activation replaced
    Changed {
        key: String,
        old: String,
        new: String,
    },
    /// Variable activation removed
    Removed { key: String },
}

impl ExecutionContext {
    /// Snapshot the launcher's own environment
    pub fn inherited() -> Self {
        Self {
            vars: env::vars_os().collect(),
        }
    }

    /// Wrap an explicit set of variables
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Apply activation of `venv` on top of this environment
    pub fn activate(mut self, venv: &VirtualEnv) -> Result<Self> {
        debug!("🔄 Activating runtime environment {}", venv.root().display());

        let pythonhome = self.key_for(PYTHONHOME);
        if self.vars.remove(&pythonhome).is_some() {
            debug!("🗑️ Unset: {PYTHONHOME}");
        }

        let virtual_env = self.key_for(VIRTUAL_ENV);
        self.vars
            .insert(virtual_env, venv.root().as_os_str().to_os_string());
        let prompt = self.key_for(VIRTUAL_ENV_PROMPT);
        self.vars.insert(prompt, OsString::from(venv.prompt()));

        let path_key = self.key_for(PATH);
        let mut entries: Vec<PathBuf> = vec![venv.bin_dir().to_path_buf()];
        if let Some(existing) = self.vars.get(&path_key) {
            entries.extend(env::split_paths(existing));
        }
        let joined = env::join_paths(entries).map_err(|e| {
            LauncherError::EnvironmentActivation(format!(
                "cannot add {} to {PATH}: {e}",
                venv.bin_dir().display()
            ))
        })?;
        debug!("🛤️ {PATH}={}", joined.to_string_lossy());
        self.vars.insert(path_key, joined);

        Ok(self)
    }

    /// All variables, for handing to `Command::envs`
    pub fn vars(&self) -> &HashMap<OsString, OsString> {
        &self.vars
    }

    /// Look up a single variable
    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(&self.key_for(key)).map(OsString::as_os_str)
    }

    /// The executable search path of this context
    pub fn search_path(&self) -> Option<&OsStr> {
        self.get(PATH)
    }

    /// What changed relative to `base`, sorted by variable name
    ///
    /// Meant for display, so non UTF-8 bytes are replaced.
    pub fn diff(&self, base: &ExecutionContext) -> Vec<EnvChange> {
        let keys: BTreeSet<&OsString> = self.vars.keys().chain(base.vars.keys()).collect();
        let text = |s: &OsString| s.to_string_lossy().into_owned();

        keys.into_iter()
            .filter_map(|key| match (base.vars.get(key), self.vars.get(key)) {
                (None, Some(value)) => Some(EnvChange::Added {
                    key: text(key),
                    value: text(value),
                }),
                (Some(old), Some(new)) if old != new => Some(EnvChange::Changed {
                    key: text(key),
                    old: text(old),
                    new: text(new),
                }),
                (Some(_), None) => Some(EnvChange::Removed { key: text(key) }),
                _ => None,
            })
            .collect()
    }

    /// The stored spelling of `name`, or `name` itself when absent
    fn key_for(&self, name: &str) -> OsString {
        self.find_key(name, CASE_INSENSITIVE_KEYS)
    }

    fn find_key(&self, name: &str, ignore_case: bool) -> OsString {
        if ignore_case {
            let stored = self.vars.keys().find(|key| {
                key.to_str()
                    .is_some_and(|key| key.eq_ignore_ascii_case(name))
            });
            if let Some(key) = stored {
                return key.clone();
            }
        }
        OsString::from(name)
    }
}
