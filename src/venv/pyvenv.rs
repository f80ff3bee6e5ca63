//! `pyvenv.cfg` parsing

use crate::exceptions::Result;
use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Contents of a virtualenv's `pyvenv.cfg`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PyvenvConfig {
    /// Directory of the base interpreter (`home`)
    pub home: Option<String>,
    /// Python version the environment was created with
    pub version: Option<String>,
    /// Whether the base interpreter's site-packages are visible
    pub include_system_site_packages: bool,
    /// Custom prompt chosen at creation time
    pub prompt: Option<String>,
    /// Every key as written, lower-cased
    pub entries: BTreeMap<String, String>,
}

impl PyvenvConfig {
    /// Parse the `key = value` lines of a `pyvenv.cfg`
    pub fn parse(contents: &str) -> Self {
        let mut entries = BTreeMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                trace!("Skipping pyvenv.cfg line without '=': {line}");
                continue;
            };
            entries.insert(key.trim().to_lowercase(), value.trim().to_string());
        }

        // `version_info` is what uv and newer virtualenv write
        let version = entries
            .get("version")
            .or_else(|| entries.get("version_info"))
            .cloned();

        Self {
            home: entries.get("home").cloned(),
            version,
            include_system_site_packages: entries
                .get("include-system-site-packages")
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
            prompt: entries.get("prompt").map(|p| unquote(p).to_string()),
            entries,
        }
    }

    /// Read and parse a `pyvenv.cfg` file
    pub fn read(path: &Path) -> Result<Self> {
        debug!("📄 Reading {}", path.display());
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents))
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stdlib_venv_cfg() {
        let cfg = PyvenvConfig::parse(
            "home = /usr/bin\n\
             include-system-site-packages = false\n\
             version = 3.11.4\n\
             executable = /usr/bin/python3.11\n\
             command = /usr/bin/python3 -m venv /srv/mailer/venv\n",
        );

        assert_eq!(cfg.home.as_deref(), Some("/usr/bin"));
        assert_eq!(cfg.version.as_deref(), Some("3.11.4"));
        assert!(!cfg.include_system_site_packages);
        assert_eq!(cfg.prompt, None);
        assert_eq!(
            cfg.entries.get("command").map(String::as_str),
            Some("/usr/bin/python3 -m venv /srv/mailer/venv")
        );
    }

    #[test]
    fn test_prompt_is_unquoted() {
        let cfg = PyvenvConfig::parse("prompt = 'ses-mailer'\n");
        assert_eq!(cfg.prompt.as_deref(), Some("ses-mailer"));

        let cfg = PyvenvConfig::parse("prompt = \"mailer\"\n");
        assert_eq!(cfg.prompt.as_deref(), Some("mailer"));
    }

    #[test]
    fn test_uv_style_cfg() {
        let cfg = PyvenvConfig::parse(
            "home = /opt/python/bin\nimplementation = CPython\nuv = 0.4.0\n\
             version_info = 3.12.3\ninclude-system-site-packages = TRUE\n",
        );
        assert_eq!(cfg.version.as_deref(), Some("3.12.3"));
        assert!(cfg.include_system_site_packages);
    }

    #[test]
    fn test_garbage_lines_are_skipped() {
        let cfg = PyvenvConfig::parse("# comment\n\nnot a pair\nhome=/x\n");
        assert_eq!(cfg.home.as_deref(), Some("/x"));
        assert_eq!(cfg.entries.len(), 1);
    }
}
