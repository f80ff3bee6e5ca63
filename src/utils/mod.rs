//! Utility functions for the launcher

use std::env;

/// Check if an environment variable is set to a truthy value
/// Accepts: "1", "true", "on", "yes", "t" (case insensitive)
pub fn is_env_true(key: &str) -> bool {
    match env::var(key) {
        Ok(val) => is_truthy(&val),
        Err(_) => false,
    }
}

/// The truthiness rule behind [`is_env_true`]
pub fn is_truthy(value: &str) -> bool {
    let val_lower = value.trim().to_lowercase();
    matches!(val_lower.as_str(), "1" | "true" | "on" | "yes" | "t")
}

/// Get normalized platform string in format 'os_arch'
///
/// Returns strings like:
/// - "darwin_arm64" for macOS ARM64
/// - "linux_amd64" for Linux x86_64
/// - "windows_amd64" for Windows x86_64
pub fn get_platform_string() -> String {
    let os = match env::consts::OS {
        "macos" => "darwin",
        other => other,
    };

    let arch = match env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    };

    format!("{os}_{arch}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_values() {
        for value in ["1", "true", "TRUE", "on", "yes", "t", " Yes "] {
            assert!(is_truthy(value), "{value} should be truthy");
        }
        for value in ["0", "false", "", "no", "2"] {
            assert!(!is_truthy(value), "{value} should not be truthy");
        }
    }

    #[test]
    fn test_platform_string_shape() {
        let platform = get_platform_string();
        assert!(platform.contains('_'));
        assert!(!platform.starts_with("macos"));
    }
}
