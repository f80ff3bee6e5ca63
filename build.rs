use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.1".to_string());
    let version = if let Ok(v) = env::var("SES_MAILER_VERSION") {
        v
    } else {
        // VERSION file next to Cargo.toml wins over the package version
        let version_file = Path::new("VERSION");
        if version_file.exists() {
            fs::read_to_string(version_file)
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| package_version.clone())
        } else {
            package_version
        }
    };

    println!("cargo:rustc-env=SES_MAILER_VERSION={}", version);
    println!("cargo:rerun-if-changed=VERSION");
    println!("cargo:rerun-if-env-changed=SES_MAILER_VERSION");
}
