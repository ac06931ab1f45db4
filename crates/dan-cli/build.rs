use std::env;
use std::process::Command;

/// Expose a value to the crate through `env!`
fn stamp(key: &str, value: &str) {
    println!("cargo:rustc-env={}={}", key, value);
}

fn main() {
    stamp(
        "BUILD_DATE",
        &chrono::Utc::now().format("%Y-%m-%d").to_string(),
    );

    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    stamp("RUSTC_VERSION", &rustc_version);

    stamp(
        "BUILD_TARGET",
        &env::var("TARGET").unwrap_or_else(|_| "unknown".to_string()),
    );

    println!("cargo:rerun-if-changed=build.rs");
}
