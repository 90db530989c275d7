use std::process::Command;

use time::macros::format_description;
use time::OffsetDateTime;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MULTIDOC_BUILD_COMMIT");

    // Commit: explicit override (release pipelines build from tarballs), else git, else "unknown".
    let commit = std::env::var("MULTIDOC_BUILD_COMMIT")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            Command::new("git")
                .args(["rev-parse", "--short=12", "HEAD"])
                .output()
                .ok()
                .filter(|o| o.status.success())
                .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=MULTIDOC_BUILD_COMMIT={commit}");

    // Build date (UTC ISO-8601).
    let fmt = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
    let build_date = OffsetDateTime::now_utc()
        .format(&fmt)
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=MULTIDOC_BUILD_DATE={build_date}");

    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=MULTIDOC_BUILD_TARGET={target}");

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=MULTIDOC_BUILD_PROFILE={profile}");

    let rustc_ver = rustc_version::version()
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=MULTIDOC_BUILD_RUSTC={rustc_ver}");
}
