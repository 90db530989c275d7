#![allow(clippy::module_name_repetitions)]
//! Small utilities: shell escaping for command previews, process execution, filesystem and download helpers.

pub mod download;
pub mod exec;
pub mod fs;

#[cfg(all(test, unix))]
pub(crate) mod fake;

pub use exec::{CommandRunner, ExecOutput, ExecRequest, ExecService};

pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|a| shell_escape(a))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn shell_escape(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_=./:@".contains(c))
    {
        s.to_string()
    } else {
        let escaped = s.replace('\'', "'\"'\"'");
        format!("'{}'", escaped)
    }
}

/// Normalize a string for use as a docker image name or tag: `:` and `/` become `-`.
pub fn sanitize_image_component(s: &str) -> String {
    s.replace([':', '/'], "-")
}
