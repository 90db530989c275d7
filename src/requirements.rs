//! `requirements.txt` handling: pre-flight check, parsing and merging of the global override.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::errors::BuildError;

pub const FILE_NAME: &str = "requirements.txt";

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\w.\-]+(?:\[[\w.,\-]+\])?)\s*([=<>!~].*)$").expect("valid requirements regex")
});

/// Dependency name -> version constraint (`mkdocs` -> `==1.5.3`).
pub type Requirements = BTreeMap<String, String>;

/// Path of the pin file inside a documentation root.
pub fn path_in(docs_root: &Path) -> PathBuf {
    docs_root.join(FILE_NAME)
}

/// Error unless the pin file exists in `docs_root`.
pub fn check(docs_root: &Path) -> Result<(), BuildError> {
    let p = path_in(docs_root);
    if p.is_file() {
        Ok(())
    } else {
        Err(BuildError::io(
            &p,
            std::io::Error::new(std::io::ErrorKind::NotFound, "requirements file not found"),
        ))
    }
}

/// Parse pin-file content. Every non-blank line must be `name<constraint>`.
pub fn parse(content: &str) -> Result<Requirements, BuildError> {
    let mut result = Requirements::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let caps = LINE_RE
            .captures(line)
            .ok_or_else(|| BuildError::parse(FILE_NAME, format!("invalid line format: {line}")))?;
        result.insert(caps[1].to_string(), caps[2].trim().to_string());
    }
    Ok(result)
}

/// Merge `overrides` into `base`; on conflict the override wins.
pub fn merge(base: &mut Requirements, overrides: &Requirements) {
    for (name, constraint) in overrides {
        base.insert(name.clone(), constraint.clone());
    }
}

/// Render in sorted name order, one pin per line.
pub fn render(reqs: &Requirements) -> String {
    let mut out = String::new();
    for (name, constraint) in reqs {
        out.push_str(name);
        out.push_str(constraint);
        out.push('\n');
    }
    out
}

/// Merge the global override content into the pin file of `docs_root`. No-op without override.
pub fn build(docs_root: &Path, override_content: &[u8]) -> Result<(), BuildError> {
    if override_content.is_empty() {
        return Ok(());
    }
    let path = path_in(docs_root);
    let base_raw = crate::util::fs::read_file(&path)?;
    let mut base = parse(&String::from_utf8_lossy(&base_raw))?;
    let overrides = parse(&String::from_utf8_lossy(override_content))?;
    debug!(
        "requirements: {} base pins, {} override pins",
        base.len(),
        overrides.len()
    );
    merge(&mut base, &overrides);
    crate::util::fs::write_file(&path, render(&base).as_bytes())?;
    info!("merged requirements override into {}", path.display());
    Ok(())
}
