//! Classification of the documented versions for the version switcher.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::errors::BuildError;
use crate::git::short_name;
use crate::version::Version;

/// Lifecycle state of a menu entry relative to the latest release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    /// Same major.minor as the latest release; served from the site root.
    Latest,
    /// The configured experimental branch.
    Experimental,
    /// Newer than the latest release.
    PreFinalRelease,
    /// Older point line that is not the head of its major version.
    Obsolete,
    /// Head of an older major line: still listed without a marker.
    Supported,
}

impl VersionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionState::Latest => "LATEST",
            VersionState::Experimental => "EXPERIMENTAL",
            VersionState::PreFinalRelease => "PRE_FINAL_RELEASE",
            VersionState::Obsolete => "OBSOLETE",
            VersionState::Supported => "",
        }
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VersionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One entry of the version menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionVersion {
    /// URL segment relative to the site root; empty for the latest version.
    pub path: String,
    pub text: String,
    pub name: String,
    pub state: VersionState,
    pub selected: bool,
}

/// Greatest parsed version per major number. Labels that do not parse are ignored here.
fn heads(raw_versions: &[&str]) -> BTreeMap<u64, Version> {
    let mut heads: BTreeMap<u64, Version> = BTreeMap::new();
    for raw in raw_versions {
        let Ok(v) = Version::parse(raw) else {
            continue;
        };
        match heads.get(&v.major()) {
            Some(head) if *head >= v => {}
            _ => {
                heads.insert(v.major(), v);
            }
        }
    }
    heads
}

/// Classify every branch into a menu entry.
///
/// `branches` may carry the `origin/` prefix. The latest tag itself is skipped (its branch
/// represents it), the experimental branch is labeled as such, and every other label must parse
/// as a version.
pub fn build_versions(
    current: &str,
    branches: &[String],
    latest_tag: &str,
    experimental: &str,
) -> Result<Vec<OptionVersion>, BuildError> {
    let latest = Version::parse(latest_tag).map_err(|e| match e {
        BuildError::Parse { detail, .. } => {
            BuildError::parse(format!("latest tag version {latest_tag:?}"), detail)
        }
        other => other,
    })?;

    let raw_versions: Vec<&str> = branches.iter().map(|b| short_name(b)).collect();
    let heads = heads(&raw_versions);

    let mut versions = Vec::with_capacity(raw_versions.len());
    for name in raw_versions {
        let selected = name == current;

        if name == latest_tag {
            continue;
        }
        if !experimental.is_empty() && name == experimental {
            versions.push(OptionVersion {
                path: experimental.to_string(),
                text: "Experimental".to_string(),
                name: name.to_string(),
                state: VersionState::Experimental,
                selected,
            });
            continue;
        }

        let v = Version::parse(name)?;
        let entry = if v > latest {
            OptionVersion {
                path: name.to_string(),
                text: format!("{name} RC"),
                name: name.to_string(),
                state: VersionState::PreFinalRelease,
                selected,
            }
        } else if v.same_minor(&latest) {
            OptionVersion {
                path: String::new(),
                text: format!("{name} Latest"),
                name: name.to_string(),
                state: VersionState::Latest,
                selected,
            }
        } else {
            let is_head = heads.get(&v.major()).map(|h| *h == v).unwrap_or(false);
            OptionVersion {
                path: name.to_string(),
                text: name.to_string(),
                name: name.to_string(),
                state: if is_head {
                    VersionState::Supported
                } else {
                    VersionState::Obsolete
                },
                selected,
            }
        };
        versions.push(entry);
    }

    Ok(versions)
}
