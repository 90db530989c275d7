//! Selection of the branches to document.

use std::collections::BTreeSet;

use anyhow::Result;
use tracing::{debug, warn};

use crate::git::{short_name, Git, BASE_REMOTE, VERSION_BRANCH_PATTERN};

/// Build the ordered list of branch references to document.
///
/// The experimental branch (when configured and not already listed) comes first, followed by
/// every remote version branch in descending lexical order. Branches whose short name is in
/// `excluded` are dropped, the experimental one included. An empty result is logged, not fatal.
pub fn resolve_branches(
    git: &Git<'_>,
    experimental: Option<&str>,
    excluded: &BTreeSet<String>,
) -> Result<Vec<String>> {
    let listed = git.list_remote_branches(VERSION_BRANCH_PATTERN)?;
    debug!("remote version branches: {:?}", listed);
    let branches = order_branches(experimental, listed, excluded);
    if branches.is_empty() {
        warn!("no branch to document");
    }
    Ok(branches)
}

/// Pure part of [`resolve_branches`], on an already-sorted listing.
pub fn order_branches(
    experimental: Option<&str>,
    listed: Vec<String>,
    excluded: &BTreeSet<String>,
) -> Vec<String> {
    let mut branches: Vec<String> = Vec::with_capacity(listed.len() + 1);

    if let Some(exp) = experimental.filter(|e| !e.is_empty()) {
        let exp_ref = format!("{BASE_REMOTE}{exp}");
        if !listed.iter().any(|b| b == &exp_ref) {
            branches.push(exp_ref);
        }
    }
    branches.extend(listed);

    branches.retain(|b| !excluded.contains(short_name(b)));
    branches
}
