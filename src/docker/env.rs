#![allow(clippy::module_name_repetitions)]
//! Optional `--env-file` forwarded to the site-generator container.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::BuildError;

/// Validate the env file at `path` and return its absolute location.
///
/// A missing file is not an error: nothing is forwarded. Malformed lines are reported with the
/// file name so that docker does not fail later with a less helpful message.
pub fn env_file_arg(path: &Path) -> Result<Option<PathBuf>, BuildError> {
    if !path.is_file() {
        debug!("no env file at {}", path.display());
        return Ok(None);
    }

    let what = || format!("env file {}", path.display());
    let iter = dotenvy::from_path_iter(path).map_err(|e| BuildError::parse(what(), e))?;
    let mut count = 0usize;
    for item in iter {
        item.map_err(|e| BuildError::parse(what(), e))?;
        count += 1;
    }

    let abs = path.canonicalize().map_err(|e| BuildError::io(path, e))?;
    info!("passing {count} variable(s) from {} to the build container", abs.display());
    Ok(Some(abs))
}
