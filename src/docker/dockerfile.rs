//! Selection of the Dockerfile used to build a version's site-generator image.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::errors::BuildError;
use crate::util::download::read_local_or_remote;
use crate::util::fs::{read_file, write_file};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileInfo {
    pub name: String,
    /// Location on disk; empty until the descriptor is placed in a documentation root.
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub image_name: String,
    /// Build context relative to the documentation root.
    pub build_path: String,
}

impl DockerfileInfo {
    /// Fetch the shared fallback Dockerfile once per run.
    ///
    /// The name is unique per run so it cannot collide with a file tracked by the repository.
    pub fn fallback(
        location: &str,
        image_name: &str,
        build_path: &str,
    ) -> Result<DockerfileInfo, BuildError> {
        let content = read_local_or_remote(location)?;
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Ok(DockerfileInfo {
            name: format!("{nanos}.Dockerfile"),
            path: PathBuf::new(),
            content,
            image_name: image_name.to_string(),
            build_path: build_path.to_string(),
        })
    }
}

/// Pick the Dockerfile for `working_dir`.
///
/// `<working_dir>/<name>` then `<working_dir>/docs/<name>` are searched; the first regular file
/// wins and keeps the fallback's image name and build path. Otherwise the fallback is written into `working_dir`.
pub fn resolve(
    working_dir: &Path,
    fallback: &DockerfileInfo,
    name: &str,
) -> Result<DockerfileInfo, BuildError> {
    if working_dir.as_os_str().is_empty() {
        return Err(BuildError::InvalidArgument(
            "working directory is undefined".to_string(),
        ));
    }
    if !working_dir.is_dir() {
        return Err(BuildError::InvalidArgument(format!(
            "working directory {} does not exist",
            working_dir.display()
        )));
    }

    if !name.is_empty() {
        for candidate in [working_dir.join(name), working_dir.join("docs").join(name)] {
            if candidate.is_file() {
                info!("using Dockerfile found at {}", candidate.display());
                return Ok(DockerfileInfo {
                    name: name.to_string(),
                    content: read_file(&candidate)?,
                    path: candidate,
                    image_name: fallback.image_name.clone(),
                    build_path: fallback.build_path.clone(),
                });
            }
        }
    }

    let path = working_dir.join(&fallback.name);
    write_file(&path, &fallback.content)?;
    debug!("no {name} found, using fallback Dockerfile {}", path.display());
    Ok(DockerfileInfo {
        path,
        ..fallback.clone()
    })
}
