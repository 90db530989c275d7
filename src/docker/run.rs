#![allow(clippy::module_name_repetitions)]
//! Running the site generator inside the freshly built image.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::util::{CommandRunner, ExecRequest};

/// Mount point of the documentation root inside the container.
pub const CONTAINER_WORKDIR: &str = "/mkdocs";

/// `docker run --rm -v <docs_root>:/mkdocs [--env-file <file>] <image> mkdocs build`.
///
/// The generator writes its output to `<docs_root>/site`.
pub fn run_site_build(
    runner: &dyn CommandRunner,
    runtime: &Path,
    image: &str,
    docs_root: &Path,
    env_file: Option<&Path>,
) -> Result<()> {
    info!("building documentation with {image}");

    let mut req = ExecRequest::new(runtime)
        .arg("run")
        .arg("--rm")
        .arg("-v")
        .arg(format!("{}:{CONTAINER_WORKDIR}", docs_root.display()));
    if let Some(f) = env_file {
        req = req.arg("--env-file").arg(f);
    }
    req = req.arg(image).args(["mkdocs", "build"]);

    runner
        .run(req)?
        .into_checked()
        .with_context(|| format!("failed to run mkdocs build in {image}"))?;
    Ok(())
}
