//! Assembly of the multi-version output tree.

use std::path::Path;

use tracing::info;

use crate::errors::BuildError;
use crate::util::fs::{copy_dir_recursive, recreate_dir};

/// Directory the generator writes into, relative to a documentation root.
pub const GENERATED_DIR: &str = "site";

/// Start every run from an empty output root.
pub fn prepare_site_dir(output_root: &Path) -> Result<(), BuildError> {
    recreate_dir(output_root)
}

/// Whether `label` is served from the site root for the given latest release tag.
pub fn is_root_alias(label: &str, latest: &str) -> bool {
    !label.is_empty() && latest.starts_with(label)
}

/// Copy one version's generated output into `<output_root>/<label>`, and into `<output_root>`
/// itself when the version is the latest one.
pub fn compose(
    version_output: &Path,
    output_root: &Path,
    label: &str,
    latest: &str,
) -> Result<(), BuildError> {
    if is_root_alias(label, latest) {
        info!("{label} matches latest release {latest}, publishing at site root");
        copy_dir_recursive(version_output, output_root)?;
    }
    copy_dir_recursive(version_output, &output_root.join(label))
}
