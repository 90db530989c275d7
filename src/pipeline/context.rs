//! Locating the documentation root inside a version checkout.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::BuildError;
use crate::manifest;
use crate::requirements;

/// Candidate documentation roots, relative to the checkout, in probe order.
pub const DOCS_ROOT_SEARCH_PATHS: [&str; 2] = ["/", "docs/"];

/// First candidate directory holding `mkdocs.yml`.
///
/// The pin file must sit next to the manifest; its absence is an error naming the expected path.
pub fn documentation_root(checkout: &Path) -> Result<PathBuf, BuildError> {
    if checkout.as_os_str().is_empty() {
        return Err(BuildError::InvalidArgument(
            "repository root is undefined".to_string(),
        ));
    }
    if !checkout.is_dir() {
        return Err(BuildError::io(
            checkout,
            std::io::Error::new(std::io::ErrorKind::NotFound, "checkout not found"),
        ));
    }

    for search in DOCS_ROOT_SEARCH_PATHS {
        let candidate = join_search_path(checkout, search);
        if candidate.join(manifest::FILE_NAME).exists() {
            info!(
                "found {} for building documentation in {}",
                manifest::FILE_NAME,
                candidate.display()
            );
            requirements::check(&candidate)?;
            return Ok(candidate);
        }
    }

    Err(BuildError::io(
        checkout,
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!(
                "no file {} found in {} (search path was: {})",
                manifest::FILE_NAME,
                checkout.display(),
                DOCS_ROOT_SEARCH_PATHS.join(", ")
            ),
        ),
    ))
}

fn join_search_path(checkout: &Path, search: &str) -> PathBuf {
    let rel = search.trim_matches('/');
    if rel.is_empty() {
        checkout.to_path_buf()
    } else {
        checkout.join(rel)
    }
}

/// Documentation root relative to the checkout, as used in edit URLs (`""` or `docs`).
pub fn docs_dir_suffix(checkout: &Path, docs_root: &Path) -> String {
    docs_root
        .strip_prefix(checkout)
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(p: &Path) {
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(p, "").expect("write");
    }

    #[test]
    fn test_root_layout() {
        let td = tempfile::tempdir().expect("tmpdir");
        touch(&td.path().join("mkdocs.yml"));
        touch(&td.path().join("requirements.txt"));

        let root = documentation_root(td.path()).expect("root");
        assert_eq!(root, td.path());
        assert_eq!(docs_dir_suffix(td.path(), &root), "");
    }

    #[test]
    fn test_docs_layout() {
        let td = tempfile::tempdir().expect("tmpdir");
        touch(&td.path().join("docs/mkdocs.yml"));
        touch(&td.path().join("docs/requirements.txt"));

        let root = documentation_root(td.path()).expect("root");
        assert_eq!(root, td.path().join("docs"));
        assert_eq!(docs_dir_suffix(td.path(), &root), "docs");
    }

    #[test]
    fn test_root_wins_over_docs() {
        let td = tempfile::tempdir().expect("tmpdir");
        for p in ["mkdocs.yml", "requirements.txt", "docs/mkdocs.yml", "docs/requirements.txt"] {
            touch(&td.path().join(p));
        }
        assert_eq!(documentation_root(td.path()).expect("root"), td.path());
    }

    #[test]
    fn test_split_layout_names_missing_pin_file() {
        let td = tempfile::tempdir().expect("tmpdir");
        touch(&td.path().join("mkdocs.yml"));
        touch(&td.path().join("docs/requirements.txt"));

        let err = documentation_root(td.path()).expect_err("split");
        let msg = err.to_string();
        assert!(
            msg.contains(&td.path().join("requirements.txt").display().to_string()),
            "{msg}"
        );
    }

    #[test]
    fn test_no_manifest_names_search_paths() {
        let td = tempfile::tempdir().expect("tmpdir");
        let err = documentation_root(td.path()).expect_err("missing");
        let msg = err.to_string();
        assert!(msg.contains("no file mkdocs.yml found in"), "{msg}");
        assert!(msg.contains("(search path was: /, docs/)"), "{msg}");
    }

    #[test]
    fn test_bad_checkout() {
        let err = documentation_root(Path::new("")).expect_err("empty");
        assert!(matches!(err, BuildError::InvalidArgument(_)));
        let td = tempfile::tempdir().expect("tmpdir");
        assert!(documentation_root(&td.path().join("gone")).is_err());
    }
}
