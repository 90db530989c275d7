use std::path::PathBuf;

/// Context of one iteration of the build loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionsInfo {
    /// Version being built (branch short name).
    pub current: String,
    /// Latest release tag of the repository.
    pub latest: String,
    /// Experimental branch name, empty when not configured.
    pub experimental: String,
    /// Documentation root of the current version (directory holding `mkdocs.yml`).
    pub current_path: PathBuf,
}
