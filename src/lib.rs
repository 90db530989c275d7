#![allow(clippy::module_name_repetitions)]
//! multidoc: build one static documentation site out of the version branches of a repository.
//!
//! Each version branch is checked out into its own git worktree, its MkDocs manifest is patched
//! (version menu, edit URL, site URL), an image is built from the version's Dockerfile and
//! MkDocs runs inside it. The generated sites are merged under `site/<version>/`, the latest
//! release also being published at the site root.

pub mod branches;
pub mod config;
pub mod docker;
pub mod errors;
pub mod git;
pub mod github;
pub mod manifest;
pub mod menu;
pub mod pipeline;
pub mod requirements;
pub mod site;
pub mod telemetry;
pub mod types;
pub mod util;
pub mod version;

pub use config::Configuration;
pub use errors::{exit_code_for_error, BuildError};
pub use pipeline::{Assets, Pipeline};
pub use types::VersionsInfo;
