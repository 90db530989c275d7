//! Validated run configuration.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::warn;

use crate::errors::BuildError;
use crate::menu::MenuFiles;

pub const DEFAULT_IMAGE_NAME: &str = "doc-site";
pub const DEFAULT_DOCKERFILE_NAME: &str = "docs.Dockerfile";
pub const DEFAULT_SITE_DIR: &str = "site";
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub owner: String,
    pub repository_name: String,
    /// URL or local path of the fallback Dockerfile.
    pub dockerfile_url: String,
    pub experimental_branch: Option<String>,
    pub excluded_branches: BTreeSet<String>,
    pub image_name: String,
    /// Per-version Dockerfile searched in each documentation root.
    pub dockerfile_name: String,
    /// Docker build context relative to each documentation root; empty means the root itself.
    pub docker_build_path: String,
    pub debug: bool,
    pub no_cache: bool,
    pub force_edit_url: bool,
    /// URL or local path of the global `requirements.txt` override.
    pub requirements_url: Option<String>,
    pub menu: MenuFiles,
    pub site_dir: PathBuf,
    pub env_file: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repository_name: String::new(),
            dockerfile_url: String::new(),
            experimental_branch: None,
            excluded_branches: BTreeSet::new(),
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            dockerfile_name: DEFAULT_DOCKERFILE_NAME.to_string(),
            docker_build_path: String::new(),
            debug: false,
            no_cache: false,
            force_edit_url: false,
            requirements_url: None,
            menu: MenuFiles::default(),
            site_dir: PathBuf::from(DEFAULT_SITE_DIR),
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
        }
    }
}

impl Configuration {
    /// Check required inputs and apply fallbacks. Runs before any work starts.
    pub fn validate(mut self) -> Result<Self, BuildError> {
        if self.image_name.trim().is_empty() {
            warn!("'image-name' is undefined, fallback to {DEFAULT_IMAGE_NAME}");
            self.image_name = DEFAULT_IMAGE_NAME.to_string();
        }
        if self.owner.trim().is_empty() {
            return Err(BuildError::Config("'owner' is required".to_string()));
        }
        if self.repository_name.trim().is_empty() {
            return Err(BuildError::Config("'repo-name' is required".to_string()));
        }
        if self.dockerfile_url.trim().is_empty() {
            return Err(BuildError::Config("'dockerfile-url' is required".to_string()));
        }
        self.experimental_branch = self
            .experimental_branch
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        self.requirements_url = self
            .requirements_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Configuration {
        Configuration {
            owner: "traefik".into(),
            repository_name: "traefik".into(),
            dockerfile_url: "https://example.org/docs.Dockerfile".into(),
            ..Configuration::default()
        }
    }

    #[test]
    fn test_valid_configuration() {
        let cfg = valid().validate().expect("valid");
        assert_eq!(cfg.image_name, "doc-site");
        assert_eq!(cfg.dockerfile_name, "docs.Dockerfile");
    }

    #[test]
    fn test_missing_required_fields() {
        for (field, cfg) in [
            ("owner", Configuration { owner: "".into(), ..valid() }),
            ("repo-name", Configuration { repository_name: " ".into(), ..valid() }),
            ("dockerfile-url", Configuration { dockerfile_url: "".into(), ..valid() }),
        ] {
            let err = cfg.validate().expect_err(field);
            assert!(matches!(err, BuildError::Config(_)));
            assert!(err.to_string().contains(field), "{err}");
        }
    }

    #[test]
    fn test_empty_image_name_falls_back() {
        let cfg = Configuration {
            image_name: "".into(),
            ..valid()
        }
        .validate()
        .expect("valid");
        assert_eq!(cfg.image_name, DEFAULT_IMAGE_NAME);
    }

    #[test]
    fn test_blank_optionals_are_dropped() {
        let cfg = Configuration {
            experimental_branch: Some("  ".into()),
            requirements_url: Some("".into()),
            ..valid()
        }
        .validate()
        .expect("valid");
        assert_eq!(cfg.experimental_branch, None);
        assert_eq!(cfg.requirements_url, None);
    }
}
