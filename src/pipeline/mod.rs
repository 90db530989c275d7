//! The multi-version build: one checkout, one image build and one generator run per version.
//!
//! Versions are processed strictly in order. The first failure aborts the run; the workspace
//! guard still cleans up the temporary checkouts.

pub mod context;
pub mod workspace;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::branches::resolve_branches;
use crate::config::Configuration;
use crate::docker::{self, DockerfileInfo};
use crate::git::{short_name, Git};
use crate::github;
use crate::menu::{self, EditUri, MenuContent};
use crate::requirements;
use crate::site;
use crate::types::VersionsInfo;
use crate::util::download::read_local_or_remote;
use crate::util::CommandRunner;

pub use context::{docs_dir_suffix, documentation_root};
pub use workspace::Workspace;

/// Run-wide inputs, fetched once before the first version is built.
#[derive(Debug, Clone)]
pub struct Assets {
    pub fallback_dockerfile: DockerfileInfo,
    pub menu: MenuContent,
    /// Global `requirements.txt` override; empty when not configured.
    pub requirements: Vec<u8>,
    /// Absolute env file forwarded to the generator container.
    pub env_file: Option<PathBuf>,
}

impl Assets {
    pub fn prepare(config: &Configuration) -> Result<Assets> {
        let fallback_dockerfile =
            DockerfileInfo::fallback(
                &config.dockerfile_url,
                &config.image_name,
                &config.docker_build_path,
            )
            .context("failed to get Dockerfile")?;

        let menu = menu::get_template_content(&config.menu)
            .context("failed to get menu template")?;

        let requirements = match config.requirements_url.as_deref() {
            Some(location) => read_local_or_remote(location)
                .context("failed to get requirements override")?,
            None => Vec::new(),
        };

        let env_file = docker::env_file_arg(&config.env_file)?;

        Ok(Assets {
            fallback_dockerfile,
            menu,
            requirements,
            env_file,
        })
    }
}

pub struct Pipeline<'a> {
    config: &'a Configuration,
    runner: &'a dyn CommandRunner,
    runtime: PathBuf,
    repo: Option<PathBuf>,
    latest_tag: Option<String>,
}

impl<'a> Pipeline<'a> {
    /// `runtime` is the docker binary; git runs in the current directory unless [`Pipeline::in_repo`].
    pub fn new(config: &'a Configuration, runner: &'a dyn CommandRunner, runtime: PathBuf) -> Self {
        Self {
            config,
            runner,
            runtime,
            repo: None,
            latest_tag: None,
        }
    }

    pub fn in_repo(mut self, repo: &Path) -> Self {
        self.repo = Some(repo.to_path_buf());
        self
    }

    /// Use `tag` as latest release instead of asking the release host.
    pub fn with_latest_tag(mut self, tag: impl Into<String>) -> Self {
        self.latest_tag = Some(tag.into());
        self
    }

    pub fn run(&self) -> Result<()> {
        let assets = Assets::prepare(self.config)?;
        self.run_with(&assets)
    }

    pub fn run_with(&self, assets: &Assets) -> Result<()> {
        let cfg = self.config;

        let latest = match self.latest_tag {
            Some(ref tag) => tag.clone(),
            None => github::latest_release_tag(&cfg.owner, &cfg.repository_name)?,
        };
        info!("latest tag: {latest}");

        let git = match self.repo {
            Some(ref repo) => Git::in_repo(self.runner, repo),
            None => Git::new(self.runner),
        };
        let branches = resolve_branches(
            &git,
            cfg.experimental_branch.as_deref(),
            &cfg.excluded_branches,
        )?;

        site::prepare_site_dir(&cfg.site_dir)?;
        let workspace = Workspace::create(&git)?;

        for branch_ref in &branches {
            let label = short_name(branch_ref);
            self.build_version(&workspace, &branches, branch_ref, &latest, assets)
                .with_context(|| {
                    format!(
                        "failed to build documentation for version {label} in {}",
                        workspace.version_dir(label).display()
                    )
                })?;
        }

        info!(
            "documentation for {} version(s) written to {}",
            branches.len(),
            cfg.site_dir.display()
        );
        Ok(())
    }

    fn build_version(
        &self,
        workspace: &Workspace<'_>,
        branches: &[String],
        branch_ref: &str,
        latest: &str,
        assets: &Assets,
    ) -> Result<()> {
        let cfg = self.config;
        let label = short_name(branch_ref);
        info!("generating doc for version {label}");

        let checkout = workspace.checkout(label, branch_ref)?;
        let docs_root = documentation_root(&checkout)?;

        let versions_info = VersionsInfo {
            current: label.to_string(),
            latest: latest.to_string(),
            experimental: cfg.experimental_branch.clone().unwrap_or_default(),
            current_path: docs_root.clone(),
        };

        let dockerfile = docker::dockerfile::resolve(
            &docs_root,
            &assets.fallback_dockerfile,
            &cfg.dockerfile_name,
        )?;

        requirements::build(&docs_root, &assets.requirements)?;

        let edit_uri = EditUri {
            version: label.to_string(),
            docs_dir_base: docs_dir_suffix(&checkout, &docs_root),
            override_existing: cfg.force_edit_url,
        };
        menu::build(&versions_info, branches, &assets.menu, Some(&edit_uri))?;

        let image = docker::build_image(
            self.runner,
            &self.runtime,
            &dockerfile,
            label,
            &docs_root,
            cfg.no_cache,
        )?;
        docker::run_site_build(
            self.runner,
            &self.runtime,
            &image,
            &docs_root,
            assets.env_file.as_deref(),
        )?;

        site::compose(
            &docs_root.join(site::GENERATED_DIR),
            &cfg.site_dir,
            label,
            latest,
        )?;
        Ok(())
    }
}
