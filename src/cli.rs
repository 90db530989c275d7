use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use multidoc::config::{Configuration, DEFAULT_DOCKERFILE_NAME, DEFAULT_ENV_FILE, DEFAULT_IMAGE_NAME, DEFAULT_SITE_DIR};
use multidoc::menu::MenuFiles;

#[derive(Parser, Debug)]
#[command(
    name = "multidoc",
    version,
    about = "Manage multiple documentation versions with MkDocs.",
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    /// Repository owner [required]
    #[arg(short = 'o', long)]
    pub(crate) owner: Option<String>,

    /// Repository name [required]
    #[arg(short = 'r', long = "repo-name")]
    pub(crate) repo_name: Option<String>,

    /// Fallback Dockerfile: URL or local path [required]
    #[arg(short = 'd', long = "dockerfile-url")]
    pub(crate) dockerfile_url: Option<String>,

    /// Experimental branch name, documented before the version branches
    #[arg(long = "exp-branch")]
    pub(crate) exp_branch: Option<String>,

    /// Branch to leave out (short name, repeatable)
    #[arg(long = "exclude", value_name = "BRANCH")]
    pub(crate) exclude: Vec<String>,

    /// Docker image name
    #[arg(long = "image-name", default_value = DEFAULT_IMAGE_NAME)]
    pub(crate) image_name: String,

    /// Dockerfile searched in each version's documentation root
    #[arg(long = "dockerfile-name", default_value = DEFAULT_DOCKERFILE_NAME)]
    pub(crate) dockerfile_name: String,

    /// Docker build context, relative to each version's documentation root
    #[arg(long = "docker-build-path", value_name = "PATH", default_value = "")]
    pub(crate) docker_build_path: String,

    /// Debug logging
    #[arg(long)]
    pub(crate) debug: bool,

    /// Build images with --no-cache
    #[arg(long = "no-cache")]
    pub(crate) no_cache: bool,

    /// Overwrite an existing edit_uri
    #[arg(long = "force-edit-url")]
    pub(crate) force_edit_url: bool,

    /// Global requirements.txt override: URL or local path
    #[arg(long = "rqts-url")]
    pub(crate) rqts_url: Option<String>,

    /// Menu script template URL
    #[arg(long = "menu.js-url")]
    pub(crate) menu_js_url: Option<String>,

    /// Menu script template file (wins over the URL)
    #[arg(long = "menu.js-file")]
    pub(crate) menu_js_file: Option<String>,

    /// Menu stylesheet template URL
    #[arg(long = "menu.css-url")]
    pub(crate) menu_css_url: Option<String>,

    /// Menu stylesheet template file (wins over the URL)
    #[arg(long = "menu.css-file")]
    pub(crate) menu_css_file: Option<String>,

    /// Output directory [default: ./site]
    #[arg(long = "site-dir")]
    pub(crate) site_dir: Option<PathBuf>,

    /// Env file passed to the MkDocs container when present [default: ./.env]
    #[arg(long = "env-file")]
    pub(crate) env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Command {
    /// Display build information
    Version,
}

impl Cli {
    /// Unvalidated configuration; relative paths are resolved against `cwd`.
    pub(crate) fn to_configuration(&self, cwd: &Path) -> Configuration {
        let resolve = |p: &Option<PathBuf>, default: &str| {
            let p = p.clone().unwrap_or_else(|| PathBuf::from(default));
            if p.is_absolute() {
                p
            } else {
                cwd.join(p)
            }
        };
        Configuration {
            owner: self.owner.clone().unwrap_or_default(),
            repository_name: self.repo_name.clone().unwrap_or_default(),
            dockerfile_url: self.dockerfile_url.clone().unwrap_or_default(),
            experimental_branch: self.exp_branch.clone(),
            excluded_branches: self.exclude.iter().cloned().collect::<BTreeSet<_>>(),
            image_name: self.image_name.clone(),
            dockerfile_name: self.dockerfile_name.clone(),
            docker_build_path: self.docker_build_path.clone(),
            debug: self.debug,
            no_cache: self.no_cache,
            force_edit_url: self.force_edit_url,
            requirements_url: self.rqts_url.clone(),
            menu: MenuFiles {
                js_url: self.menu_js_url.clone(),
                js_file: self.menu_js_file.clone(),
                css_url: self.menu_css_url.clone(),
                css_file: self.menu_css_file.clone(),
            },
            site_dir: resolve(&self.site_dir, DEFAULT_SITE_DIR),
            env_file: resolve(&self.env_file, DEFAULT_ENV_FILE),
        }
    }
}
