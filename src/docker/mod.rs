#![allow(clippy::module_name_repetitions)]
//! Docker plumbing: runtime detection, Dockerfile selection, image build and site-generator run.

pub mod dockerfile;
pub mod env;
pub mod images;
pub mod run;
pub mod runtime;

pub use dockerfile::DockerfileInfo;
pub use env::env_file_arg;
pub use images::{build_image, image_full_name};
pub use run::run_site_build;
pub use runtime::container_runtime_path;
