#![allow(clippy::module_name_repetitions)]
//! Docker image naming and builds.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::dockerfile::DockerfileInfo;
use crate::util::{sanitize_image_component, CommandRunner, ExecRequest};

/// `<image>:<tag>` with `:` and `/` replaced by `-` in both parts.
pub fn image_full_name(image_name: &str, tag: &str) -> String {
    format!(
        "{}:{}",
        sanitize_image_component(image_name),
        sanitize_image_component(tag)
    )
}

/// Build context: `docs_root`, or the Dockerfile's build path inside it, with a trailing slash.
pub fn build_context(docs_root: &Path, build_path: &str) -> String {
    let rel = build_path.trim_matches('/');
    let ctx = if rel.is_empty() || rel == "." {
        docs_root.to_path_buf()
    } else {
        docs_root.join(rel)
    };
    format!("{}/", ctx.display())
}

/// Build the site-generator image for one version, using `docs_root` as build context.
///
/// Returns the full image reference that was built.
pub fn build_image(
    runner: &dyn CommandRunner,
    runtime: &Path,
    dockerfile: &DockerfileInfo,
    tag: &str,
    docs_root: &Path,
    no_cache: bool,
) -> Result<String> {
    let image = image_full_name(&dockerfile.image_name, tag);
    info!("building image {image}");

    let req = ExecRequest::new(runtime)
        .arg("build")
        .arg(format!("--no-cache={no_cache}"))
        .arg("-t")
        .arg(&image)
        .arg("-f")
        .arg(&dockerfile.path)
        .arg(build_context(docs_root, &dockerfile.build_path));
    runner
        .run(req)?
        .into_checked()
        .with_context(|| format!("failed to build docker image {image}"))?;
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_full_name() {
        assert_eq!(image_full_name("doc-site", "v1.4"), "doc-site:v1.4");
        assert_eq!(
            image_full_name("docsite:feature", "ant/en:na"),
            "docsite-feature:ant-en-na"
        );
        assert_eq!(image_full_name("registry/doc", "feature/x"), "registry-doc:feature-x");
    }

    #[test]
    fn test_build_context() {
        let root = Path::new("/work/v1.4");
        assert_eq!(build_context(root, ""), "/work/v1.4/");
        assert_eq!(build_context(root, "."), "/work/v1.4/");
        assert_eq!(build_context(root, "ctx"), "/work/v1.4/ctx/");
        assert_eq!(build_context(root, "/ctx/inner/"), "/work/v1.4/ctx/inner/");
    }

    #[cfg(unix)]
    mod runner {
        use super::super::*;
        use crate::util::fake::RecordingRunner;
        use std::path::PathBuf;

        fn dockerfile() -> DockerfileInfo {
            DockerfileInfo {
                name: "docs.Dockerfile".into(),
                path: PathBuf::from("/work/v1.4/docs.Dockerfile"),
                content: Vec::new(),
                image_name: "doc-site".into(),
                build_path: String::new(),
            }
        }

        #[test]
        fn test_build_image_command_line() {
            let runner = RecordingRunner::default();
            let image = build_image(
                &runner,
                Path::new("/usr/bin/docker"),
                &dockerfile(),
                "v1.4",
                Path::new("/work/v1.4"),
                true,
            )
            .expect("build");
            assert_eq!(image, "doc-site:v1.4");
            assert_eq!(
                runner.command_lines(),
                vec![vec![
                    "docker",
                    "build",
                    "--no-cache=true",
                    "-t",
                    "doc-site:v1.4",
                    "-f",
                    "/work/v1.4/docs.Dockerfile",
                    "/work/v1.4/",
                ]]
            );
        }

        #[test]
        fn test_build_image_uses_build_path_as_context() {
            let runner = RecordingRunner::default();
            let info = DockerfileInfo {
                build_path: "image".into(),
                ..dockerfile()
            };
            build_image(
                &runner,
                Path::new("docker"),
                &info,
                "v1.4",
                Path::new("/work/v1.4"),
                false,
            )
            .expect("build");
            let lines = runner.command_lines();
            assert_eq!(lines[0].last().map(String::as_str), Some("/work/v1.4/image/"));
        }

        #[test]
        fn test_build_failure_carries_output() {
            let runner = RecordingRunner::failing(1);
            let err = build_image(
                &runner,
                Path::new("docker"),
                &dockerfile(),
                "v1.4",
                Path::new("/work/v1.4"),
                false,
            )
            .expect_err("build fails");
            let chain = format!("{err:#}");
            assert!(chain.contains("failed to build docker image doc-site:v1.4"), "{chain}");
            assert!(chain.contains("boom"), "{chain}");
        }
    }
}
