#![allow(clippy::module_name_repetitions)]
//! Docker runtime discovery.

use std::env;
use std::io;
use std::path::PathBuf;

use which::which;

/// Explicit docker binary, mostly useful for wrappers such as podman-docker.
pub const ENV_DOCKER_BIN: &str = "MULTIDOC_DOCKER";

pub fn container_runtime_path() -> io::Result<PathBuf> {
    if let Some(bin) = env::var_os(ENV_DOCKER_BIN).filter(|v| !v.is_empty()) {
        return which(&bin).map_err(|_| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{ENV_DOCKER_BIN}={} was not found.", bin.to_string_lossy()),
            )
        });
    }

    if let Ok(p) = which("docker") {
        return Ok(p);
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        "Docker is required but was not found in PATH.",
    ))
}
