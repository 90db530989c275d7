//! Error mapping guide:
//! - Configuration and argument errors exit with 2; they are detected before any work starts.
//! - A missing external tool (io::ErrorKind::NotFound while spawning) exits with 127.
//! - Everything else exits with 1.
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error taxonomy for the build pipeline.
#[derive(Debug)]
pub enum BuildError {
    /// Missing or inconsistent configuration, detected before the pipeline starts.
    Config(String),
    /// A component was called with an unusable argument (empty or missing directory).
    InvalidArgument(String),
    /// An external process exited non-zero.
    Process {
        program: String,
        preview: String,
        code: Option<i32>,
        output: String,
    },
    /// Filesystem error tied to a path.
    Io { path: PathBuf, source: io::Error },
    /// Malformed content: version strings, pin files, manifests.
    Parse { what: String, detail: String },
    /// The remote endpoint could not be reached or answered with an error status.
    Network {
        url: String,
        status: Option<u16>,
        body: String,
    },
    /// Menu template could not be compiled or rendered.
    Template(String),
}

impl BuildError {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(what: impl Into<String>, detail: impl fmt::Display) -> Self {
        BuildError::Parse {
            what: what.into(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Config(msg) => write!(f, "configuration error: {msg}"),
            BuildError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            BuildError::Process {
                program,
                preview,
                code,
                output,
            } => {
                match code {
                    Some(c) => write!(f, "{program} failed with exit code {c}: {preview}")?,
                    None => write!(f, "{program} terminated by signal: {preview}")?,
                }
                let trimmed = output.trim();
                if !trimmed.is_empty() {
                    write!(f, "\n{trimmed}")?;
                }
                Ok(())
            }
            BuildError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            BuildError::Parse { what, detail } => write!(f, "failed to parse {what}: {detail}"),
            BuildError::Network { url, status, body } => {
                match status {
                    Some(s) => write!(f, "request to {url:?} failed with status {s}")?,
                    None => write!(f, "request to {url:?} failed")?,
                }
                let trimmed = body.trim();
                if !trimmed.is_empty() {
                    write!(f, ": {trimmed}")?;
                }
                Ok(())
            }
            BuildError::Template(msg) => write!(f, "menu template error: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Map an io::Error to a process exit code:
/// - 127 for NotFound (command not found)
/// - 1 for all other errors
pub fn exit_code_for_io_error(e: &io::Error) -> u8 {
    if e.kind() == io::ErrorKind::NotFound {
        127
    } else {
        1
    }
}

/// Convert BuildError to exit code.
pub fn exit_code_for_build_error(e: &BuildError) -> u8 {
    match e {
        BuildError::Config(_) | BuildError::InvalidArgument(_) => 2,
        _ => 1,
    }
}

/// Walk an anyhow chain from the outside in and use the first known error.
///
/// A `BuildError::Io` wrapping a missing file maps to 1, not 127: only a bare io error
/// (a program that could not be spawned) is reported as command-not-found.
pub fn exit_code_for_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if let Some(be) = cause.downcast_ref::<BuildError>() {
            return exit_code_for_build_error(be);
        }
        if let Some(ioe) = cause.downcast_ref::<io::Error>() {
            return exit_code_for_io_error(ioe);
        }
    }
    1
}
