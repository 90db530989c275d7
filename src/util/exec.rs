use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use wait_timeout::ChildExt;

use crate::errors::BuildError;

/// Anything able to execute an [`ExecRequest`]. git and docker invocations go through this seam.
pub trait CommandRunner {
    fn run(&self, request: ExecRequest) -> Result<ExecOutput>;
}

/// Structured command execution with optional timeouts.
#[derive(Debug, Clone)]
pub struct ExecService {
    default_timeout: Duration,
}

impl ExecService {
    /// A zero timeout waits indefinitely (container builds routinely take minutes).
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl Default for ExecService {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl CommandRunner for ExecService {
    fn run(&self, request: ExecRequest) -> Result<ExecOutput> {
        debug!("{}: {}", request.program_name(), request.preview());

        let mut cmd = Command::new(&request.program);
        for arg in &request.args {
            cmd.arg(arg);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "failed to spawn {:?} with args {:?}",
                request.program, request.args
            )
        })?;

        // Drain both pipes concurrently; a chatty build would otherwise block on a full pipe.
        let stdout_reader = child.stdout.take().map(|mut s| thread::spawn(move || read_stream(&mut s)));
        let stderr_reader = child.stderr.take().map(|mut s| thread::spawn(move || read_stream(&mut s)));

        let timeout = self.default_timeout;
        let started = Instant::now();
        let status = if timeout.is_zero() {
            child.wait().context("failed to wait for process")?
        } else {
            match child
                .wait_timeout(timeout)
                .context("failed to wait with timeout")?
            {
                Some(status) => status,
                None => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(anyhow!(
                        "command {:?} timed out after {:?}",
                        request.program,
                        timeout
                    ));
                }
            }
        };
        let duration = started.elapsed();

        let stdout = join_reader(stdout_reader)?;
        let stderr = join_reader(stderr_reader)?;

        Ok(ExecOutput {
            program: request.program_name(),
            preview: request.preview(),
            status,
            duration,
            stdout,
            stderr,
        })
    }
}

fn read_stream(stream: &mut impl io::Read) -> io::Result<String> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<String>>>) -> Result<String> {
    match handle {
        Some(h) => h
            .join()
            .map_err(|_| anyhow!("output reader thread panicked"))?
            .context("failed to read process output"),
        None => Ok(String::new()),
    }
}

#[derive(Debug, Clone)]
pub struct ExecRequest {
    program: OsString,
    args: Vec<OsString>,
}

impl ExecRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// File name of the program (`docker` for `/usr/bin/docker`).
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }

    /// Shell-escaped rendering of the full command line.
    pub fn preview(&self) -> String {
        let mut words = vec![self.program_name()];
        words.extend(self.args_lossy());
        crate::util::shell_join(&words)
    }
}

#[derive(Debug)]
pub struct ExecOutput {
    pub program: String,
    pub preview: String,
    pub status: ExitStatus,
    pub duration: Duration,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    /// stdout followed by stderr, the way a terminal would have shown them.
    pub fn combined(&self) -> String {
        let mut s = self.stdout.clone();
        if !s.is_empty() && !s.ends_with('\n') && !self.stderr.is_empty() {
            s.push('\n');
        }
        s.push_str(&self.stderr);
        s
    }

    /// Turn a non-zero exit into [`BuildError::Process`].
    pub fn into_checked(self) -> std::result::Result<ExecOutput, BuildError> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(BuildError::Process {
                program: self.program.clone(),
                preview: self.preview.clone(),
                code: self.status.code(),
                output: self.combined(),
            })
        }
    }
}
