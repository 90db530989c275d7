//! Recording [`CommandRunner`] for unit tests.

use std::cell::RefCell;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;
use std::time::Duration;

use anyhow::Result;

use super::{CommandRunner, ExecOutput, ExecRequest};

#[derive(Default)]
pub(crate) struct RecordingRunner {
    pub calls: RefCell<Vec<ExecRequest>>,
    pub exit_code: i32,
    pub stdout: String,
}

impl RecordingRunner {
    pub fn failing(exit_code: i32) -> Self {
        Self {
            exit_code,
            ..Self::default()
        }
    }

    /// `program_name` plus arguments of every recorded call.
    pub fn command_lines(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .map(|r| {
                let mut words = vec![r.program_name()];
                words.extend(r.args_lossy());
                words
            })
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, request: ExecRequest) -> Result<ExecOutput> {
        let out = ExecOutput {
            program: request.program_name(),
            preview: request.preview(),
            status: ExitStatus::from_raw(self.exit_code << 8),
            duration: Duration::ZERO,
            stdout: self.stdout.clone(),
            stderr: if self.exit_code == 0 {
                String::new()
            } else {
                "boom".to_string()
            },
        };
        self.calls.borrow_mut().push(request);
        Ok(out)
    }
}
