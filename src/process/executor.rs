use std::io::{self, Write};
use std::process::{Command, Output, Stdio};

use log::debug;

use super::ProcessError;
use crate::path::PathExpander;

/// Runs external utilities on behalf of commands.
#[derive(Clone, Default)]
pub struct ProcessRunner {
    path_expander: PathExpander,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self {
            path_expander: PathExpander::new(),
        }
    }

    fn expand_args(&self, args: &[&str]) -> Vec<String> {
        args.iter()
            .map(|&arg| {
                if arg.starts_with('~') {
                    self.path_expander
                        .expand(arg)
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_else(|_| arg.to_owned())
                } else {
                    arg.to_owned()
                }
            })
            .collect()
    }

    /// Runs `program` to completion and copies its stdout and stderr to `out`.
    pub fn capture(&self, program: &str, args: &[&str], out: &mut dyn Write) -> Result<(), ProcessError> {
        debug!("spawning {} {:?}", program, args);
        let output = Command::new(program)
            .args(self.expand_args(args))
            .stdin(Stdio::null())
            .output()
            .map_err(|e| not_found_or(program, e))?;

        out.write_all(&output.stdout)?;
        out.write_all(&output.stderr)?;
        check_status(program, &output)
    }

    /// Tries each candidate in turn, skipping the ones not installed.
    pub fn capture_first(
        &self,
        candidates: &[(&str, &[&str])],
        out: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        let mut last = ProcessError::NotFound(String::new());
        for (program, args) in candidates {
            match self.capture(program, args, out) {
                Err(ProcessError::NotFound(name)) => last = ProcessError::NotFound(name),
                result => return result,
            }
        }
        Err(last)
    }

    /// Runs `program` attached to the terminal.
    pub fn interactive(&self, program: &str, args: &[&str]) -> Result<(), ProcessError> {
        let status = Command::new(program)
            .args(self.expand_args(args))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| not_found_or(program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }

    /// Sends SIGTERM to `pid`.
    pub fn terminate(&self, pid: libc::pid_t) -> Result<(), ProcessError> {
        if pid <= 0 {
            return Err(ProcessError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to signal pid {}", pid),
            )));
        }
        // SAFETY: kill has no memory-safety preconditions.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        if rc == 0 {
            debug!("sent SIGTERM to {}", pid);
            Ok(())
        } else {
            Err(io::Error::last_os_error().into())
        }
    }
}

fn not_found_or(program: &str, e: io::Error) -> ProcessError {
    if e.kind() == io::ErrorKind::NotFound {
        ProcessError::NotFound(program.to_string())
    } else {
        ProcessError::Io(e)
    }
}

fn check_status(program: &str, output: &Output) -> Result<(), ProcessError> {
    if output.status.success() {
        Ok(())
    } else {
        Err(ProcessError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
        })
    }
}
