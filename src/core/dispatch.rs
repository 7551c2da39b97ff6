use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, warn};

use super::commands::{register_builtins, Command, CommandError, CommandRegistry, Services};
use super::state::ShellState;
use super::tokenizer::{rest_after_head, tokenize};
use crate::runtime::{TaskScheduler, ThreadPool};

/// Console sink for output produced off the input-loop thread.
pub type SharedOutput = Arc<Mutex<dyn Write + Send>>;

/// A command line resolved to its command, after alias substitution.
pub struct Resolved {
    pub name: String,
    pub command: Arc<dyn Command>,
    pub args: Vec<String>,
    /// Untokenized text after the head.
    pub raw_args: String,
}

/// Outcome of one dispatch, timed around the whole call.
#[derive(Debug)]
pub struct DispatchReport {
    pub elapsed: Duration,
    pub error: Option<CommandError>,
}

impl DispatchReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Resolves command lines against the registry and runs them.
///
/// Every thread that executes commands (input loop, scheduler, pool) goes
/// through the same `run` envelope, so errors are reported identically and
/// never escape to the caller's loop.
pub struct Dispatcher {
    registry: CommandRegistry,
    state: ShellState,
    output: SharedOutput,
}

impl Dispatcher {
    /// Builds the dispatcher with every built-in command registered.
    pub fn new(
        state: ShellState,
        scheduler: Arc<TaskScheduler>,
        pool: Arc<ThreadPool>,
        output: SharedOutput,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| {
            let registry = CommandRegistry::new();
            let services = Services {
                dispatcher: weak.clone(),
                state: state.clone(),
                scheduler,
                pool,
            };
            register_builtins(&registry, &services);

            Dispatcher {
                registry,
                state,
                output,
            }
        })
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// `Ok(None)` for a line with no tokens.
    pub fn resolve(&self, line: &str) -> Result<Option<Resolved>, CommandError> {
        let mut tokens = tokenize(line);
        if tokens.is_empty() {
            return Ok(None);
        }
        let head = tokens.remove(0);

        let name = {
            let aliases = self
                .state
                .aliases
                .lock()
                .map_err(|_| CommandError::Execution("Failed to access aliases".to_string()))?;
            aliases.expand_head(&head).to_string()
        };
        if name != head {
            debug!("alias {:?} -> {:?}", head, name);
        }

        let command = self
            .registry
            .get(&name)
            .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;

        Ok(Some(Resolved {
            name,
            command,
            args: tokens,
            raw_args: rest_after_head(line).to_string(),
        }))
    }

    pub fn dispatch(&self, line: &str, out: &mut dyn Write) -> Result<(), CommandError> {
        let Some(resolved) = self.resolve(line)? else {
            return Ok(());
        };

        if !resolved.command.validate(&resolved.args) {
            return Err(CommandError::InvalidArguments(
                resolved.command.usage().to_string(),
            ));
        }

        debug!("dispatching {:?} with {} arg(s)", resolved.name, resolved.args.len());
        resolved
            .command
            .execute_line(&resolved.args, &resolved.raw_args, out)
    }

    /// Dispatches `line`, reporting any error to `out`. A panicking command
    /// is reported as an `Execution` error.
    pub fn run(&self, line: &str, out: &mut dyn Write) -> DispatchReport {
        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(line, out)))
            .unwrap_or_else(|payload| {
                Err(CommandError::Execution(format!(
                    "command panicked: {}",
                    panic_message(payload.as_ref())
                )))
            });
        let elapsed = start.elapsed();

        let error = match result {
            Ok(()) => None,
            Err(e) => {
                debug!("{:?} failed: {}", line, e);
                if writeln!(out, "error: {}", e).is_err() {
                    warn!("failed to report error for {:?}: {}", line, e);
                }
                Some(e)
            }
        };

        DispatchReport { elapsed, error }
    }

    /// Runs `line` into a private buffer, then writes the buffer to the
    /// shared console output in one piece.
    pub fn run_detached(&self, line: &str) -> DispatchReport {
        let mut buffer = Vec::new();
        let report = self.run(line, &mut buffer);

        if !buffer.is_empty() {
            match self.output.lock() {
                Ok(mut output) => {
                    if let Err(e) = output.write_all(&buffer).and_then(|_| output.flush()) {
                        warn!("failed to write background output: {}", e);
                    }
                }
                Err(_) => warn!("console output lock poisoned"),
            }
        }
        report
    }

    /// Detached run whose elapsed time is added to the metrics under the
    /// literal `line` text.
    pub fn run_metered(&self, line: &str) -> DispatchReport {
        let report = self.run_detached(line);
        match self.state.metrics.lock() {
            Ok(mut metrics) => metrics.record(line, report.elapsed),
            Err(_) => warn!("metrics lock poisoned, {:?} not recorded", line),
        }
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
