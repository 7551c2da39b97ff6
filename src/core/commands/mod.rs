use std::io::{self, Write};
use std::sync::{Arc, Weak};

mod alias;
mod builtin;
mod cd;
mod concrete;
mod edit;
mod file;
mod help;
mod history;
mod registry;
mod source;
mod system;
mod task;
mod theme;
mod transform;

pub use alias::{AliasCommand, SetAliasCommand};
pub use builtin::evaluate;
pub use cd::CdCommand;
pub use concrete::ConcreteCommand;
pub use edit::{EditCommand, TextBuffer};
pub use file::search_files;
pub use help::HelpCommand;
pub use history::HistoryCommand;
pub use registry::CommandRegistry;
pub use source::SourceCommand;
pub use task::{AsyncCommand, ScheduleCommand, StatsCommand, TaskCommand};
pub use theme::ThemeCommand;

use crate::core::dispatch::Dispatcher;
use crate::core::state::ShellState;
use crate::process::ProcessError;
use crate::runtime::{TaskScheduler, ThreadPool};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid arguments, usage: {0}")]
    InvalidArguments(String),
    #[error("I/O failure on {path}: {source}")]
    IoFailure {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("malformed alias: {0}")]
    MalformedAlias(String),
    #[error("background queue has shut down")]
    QueueShutdown,
    #[error("execution error: {0}")]
    Execution(String),
    #[error("output error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl CommandError {
    pub(crate) fn io_failure(path: impl Into<String>) -> impl FnOnce(io::Error) -> CommandError {
        let path = path.into();
        move |source| CommandError::IoFailure { path, source }
    }
}

impl From<crate::runtime::QueueClosed> for CommandError {
    fn from(_: crate::runtime::QueueClosed) -> Self {
        CommandError::QueueShutdown
    }
}

/// Capability set shared by every registered command.
///
/// Commands write their output to `out` instead of stdout so the same
/// command can run on the input loop, the scheduler or a pool worker.
pub trait Command: Send + Sync {
    /// One-line description shown by `help`.
    fn help(&self) -> &str;

    fn usage(&self) -> &str;

    /// Checked before `execute`; a `false` result reports the usage string.
    fn validate(&self, _args: &[String]) -> bool {
        true
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError>;

    /// Entry point used by the dispatcher. `raw` is the text after the
    /// command name as typed; override when quoting or spacing matters.
    fn execute_line(
        &self,
        args: &[String],
        _raw: &str,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        self.execute(args, out)
    }

    /// Tab-completion candidates for an argument starting with `prefix`.
    fn completions(&self, _prefix: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Handles the built-in commands need beyond their arguments.
#[derive(Clone)]
pub struct Services {
    pub dispatcher: Weak<Dispatcher>,
    pub state: ShellState,
    pub scheduler: Arc<TaskScheduler>,
    pub pool: Arc<ThreadPool>,
}

pub fn register_builtins(registry: &CommandRegistry, services: &Services) {
    registry.register("help", HelpCommand::new(services.dispatcher.clone()));
    registry.register("edit", EditCommand::new());
    registry.register("alias", AliasCommand::new(services.state.clone()));
    registry.register("setalias", SetAliasCommand::new(services.state.clone()));
    registry.register("history", HistoryCommand::new(services.state.history.clone()));
    registry.register("theme", ThemeCommand::new(services.state.clone()));
    registry.register("cd", CdCommand::new());
    registry.register("source", SourceCommand::new(services.dispatcher.clone()));
    registry.register("schedule", ScheduleCommand::new(services.clone()));
    registry.register("task", TaskCommand::new(services.clone()));
    registry.register("async", AsyncCommand::new(services.clone()));
    registry.register("stats", StatsCommand::new(services.state.metrics.clone()));

    builtin::register(registry);
    file::register(registry);
    transform::register(registry);
    system::register(registry);
}
