use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::debug;

use super::{Command, CommandError, Services};
use crate::core::tokenizer::join_tokens;
use crate::runtime::Metrics;

/// Runs `line` through the dispatcher from a scheduler worker.
fn deferred_dispatch(services: &Services, line: String) -> impl FnOnce() + Send + 'static {
    let dispatcher = services.dispatcher.clone();
    move || match dispatcher.upgrade() {
        Some(dispatcher) => {
            dispatcher.run_detached(&line);
        }
        None => debug!("dropping {:?}: dispatcher is gone", line),
    }
}

/// `schedule <delay> <command...>`
pub struct ScheduleCommand {
    services: Services,
}

impl ScheduleCommand {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Command for ScheduleCommand {
    fn help(&self) -> &str {
        "Run a command after a delay in seconds"
    }

    fn usage(&self) -> &str {
        "schedule <delay> <command...>"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.len() >= 2 && args[0].parse::<u64>().is_ok()
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let delay = args[0]
            .parse::<u64>()
            .map_err(|_| CommandError::InvalidArguments(self.usage().to_string()))?;
        let line = join_tokens(&args[1..]);

        self.services.scheduler.schedule(
            Duration::from_secs(delay),
            deferred_dispatch(&self.services, line.clone()),
        )?;
        writeln!(out, "scheduled '{}' in {} s", line, delay)?;
        Ok(())
    }
}

/// `task start <command...>` and the `task list` placeholder.
pub struct TaskCommand {
    services: Services,
}

impl TaskCommand {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Command for TaskCommand {
    fn help(&self) -> &str {
        "Start a background task"
    }

    fn usage(&self) -> &str {
        "task <start <command...> | list>"
    }

    fn validate(&self, args: &[String]) -> bool {
        match args.first().map(String::as_str) {
            Some("start") => args.len() >= 2,
            Some("list") => args.len() == 1,
            _ => false,
        }
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        match args[0].as_str() {
            "start" => {
                let line = join_tokens(&args[1..]);
                self.services
                    .scheduler
                    .submit(deferred_dispatch(&self.services, line.clone()))?;
                writeln!(out, "task started: {}", line)?;
            }
            "list" => writeln!(out, "task list is not implemented: queued tasks are not tracked")?,
            _ => return Err(CommandError::InvalidArguments(self.usage().to_string())),
        }
        Ok(())
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        ["start", "list"]
            .iter()
            .filter(|s| s.starts_with(prefix))
            .map(|s| s.to_string())
            .collect()
    }
}

/// `async <command...>`: metered dispatch on the thread pool.
pub struct AsyncCommand {
    services: Services,
}

impl AsyncCommand {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

impl Command for AsyncCommand {
    fn help(&self) -> &str {
        "Run a command on the worker pool and record its time"
    }

    fn usage(&self) -> &str {
        "async <command...>"
    }

    fn validate(&self, args: &[String]) -> bool {
        !args.is_empty()
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        self.execute_line(args, &join_tokens(args), out)
    }

    /// Metrics are keyed on `raw`, so `echo  a` and `echo a` count separately.
    fn execute_line(
        &self,
        _args: &[String],
        raw: &str,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let line = raw.to_string();
        let dispatcher = self.services.dispatcher.clone();
        let job_line = line.clone();

        self.services.pool.enqueue(move || match dispatcher.upgrade() {
            Some(dispatcher) => {
                dispatcher.run_metered(&job_line);
            }
            None => debug!("dropping {:?}: dispatcher is gone", job_line),
        })?;
        writeln!(out, "queued: {}", line)?;
        Ok(())
    }
}

/// `stats`: cumulative pool time per command text.
pub struct StatsCommand {
    metrics: Arc<Mutex<Metrics>>,
}

impl StatsCommand {
    pub fn new(metrics: Arc<Mutex<Metrics>>) -> Self {
        Self { metrics }
    }
}

impl Command for StatsCommand {
    fn help(&self) -> &str {
        "Show timings of commands run with async"
    }

    fn usage(&self) -> &str {
        "stats"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.is_empty()
    }

    fn execute(&self, _args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let snapshot = self
            .metrics
            .lock()
            .map_err(|_| CommandError::Execution("Failed to lock metrics".to_string()))?
            .clone();

        if snapshot.is_empty() {
            writeln!(out, "no timings recorded yet")?;
            return Ok(());
        }
        writeln!(out, "Performance metrics:")?;
        for (command, total) in snapshot.iter() {
            writeln!(out, "  {}: {:.3} ms", command, total.as_secs_f64() * 1000.0)?;
        }
        Ok(())
    }
}
