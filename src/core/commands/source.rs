use std::cell::Cell;
use std::fs;
use std::io::Write;
use std::sync::Weak;

use super::{Command, CommandError};
use crate::core::dispatch::Dispatcher;
use crate::path::PathExpander;

const MAX_DEPTH: usize = 16;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// One level of `source` nesting on the current thread, released on drop.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<DepthGuard> {
        DEPTH.with(|depth| {
            if depth.get() >= MAX_DEPTH {
                return None;
            }
            depth.set(depth.get() + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Dispatches every line of a file, stopping at the first failure.
pub struct SourceCommand {
    path_expander: PathExpander,
    dispatcher: Weak<Dispatcher>,
}

impl SourceCommand {
    pub fn new(dispatcher: Weak<Dispatcher>) -> Self {
        Self {
            path_expander: PathExpander::new(),
            dispatcher,
        }
    }

    fn run_lines(&self, content: &str, out: &mut dyn Write) -> Result<(), CommandError> {
        let dispatcher = self
            .dispatcher
            .upgrade()
            .ok_or_else(|| CommandError::Execution("shell is shutting down".to_string()))?;

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            dispatcher.dispatch(line, out).map_err(|e| {
                CommandError::Execution(format!("line {} ({}): {}", number + 1, line, e))
            })?;
        }
        Ok(())
    }
}

impl Command for SourceCommand {
    fn help(&self) -> &str {
        "Run the commands listed in a file"
    }

    fn usage(&self) -> &str {
        "source <file>"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.len() == 1
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let path = self
            .path_expander
            .expand(&args[0])
            .map_err(|e| CommandError::Execution(e.to_string()))?;
        let content = fs::read_to_string(&path).map_err(CommandError::io_failure(&args[0]))?;

        let _level = DepthGuard::enter().ok_or_else(|| {
            CommandError::Execution(format!("source nested deeper than {} levels", MAX_DEPTH))
        })?;
        self.run_lines(&content, out)
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        super::file::complete_path(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::{DepthGuard, MAX_DEPTH};
    use crate::core::commands::CommandError;
    use crate::core::dispatch::tests::Harness;
    use std::fs;
    use std::thread;

    #[test]
    fn test_source_runs_each_line() {
        let h = Harness::new();
        let script = h.dir.path().join("script.txt");
        fs::write(&script, "# greeting\necho one\n\n  echo two  \n").unwrap();

        let text = h.output(&format!("source {}", script.display()));
        assert_eq!(text, "one\ntwo\n");
    }

    #[test]
    fn test_source_stops_at_first_failure() {
        let h = Harness::new();
        let script = h.dir.path().join("bad.txt");
        fs::write(&script, "echo before\nnope\necho after\n").unwrap();

        let (text, report) = h.run(&format!("source {}", script.display()));
        assert!(text.starts_with("before\n"));
        assert!(!text.contains("after"));
        assert!(matches!(report.error, Some(CommandError::Execution(ref m)) if m.contains("line 2")));
    }

    #[test]
    fn test_source_missing_file() {
        let h = Harness::new();
        let (_, report) = h.run("source /nonexistent/file");
        assert!(matches!(report.error, Some(CommandError::IoFailure { .. })));
    }

    #[test]
    fn test_source_self_reference_is_bounded() {
        let h = Harness::new();
        let script = h.dir.path().join("loop.txt");
        fs::write(&script, format!("source {}\n", script.display())).unwrap();

        let (_, report) = h.run(&format!("source {}", script.display()));
        assert!(report.error.is_some());
        // depth counter is restored after unwinding
        let ok = h.dir.path().join("ok.txt");
        fs::write(&ok, "echo fine\n").unwrap();
        assert_eq!(h.output(&format!("source {}", ok.display())), "fine\n");
    }

    #[test]
    fn test_nesting_is_counted_per_thread() {
        let h = Harness::new();
        let ok = h.dir.path().join("ok.txt");
        fs::write(&ok, "echo fine\n").unwrap();
        let line = format!("source {}", ok.display());

        let held: Vec<DepthGuard> = (0..MAX_DEPTH).map(|_| DepthGuard::enter().unwrap()).collect();
        let (_, report) = h.run(&line);
        assert!(matches!(report.error, Some(CommandError::Execution(ref m)) if m.contains("nested")));

        thread::scope(|s| {
            let other = s.spawn(|| h.run(&line));
            let (text, report) = other.join().unwrap();
            assert!(report.is_success(), "{:?}", report.error);
            assert_eq!(text, "fine\n");
        });

        drop(held);
        assert_eq!(h.output(&line), "fine\n");
    }
}
