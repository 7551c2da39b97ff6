use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Command, CommandError};
use crate::input::History;

/// `history [search <text> | clear]`
#[derive(Clone)]
pub struct HistoryCommand {
    history: Arc<Mutex<History>>,
}

impl HistoryCommand {
    pub fn new(history: Arc<Mutex<History>>) -> Self {
        Self { history }
    }

    fn lock(&self) -> Result<MutexGuard<'_, History>, CommandError> {
        self.history
            .lock()
            .map_err(|_| CommandError::Execution("Failed to lock history".to_string()))
    }

    fn show_all(&self, out: &mut dyn Write) -> Result<(), CommandError> {
        let entries = self.lock()?.snapshot();
        for (i, entry) in entries.iter().enumerate() {
            writeln!(out, "{:>5}  {}", i + 1, entry)?;
        }
        Ok(())
    }

    fn search(&self, query: &str, out: &mut dyn Write) -> Result<(), CommandError> {
        let matches: Vec<String> = self
            .lock()?
            .search_contains(query)
            .into_iter()
            .map(String::from)
            .collect();

        if matches.is_empty() {
            writeln!(out, "no history entries contain {:?}", query)?;
        }
        for entry in matches {
            writeln!(out, "{}", entry)?;
        }
        Ok(())
    }
}

impl Command for HistoryCommand {
    fn help(&self) -> &str {
        "Show, search or clear command history"
    }

    fn usage(&self) -> &str {
        "history [search <text> | clear]"
    }

    fn validate(&self, args: &[String]) -> bool {
        match args.first().map(String::as_str) {
            None => true,
            Some("search") => args.len() >= 2,
            Some("clear") => args.len() == 1,
            Some(_) => false,
        }
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        match args.first().map(String::as_str) {
            None => self.show_all(out),
            Some("search") => self.search(&args[1..].join(" "), out),
            Some("clear") => {
                self.lock()?
                    .clear()
                    .map_err(|e| CommandError::Execution(e.to_string()))?;
                writeln!(out, "history cleared")?;
                Ok(())
            }
            Some(_) => Err(CommandError::InvalidArguments(self.usage().to_string())),
        }
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        ["search", "clear"]
            .iter()
            .filter(|s| s.starts_with(prefix))
            .map(|s| s.to_string())
            .collect()
    }
}
