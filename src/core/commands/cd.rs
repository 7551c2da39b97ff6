use std::env;
use std::io::Write;

use super::{Command, CommandError};
use crate::path::PathExpander;

#[derive(Clone, Default)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl CdCommand {
    pub fn new() -> Self {
        Self {
            path_expander: PathExpander::new(),
        }
    }
}

impl Command for CdCommand {
    fn help(&self) -> &str {
        "Change the current directory"
    }

    fn usage(&self) -> &str {
        "cd [dir]"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.len() <= 1
    }

    fn execute(&self, args: &[String], _out: &mut dyn Write) -> Result<(), CommandError> {
        let path_str = args.first().map(|s| s.as_str()).unwrap_or("~");
        let expanded_path = self
            .path_expander
            .expand(path_str)
            .map_err(|e| CommandError::Execution(e.to_string()))?;

        env::set_current_dir(&expanded_path)
            .map_err(CommandError::io_failure(expanded_path.display().to_string()))
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        super::file::complete_path(prefix)
            .into_iter()
            .filter(|c| c.ends_with('/'))
            .collect()
    }
}
