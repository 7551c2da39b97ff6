use std::io::Write;

use super::{Command, CommandError};
use crate::core::state::ShellState;

/// `alias [name=target]`: lists aliases or defines one in memory.
#[derive(Clone)]
pub struct AliasCommand {
    state: ShellState,
}

impl AliasCommand {
    pub fn new(state: ShellState) -> Self {
        Self { state }
    }
}

impl Command for AliasCommand {
    fn help(&self) -> &str {
        "List aliases or define one"
    }

    fn usage(&self) -> &str {
        "alias [name=target]"
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let mut aliases = self
            .state
            .aliases
            .lock()
            .map_err(|_| CommandError::Execution("Failed to access aliases".to_string()))?;

        if !args.is_empty() {
            return aliases.add_definition(&args.join(" "));
        }

        let listing: Vec<String> = aliases
            .iter()
            .map(|(alias, command)| format!("{}={}", alias, command))
            .collect();
        drop(aliases);

        if listing.is_empty() {
            writeln!(out, "no aliases defined")?;
        }
        for line in listing {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

/// `setalias <name> <target>`: defines an alias and saves the alias file.
#[derive(Clone)]
pub struct SetAliasCommand {
    state: ShellState,
}

impl SetAliasCommand {
    pub fn new(state: ShellState) -> Self {
        Self { state }
    }
}

impl Command for SetAliasCommand {
    fn help(&self) -> &str {
        "Define an alias and save it"
    }

    fn usage(&self) -> &str {
        "setalias <name> <target>"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.len() >= 2
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let (name, target) = (&args[0], &args[1]);
        self.state
            .aliases
            .lock()
            .map_err(|_| CommandError::Execution("Failed to access aliases".to_string()))?
            .add(name, target)?;
        self.state.persist_aliases()?;

        writeln!(out, "alias set: {} -> {}", name, target)?;
        Ok(())
    }
}
