use std::io::Write;
use std::sync::Weak;

use super::{Command, CommandError};
use crate::core::dispatch::Dispatcher;

/// Lists registered commands. Holds a weak handle back to the dispatcher
/// that owns it.
pub struct HelpCommand {
    dispatcher: Weak<Dispatcher>,
}

impl HelpCommand {
    pub fn new(dispatcher: Weak<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn dispatcher(&self) -> Result<std::sync::Arc<Dispatcher>, CommandError> {
        self.dispatcher
            .upgrade()
            .ok_or_else(|| CommandError::Execution("shell is shutting down".to_string()))
    }
}

impl Command for HelpCommand {
    fn help(&self) -> &str {
        "List commands, or describe one"
    }

    fn usage(&self) -> &str {
        "help [command]"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.len() <= 1
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let dispatcher = self.dispatcher()?;
        let registry = dispatcher.registry();

        if let Some(name) = args.first() {
            let command = registry
                .get(name)
                .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;
            writeln!(out, "{} - {}", name, command.help())?;
            writeln!(out, "usage: {}", command.usage())?;
            return Ok(());
        }

        writeln!(out, "Available commands:")?;
        for (name, command) in registry.entries() {
            writeln!(out, "  {:<12} {}", name, command.help())?;
        }
        writeln!(out, "  {:<12} {}", "exit", "Save aliases and leave the shell")?;
        Ok(())
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        self.dispatcher
            .upgrade()
            .map(|d| {
                d.registry()
                    .names()
                    .into_iter()
                    .filter(|n| n.starts_with(prefix))
                    .collect()
            })
            .unwrap_or_default()
    }
}
