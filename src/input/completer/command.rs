use std::collections::BTreeSet;

use rustyline::completion::Pair;

/// Completes the first word of a line from command and alias names.
#[derive(Clone, Default)]
pub struct CommandCompleter {
    commands: BTreeSet<String>,
    aliases: BTreeSet<String>,
}

impl CommandCompleter {
    pub fn new<C, A>(commands: C, aliases: A) -> Self
    where
        C: IntoIterator<Item = String>,
        A: IntoIterator<Item = String>,
    {
        let mut commands: BTreeSet<String> = commands.into_iter().collect();
        commands.insert("exit".to_string());
        Self {
            commands,
            aliases: aliases.into_iter().collect(),
        }
    }

    pub fn complete_command(&self, input: &str) -> Vec<Pair> {
        let mut matches = Vec::new();
        self.add_command_matches(&mut matches, input);
        self.add_alias_matches(&mut matches, input);
        matches
    }

    fn add_command_matches(&self, matches: &mut Vec<Pair>, input: &str) {
        for cmd in self.commands.iter().filter(|c| c.starts_with(input)) {
            matches.push(Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            });
        }
    }

    fn add_alias_matches(&self, matches: &mut Vec<Pair>, input: &str) {
        for alias in self.aliases.iter().filter(|a| a.starts_with(input)) {
            if self.commands.contains(alias) {
                continue;
            }
            matches.push(Pair {
                display: format!("{} (alias)", alias),
                replacement: alias.clone(),
            });
        }
    }
}
