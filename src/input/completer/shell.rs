use std::sync::Arc;

use rustyline::completion::Pair;

use super::{CommandCompleter, CompletionSource};
use crate::core::dispatch::Dispatcher;

/// Completion backed by the live registry and alias table.
pub struct ShellCompleter {
    dispatcher: Arc<Dispatcher>,
}

impl ShellCompleter {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn alias_names(&self) -> Vec<String> {
        self.dispatcher
            .state()
            .aliases
            .lock()
            .map(|aliases| aliases.names().map(String::from).collect())
            .unwrap_or_default()
    }

    fn complete_argument(&self, head: &str, word: &str) -> Vec<Pair> {
        let name = self
            .dispatcher
            .state()
            .aliases
            .lock()
            .ok()
            .and_then(|aliases| aliases.get(head).map(String::from))
            .unwrap_or_else(|| head.to_string());

        let Some(command) = self.dispatcher.registry().get(&name) else {
            return Vec::new();
        };
        command
            .completions(word)
            .into_iter()
            .map(|candidate| Pair {
                display: display_name(&candidate),
                replacement: candidate,
            })
            .collect()
    }
}

/// Last path component, keeping a trailing `/` on directories.
fn display_name(candidate: &str) -> String {
    let trimmed = candidate.trim_end_matches('/');
    let name = match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    };
    if candidate.ends_with('/') && !name.is_empty() {
        format!("{}/", name)
    } else if name.is_empty() {
        candidate.to_string()
    } else {
        name.to_string()
    }
}

impl CompletionSource for ShellCompleter {
    fn complete(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map(|i| i + before[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0);
        let word = &before[start..];

        match before[..start].split_whitespace().next() {
            None => {
                let completer = CommandCompleter::new(self.dispatcher.registry().names(), self.alias_names());
                (start, completer.complete_command(word))
            }
            Some(head) => (start, self.complete_argument(head, word)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::tests::Harness;

    fn replacements(pairs: &[Pair]) -> Vec<&str> {
        pairs.iter().map(|p| p.replacement.as_str()).collect()
    }

    #[test]
    fn test_first_word_uses_commands_and_aliases() {
        let h = Harness::new();
        h.output("setalias hx history");
        let completer = ShellCompleter::new(h.dispatcher.clone());

        let (start, pairs) = completer.complete("h", 1);
        assert_eq!(start, 0);
        assert_eq!(replacements(&pairs), vec!["hash", "help", "history", "hx"]);
        assert_eq!(pairs[3].display, "hx (alias)");
    }

    #[test]
    fn test_leading_whitespace_still_completes_command() {
        let h = Harness::new();
        let completer = ShellCompleter::new(h.dispatcher.clone());
        let (start, pairs) = completer.complete("  sy", 4);
        assert_eq!(start, 2);
        assert_eq!(replacements(&pairs), vec!["sysinfo"]);
    }

    #[test]
    fn test_argument_uses_command_completions() {
        let h = Harness::new();
        let completer = ShellCompleter::new(h.dispatcher.clone());

        let (start, pairs) = completer.complete("theme l", 7);
        assert_eq!(start, 6);
        assert_eq!(replacements(&pairs), vec!["light"]);
    }

    #[test]
    fn test_argument_through_alias() {
        let h = Harness::new();
        h.output("setalias th theme");
        let completer = ShellCompleter::new(h.dispatcher.clone());

        let (_, pairs) = completer.complete("th d", 4);
        assert_eq!(replacements(&pairs), vec!["dark"]);
    }

    #[test]
    fn test_unknown_command_has_no_argument_candidates() {
        let h = Harness::new();
        let completer = ShellCompleter::new(h.dispatcher.clone());
        assert!(completer.complete("nope x", 6).1.is_empty());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/tmp/a/notes.txt"), "notes.txt");
        assert_eq!(display_name("/tmp/a/nested/"), "nested/");
        assert_eq!(display_name("plain"), "plain");
        assert_eq!(display_name("/"), "/");
    }
}
