mod command;
mod path;
mod shell;

pub use command::CommandCompleter;
pub use path::PathCompleter;
pub use shell::ShellCompleter;

use rustyline::completion::Pair;

/// Supplies Tab-completion candidates for the line editor.
pub trait CompletionSource {
    /// Candidates for the word ending at byte offset `pos`, together with
    /// the offset where that word starts.
    fn complete(&self, line: &str, pos: usize) -> (usize, Vec<Pair>);
}
