mod completer;
pub mod editor;
pub mod history;
pub mod terminal;

pub use completer::{CommandCompleter, CompletionSource, PathCompleter, ShellCompleter};
pub use editor::{EditorContext, Key, KeySource, LineEditor, Signal};
pub use history::History;
