use std::io::{self, Write};

use rustyline::completion::Pair;

use super::completer::CompletionSource;

/// A decoded keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Tab,
    Enter,
    /// Ctrl-C
    Interrupt,
    /// Ctrl-D
    Eof,
}

/// Source of keystrokes; `Ok(None)` means the input is closed.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Option<Key>>;
}

/// How a call to [`LineEditor::read_line`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Line(String),
    Interrupted,
    Eof,
}

/// What the editor reads from but does not own.
pub struct EditorContext<'a> {
    /// Submitted lines, oldest first.
    pub history: &'a [String],
    pub completer: &'a dyn CompletionSource,
    /// Terminal width in columns, used for the completion listing.
    pub width: usize,
}

/// Line editing state machine: cursor movement, history browsing and
/// Tab completion over a single input line.
///
/// `history_index` is `None` while editing fresh input and `Some(n)` while
/// showing the entry `n` steps back from the newest.
pub struct LineEditor {
    prompt: String,
    buffer: String,
    cursor: usize,
    history_index: Option<usize>,
    rendered_width: usize,
}

impl LineEditor {
    /// `prompt` may contain colour escape sequences.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: String::new(),
            cursor: 0,
            history_index: None,
            rendered_width: 0,
        }
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    /// Prints the prompt and reads keys until a line is complete.
    pub fn read_line(
        &mut self,
        keys: &mut dyn KeySource,
        ctx: &EditorContext<'_>,
        out: &mut dyn Write,
    ) -> io::Result<Signal> {
        self.reset();
        write!(out, "{}", self.prompt)?;
        out.flush()?;

        loop {
            let Some(key) = keys.next_key()? else {
                return Ok(Signal::Eof);
            };
            if let Some(signal) = self.handle_key(key, ctx, out)? {
                return Ok(signal);
            }
            out.flush()?;
        }
    }

    /// Applies one key. Returns a signal once the line is finished.
    pub fn handle_key(
        &mut self,
        key: Key,
        ctx: &EditorContext<'_>,
        out: &mut dyn Write,
    ) -> io::Result<Option<Signal>> {
        match key {
            Key::Char(c) if !c.is_control() => self.insert(c, out)?,
            Key::Char(_) => {}
            Key::Backspace => self.backspace(out)?,
            Key::Left => self.move_left(out)?,
            Key::Right => self.move_right(out)?,
            Key::Up => self.history_prev(ctx.history, out)?,
            Key::Down => self.history_next(ctx.history, out)?,
            Key::Tab => self.complete(ctx, out)?,
            Key::Enter => {
                write!(out, "\r\n")?;
                let line = std::mem::take(&mut self.buffer);
                self.reset();
                return Ok(Some(Signal::Line(line)));
            }
            Key::Interrupt => {
                write!(out, "^C\r\n")?;
                self.reset();
                return Ok(Some(Signal::Interrupted));
            }
            Key::Eof if self.buffer.is_empty() => {
                write!(out, "\r\n")?;
                return Ok(Some(Signal::Eof));
            }
            Key::Eof => {}
        }
        Ok(None)
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_index = None;
        self.rendered_width = 0;
    }

    fn insert(&mut self, c: char, out: &mut dyn Write) -> io::Result<()> {
        self.history_index = None;
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();

        if self.cursor == self.buffer.len() {
            self.rendered_width += 1;
            write!(out, "{}", c)
        } else {
            self.redraw(out)
        }
    }

    fn backspace(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let Some(prev) = self.prev_boundary() else {
            return Ok(());
        };
        self.buffer.remove(prev);
        self.cursor = prev;
        self.redraw(out)
    }

    fn move_left(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
            write!(out, "\x1b[D")?;
        }
        Ok(())
    }

    fn move_right(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
            write!(out, "\x1b[C")?;
        }
        Ok(())
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn history_prev(&mut self, history: &[String], out: &mut dyn Write) -> io::Result<()> {
        let next = self.history_index.map_or(0, |i| i + 1);
        if next >= history.len() {
            return Ok(());
        }
        self.show_history(history, Some(next), out)
    }

    fn history_next(&mut self, history: &[String], out: &mut dyn Write) -> io::Result<()> {
        match self.history_index {
            None => Ok(()),
            Some(0) => self.show_history(history, None, out),
            Some(i) => self.show_history(history, Some(i - 1), out),
        }
    }

    fn show_history(&mut self, history: &[String], index: Option<usize>, out: &mut dyn Write) -> io::Result<()> {
        self.history_index = index;
        self.buffer = index
            .and_then(|i| history.len().checked_sub(i + 1))
            .and_then(|i| history.get(i))
            .cloned()
            .unwrap_or_default();
        self.cursor = self.buffer.len();
        self.redraw(out)
    }

    fn complete(&mut self, ctx: &EditorContext<'_>, out: &mut dyn Write) -> io::Result<()> {
        let (start, mut candidates) = ctx.completer.complete(&self.buffer, self.cursor);
        candidates.dedup_by(|a, b| a.replacement == b.replacement);
        let start = start.min(self.cursor);

        match candidates.as_slice() {
            [] => Ok(()),
            [only] => {
                let replacement = only.replacement.clone();
                self.replace_word(start, &replacement);
                self.redraw(out)
            }
            many => {
                let prefix = longest_common_prefix(many.iter().map(|p| p.replacement.as_str()));
                if prefix.len() > self.cursor - start {
                    self.replace_word(start, &prefix);
                }
                write!(out, "\r\n{}", format_columns(many, ctx.width))?;
                self.rendered_width = 0;
                self.redraw(out)
            }
        }
    }

    fn replace_word(&mut self, start: usize, replacement: &str) {
        self.buffer.replace_range(start..self.cursor, replacement);
        self.cursor = start + replacement.len();
    }

    /// Rewrites the prompt and buffer in place, blanking any leftover
    /// characters from the previous rendering.
    fn redraw(&mut self, out: &mut dyn Write) -> io::Result<()> {
        let width = self.buffer.chars().count();
        let padding = self.rendered_width.saturating_sub(width);
        write!(out, "\r{}{}{}", self.prompt, self.buffer, " ".repeat(padding))?;

        let back = padding + self.buffer[self.cursor..].chars().count();
        if back > 0 {
            write!(out, "\x1b[{}D", back)?;
        }
        self.rendered_width = width;
        Ok(())
    }
}

/// Longest prefix shared by every item, on a char boundary.
pub fn longest_common_prefix<'a>(mut items: impl Iterator<Item = &'a str>) -> String {
    let Some(first) = items.next() else {
        return String::new();
    };
    let mut len = first.len();
    for item in items {
        len = first[..len]
            .char_indices()
            .zip(item.chars())
            .find(|((_, a), b)| a != b)
            .map_or(len.min(item.len()), |((i, _), _)| i);
    }
    first[..len].to_string()
}

/// Lays candidates out row by row in as many columns as fit in `width`.
pub fn format_columns(candidates: &[Pair], width: usize) -> String {
    let cell = candidates
        .iter()
        .map(|p| p.display.chars().count())
        .max()
        .unwrap_or(0)
        + 2;
    let columns = (width / cell).max(1);

    let mut listing = String::new();
    for row in candidates.chunks(columns) {
        let line: String = row
            .iter()
            .map(|p| format!("{:<cell$}", p.display, cell = cell))
            .collect();
        listing.push_str(line.trim_end());
        listing.push_str("\r\n");
    }
    listing
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<&'static str>);

    impl CompletionSource for Fixed {
        fn complete(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
            let start = line[..pos].rfind(' ').map_or(0, |i| i + 1);
            let word = &line[start..pos];
            let pairs = self
                .0
                .iter()
                .filter(|c| c.starts_with(word))
                .map(|c| Pair {
                    display: c.to_string(),
                    replacement: c.to_string(),
                })
                .collect();
            (start, pairs)
        }
    }

    fn keys(text: &str) -> Vec<Key> {
        text.chars().map(Key::Char).collect()
    }

    struct Scripted(std::vec::IntoIter<Key>);

    impl KeySource for Scripted {
        fn next_key(&mut self) -> io::Result<Option<Key>> {
            Ok(self.0.next())
        }
    }

    struct Rig {
        editor: LineEditor,
        history: Vec<String>,
        completer: Fixed,
        out: Vec<u8>,
    }

    impl Rig {
        fn new(history: &[&str]) -> Self {
            Rig {
                editor: LineEditor::new("> "),
                history: history.iter().map(|s| s.to_string()).collect(),
                completer: Fixed(vec!["echo", "edit", "encrypt", "help"]),
                out: Vec::new(),
            }
        }

        fn press(&mut self, keys: impl IntoIterator<Item = Key>) -> Option<Signal> {
            let ctx = EditorContext {
                history: &self.history,
                completer: &self.completer,
                width: 80,
            };
            let mut last = None;
            for key in keys {
                last = self.editor.handle_key(key, &ctx, &mut self.out).unwrap();
            }
            last
        }

        fn output(&self) -> String {
            String::from_utf8_lossy(&self.out).into_owned()
        }
    }

    #[test]
    fn test_typing_and_enter() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("echo hi"));
        assert_eq!(rig.editor.buffer(), "echo hi");
        assert_eq!(rig.output(), "echo hi");

        assert_eq!(rig.press([Key::Enter]), Some(Signal::Line("echo hi".to_string())));
        assert_eq!(rig.editor.buffer(), "");
        assert_eq!(rig.editor.history_index(), None);
    }

    #[test]
    fn test_read_line_prints_prompt_and_returns_line() {
        let mut editor = LineEditor::new("> ");
        let completer = Fixed(vec![]);
        let ctx = EditorContext {
            history: &[],
            completer: &completer,
            width: 80,
        };
        let mut script = keys("ok");
        script.push(Key::Enter);
        let mut input = Scripted(script.into_iter());
        let mut out = Vec::new();

        let signal = editor.read_line(&mut input, &ctx, &mut out).unwrap();
        assert_eq!(signal, Signal::Line("ok".to_string()));
        assert_eq!(String::from_utf8(out).unwrap(), "> ok\r\n");
    }

    #[test]
    fn test_closed_input_is_eof() {
        let mut editor = LineEditor::new("> ");
        let completer = Fixed(vec![]);
        let ctx = EditorContext {
            history: &[],
            completer: &completer,
            width: 80,
        };
        let mut input = Scripted(keys("partial").into_iter());
        let signal = editor.read_line(&mut input, &ctx, &mut Vec::new()).unwrap();
        assert_eq!(signal, Signal::Eof);
    }

    #[test]
    fn test_backspace_erases_and_pads() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("abc"));
        rig.out.clear();
        rig.press([Key::Backspace]);

        assert_eq!(rig.editor.buffer(), "ab");
        assert_eq!(rig.output(), "\r> ab \x1b[1D");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut rig = Rig::new(&[]);
        rig.press([Key::Backspace]);
        assert_eq!(rig.output(), "");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("ac"));
        rig.press([Key::Left]);
        rig.press(keys("b"));
        assert_eq!(rig.editor.buffer(), "abc");
        assert_eq!(rig.editor.cursor(), 2);
        assert!(rig.output().ends_with("\r> abc\x1b[1D"));
    }

    #[test]
    fn test_cursor_moves_over_multibyte_chars() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("aé"));
        rig.press([Key::Left, Key::Left, Key::Left]);
        assert_eq!(rig.editor.cursor(), 0);
        rig.press([Key::Right, Key::Right, Key::Right]);
        assert_eq!(rig.editor.cursor(), "aé".len());
        rig.press([Key::Backspace]);
        assert_eq!(rig.editor.buffer(), "a");
    }

    #[test]
    fn test_history_navigation() {
        let mut rig = Rig::new(&["first", "second", "third"]);

        rig.press([Key::Up]);
        assert_eq!(rig.editor.buffer(), "third");
        assert_eq!(rig.editor.history_index(), Some(0));

        rig.press([Key::Up, Key::Up]);
        assert_eq!(rig.editor.buffer(), "first");
        rig.press([Key::Up]);
        assert_eq!(rig.editor.buffer(), "first");
        assert_eq!(rig.editor.history_index(), Some(2));

        rig.press([Key::Down]);
        assert_eq!(rig.editor.buffer(), "second");
        rig.press([Key::Down, Key::Down]);
        assert_eq!(rig.editor.buffer(), "");
        assert_eq!(rig.editor.history_index(), None);
        rig.press([Key::Down]);
        assert_eq!(rig.editor.history_index(), None);
    }

    #[test]
    fn test_history_redraw_blanks_longer_line() {
        let mut rig = Rig::new(&["a", "longer"]);
        rig.press([Key::Up]);
        rig.out.clear();
        rig.press([Key::Up]);
        assert_eq!(rig.output(), "\r> a     \x1b[5D");
        assert_eq!(rig.editor.cursor(), 1);
    }

    #[test]
    fn test_up_with_empty_history() {
        let mut rig = Rig::new(&[]);
        rig.press([Key::Up]);
        assert_eq!(rig.editor.history_index(), None);
        assert_eq!(rig.output(), "");
    }

    #[test]
    fn test_submit_resets_history_index() {
        let mut rig = Rig::new(&["time"]);
        rig.press([Key::Up]);
        assert_eq!(rig.press([Key::Enter]), Some(Signal::Line("time".to_string())));
        assert_eq!(rig.editor.history_index(), None);
    }

    #[test]
    fn test_tab_single_match_replaces() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("hel"));
        rig.press([Key::Tab]);
        assert_eq!(rig.editor.buffer(), "help");
        assert_eq!(rig.editor.cursor(), 4);
    }

    #[test]
    fn test_tab_multiple_extends_to_common_prefix_and_lists() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("e"));
        rig.out.clear();
        rig.press([Key::Tab]);

        assert_eq!(rig.editor.buffer(), "e");
        let text = rig.output();
        assert!(text.contains("echo     edit     encrypt"));
        assert!(text.ends_with("\r> e"));

        let mut rig = Rig::new(&[]);
        rig.completer = Fixed(vec!["encode", "encrypt"]);
        rig.press(keys("e"));
        rig.press([Key::Tab]);
        assert_eq!(rig.editor.buffer(), "enc");
    }

    #[test]
    fn test_tab_no_match_is_noop() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("zz"));
        rig.out.clear();
        rig.press([Key::Tab]);
        assert_eq!(rig.editor.buffer(), "zz");
        assert_eq!(rig.output(), "");
    }

    #[test]
    fn test_tab_completes_argument() {
        let mut rig = Rig::new(&[]);
        rig.completer = Fixed(vec!["light", "dark"]);
        rig.press(keys("theme li"));
        rig.press([Key::Tab]);
        assert_eq!(rig.editor.buffer(), "theme light");
    }

    #[test]
    fn test_interrupt_and_eof() {
        let mut rig = Rig::new(&[]);
        rig.press(keys("abc"));
        assert_eq!(rig.press([Key::Eof]), None);
        assert_eq!(rig.press([Key::Interrupt]), Some(Signal::Interrupted));
        assert_eq!(rig.editor.buffer(), "");
        assert_eq!(rig.press([Key::Eof]), Some(Signal::Eof));
    }

    #[test]
    fn test_longest_common_prefix() {
        assert_eq!(longest_common_prefix(["encode", "encrypt"].into_iter()), "enc");
        assert_eq!(longest_common_prefix(["same", "same"].into_iter()), "same");
        assert_eq!(longest_common_prefix(["ab", "abc"].into_iter()), "ab");
        assert_eq!(longest_common_prefix(["abc", "ab"].into_iter()), "ab");
        assert_eq!(longest_common_prefix(["éa", "éb"].into_iter()), "é");
        assert_eq!(longest_common_prefix(std::iter::empty()), "");
    }

    #[test]
    fn test_format_columns() {
        let pairs: Vec<Pair> = ["a", "bb", "ccc", "d"]
            .iter()
            .map(|s| Pair {
                display: s.to_string(),
                replacement: s.to_string(),
            })
            .collect();
        assert_eq!(format_columns(&pairs, 10), "a    bb\r\nccc  d\r\n");
        assert_eq!(format_columns(&pairs, 1), "a\r\nbb\r\nccc\r\nd\r\n");
    }
}
