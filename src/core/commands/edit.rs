use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::{Command, CommandError};

/// Lines of a file held in memory, addressed 1-based.
#[derive(Debug, Default)]
pub struct TextBuffer {
    path: PathBuf,
    lines: Vec<String>,
}

impl TextBuffer {
    /// Loads `path`, starting empty when it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CommandError> {
        let path = path.as_ref().to_path_buf();
        let lines = match fs::read_to_string(&path) {
            Ok(content) => content.lines().map(String::from).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(CommandError::io_failure(path.display().to_string())(e)),
        };
        Ok(Self { path, lines })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn add(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// `false` when `number` is out of range.
    pub fn replace(&mut self, number: usize, line: impl Into<String>) -> bool {
        match number.checked_sub(1).and_then(|i| self.lines.get_mut(i)) {
            Some(slot) => {
                *slot = line.into();
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, number: usize) -> bool {
        match number.checked_sub(1).filter(|&i| i < self.lines.len()) {
            Some(i) => {
                self.lines.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn save(&self) -> Result<(), CommandError> {
        let mut content = self.lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content).map_err(CommandError::io_failure(self.path.display().to_string()))
    }

    fn display(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "--- {} ---", self.path.display())?;
        for (i, line) in self.lines.iter().enumerate() {
            writeln!(out, "{:>4}: {}", i + 1, line)?;
        }
        Ok(())
    }
}

fn read_line(input: &mut dyn BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt(out: &mut dyn Write, text: &str) -> io::Result<()> {
    write!(out, "{}", text)?;
    out.flush()
}

/// Drives an editing session until `quit` or end of input. Unsaved
/// changes are discarded.
pub fn run_session(buffer: &mut TextBuffer, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<(), CommandError> {
    loop {
        buffer.display(out)?;
        writeln!(out, "commands: add, edit <n>, delete <n>, save, quit")?;
        prompt(out, "edit> ")?;

        let Some(command) = read_line(input)? else {
            return Ok(());
        };
        let tokens: Vec<&str> = command.split_whitespace().collect();
        let number = tokens.get(1).and_then(|n| n.parse::<usize>().ok());

        match (tokens.first().copied(), number) {
            (None, _) => continue,
            (Some("add"), _) => {
                prompt(out, "new line: ")?;
                if let Some(line) = read_line(input)? {
                    buffer.add(line);
                }
            }
            (Some("edit"), Some(n)) => {
                prompt(out, "new content: ")?;
                if let Some(line) = read_line(input)? {
                    if !buffer.replace(n, line) {
                        writeln!(out, "no line {}", n)?;
                    }
                }
            }
            (Some("delete"), Some(n)) => {
                if !buffer.delete(n) {
                    writeln!(out, "no line {}", n)?;
                }
            }
            (Some("save"), _) => {
                buffer.save()?;
                writeln!(out, "saved")?;
            }
            (Some("quit"), _) => return Ok(()),
            _ => writeln!(out, "unknown editor command")?,
        }
    }
}

/// `edit <file>`: interactive session reading from stdin.
#[derive(Clone, Default)]
pub struct EditCommand;

impl EditCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for EditCommand {
    fn help(&self) -> &str {
        "Open a simple line editor"
    }

    fn usage(&self) -> &str {
        "edit <file>"
    }

    fn validate(&self, args: &[String]) -> bool {
        args.len() == 1
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let mut buffer = TextBuffer::open(&args[0])?;
        let stdin = io::stdin();
        let mut input = stdin.lock();
        run_session(&mut buffer, &mut input, out)
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        super::file::complete_path(prefix)
    }
}
