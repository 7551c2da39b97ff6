use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use regex::Regex;
use walkdir::WalkDir;

use super::{CommandError, CommandRegistry, ConcreteCommand};
use crate::input::PathCompleter;

/// Path candidates for a file argument, directories ending in `/`.
pub(crate) fn complete_path(prefix: &str) -> Vec<String> {
    PathCompleter::new()
        .complete_path(prefix)
        .into_iter()
        .map(|pair| pair.replacement)
        .collect()
}

/// Every entry below `root` whose file name matches `pattern`.
pub fn search_files(root: &Path, pattern: &Regex) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| pattern.is_match(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Number of regular files below `root`.
pub fn count_files(root: &Path) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}

fn list_dir(dir: &Path) -> Result<Vec<String>, CommandError> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(CommandError::io_failure(dir.display().to_string()))?
        .filter_map(Result::ok)
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                format!("{}/", name)
            } else {
                name
            }
        })
        .collect();
    names.sort();
    Ok(names)
}

fn current_dir() -> Result<PathBuf, CommandError> {
    std::env::current_dir().map_err(CommandError::io_failure("."))
}

fn file_command<F>(help: &str, usage: &str, min: usize, max: Option<usize>, exec: F) -> ConcreteCommand
where
    F: Fn(&[String], &mut dyn Write) -> Result<(), CommandError> + Send + Sync + 'static,
{
    ConcreteCommand::new(help, usage, exec)
        .arity(min, max)
        .with_completions(complete_path)
}

pub(super) fn register(registry: &CommandRegistry) {
    registry.register(
        "create",
        file_command("Create an empty file", "create <file>", 1, Some(1), |args, out| {
            fs::File::create(&args[0]).map_err(CommandError::io_failure(&args[0]))?;
            writeln!(out, "created {}", args[0])?;
            Ok(())
        }),
    );

    registry.register(
        "delete",
        file_command("Delete a file", "delete <file>", 1, Some(1), |args, out| {
            fs::remove_file(&args[0]).map_err(CommandError::io_failure(&args[0]))?;
            writeln!(out, "deleted {}", args[0])?;
            Ok(())
        }),
    );

    registry.register(
        "list",
        ConcreteCommand::new("List the current directory", "list", |_, out| {
            for name in list_dir(&current_dir()?)? {
                writeln!(out, "  {}", name)?;
            }
            Ok(())
        })
        .arity(0, Some(0)),
    );

    registry.register(
        "readfile",
        file_command("Print a file", "readfile <file>", 1, Some(1), |args, out| {
            let content = fs::read(&args[0]).map_err(CommandError::io_failure(&args[0]))?;
            out.write_all(&content)?;
            if !content.is_empty() && !content.ends_with(b"\n") {
                writeln!(out)?;
            }
            Ok(())
        }),
    );

    registry.register(
        "writefile",
        file_command("Write text to a file", "writefile <file> <text...>", 2, None, |args, out| {
            let text = args[1..].join(" ");
            fs::write(&args[0], format!("{}\n", text)).map_err(CommandError::io_failure(&args[0]))?;
            writeln!(out, "wrote {}", args[0])?;
            Ok(())
        }),
    );

    registry.register(
        "search",
        ConcreteCommand::new(
            "Find files whose name matches a regex",
            "search <regex>",
            |args, out| {
                let pattern = Regex::new(&args[0])
                    .map_err(|e| CommandError::InvalidArguments(format!("search <regex> ({})", e)))?;
                for path in search_files(&current_dir()?, &pattern) {
                    writeln!(out, "{}", path.display())?;
                }
                Ok(())
            },
        )
        .arity(1, Some(1)),
    );

    registry.register(
        "benchmark",
        ConcreteCommand::new("Time a scan of the current tree", "benchmark", |_, out| {
            let start = Instant::now();
            let files = count_files(&current_dir()?);
            writeln!(out, "files scanned: {}", files)?;
            writeln!(out, "time taken: {} ms", start.elapsed().as_millis())?;
            Ok(())
        })
        .arity(0, Some(0)),
    );
}
