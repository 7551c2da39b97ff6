use std::{
    fs,
    path::{Path, PathBuf},
};

use rustyline::completion::Pair;

/// Completes file system paths relative to the current directory.
#[derive(Clone, Default)]
pub struct PathCompleter;

impl PathCompleter {
    pub fn new() -> Self {
        Self
    }

    /// Directories are completed with a trailing `/`.
    pub fn complete_path(&self, incomplete: &str) -> Vec<Pair> {
        let (dir_to_search, file_prefix) = Self::split_input(incomplete);

        let Ok(entries) = fs::read_dir(&dir_to_search) else {
            return Vec::new();
        };

        let mut matches: Vec<Pair> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                if !name.starts_with(&file_prefix) || (file_prefix.is_empty() && name.starts_with('.')) {
                    return None;
                }
                Some(Self::pair(&name, &entry.path(), &dir_to_search))
            })
            .collect();

        matches.sort_by(|a, b| a.display.cmp(&b.display));
        matches
    }

    fn split_input(incomplete: &str) -> (PathBuf, String) {
        if incomplete.is_empty() {
            return (PathBuf::from("."), String::new());
        }
        if incomplete.ends_with('/') {
            return (PathBuf::from(incomplete), String::new());
        }

        let path = Path::new(incomplete);
        let file_prefix = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        (dir, file_prefix)
    }

    fn pair(name: &str, path: &Path, dir_to_search: &Path) -> Pair {
        let mut replacement = if dir_to_search == Path::new(".") {
            name.to_string()
        } else {
            dir_to_search.join(name).to_string_lossy().into_owned()
        };
        let mut display = name.to_string();

        if path.is_dir() {
            replacement.push('/');
            display.push('/');
        }
        Pair {
            display,
            replacement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("nothing.md"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        dir
    }

    #[test]
    fn test_prefix_in_directory() {
        let dir = setup();
        let base = dir.path().display().to_string();
        let pairs = PathCompleter::new().complete_path(&format!("{}/not", base));

        let replacements: Vec<_> = pairs.iter().map(|p| p.replacement.clone()).collect();
        assert_eq!(
            replacements,
            vec![format!("{}/notes.txt", base), format!("{}/nothing.md", base)]
        );
        assert_eq!(pairs[0].display, "notes.txt");
    }

    #[test]
    fn test_directories_get_slash() {
        let dir = setup();
        let base = dir.path().display().to_string();
        let pairs = PathCompleter::new().complete_path(&format!("{}/ne", base));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, format!("{}/nested/", base));
        assert_eq!(pairs[0].display, "nested/");
    }

    #[test]
    fn test_hidden_files_need_explicit_dot() {
        let dir = setup();
        let base = dir.path().display().to_string();
        let all = PathCompleter::new().complete_path(&format!("{}/", base));
        assert!(all.iter().all(|p| p.display != ".hidden"));

        let hidden = PathCompleter::new().complete_path(&format!("{}/.h", base));
        assert_eq!(hidden.len(), 1);
    }

    #[test]
    fn test_missing_directory() {
        assert!(PathCompleter::new().complete_path("/nonexistent/dir/x").is_empty());
    }
}
