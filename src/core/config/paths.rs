use std::env;
use std::path::{Path, PathBuf};

/// Overrides the directory holding persisted shell state.
pub const HOME_ENV: &str = "AETHER_HOME";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub data_dir: PathBuf,
    pub history_path: PathBuf,
    pub alias_path: PathBuf,
    pub theme_path: PathBuf,
}

impl ConfigPaths {
    /// Resolves `$AETHER_HOME`, then `~/.aether`, then the current directory.
    pub fn new() -> Self {
        let data_dir = env::var_os(HOME_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".aether")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::in_dir(data_dir)
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        ConfigPaths {
            history_path: data_dir.join("history.txt"),
            alias_path: data_dir.join("aliases.txt"),
            theme_path: data_dir.join("themes.txt"),
            data_dir,
        }
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_paths() {
        let paths = ConfigPaths::in_dir("/tmp/aether-test");

        assert_eq!(paths.history_path, PathBuf::from("/tmp/aether-test/history.txt"));
        assert_eq!(paths.alias_path, PathBuf::from("/tmp/aether-test/aliases.txt"));
        assert_eq!(paths.theme_path, PathBuf::from("/tmp/aether-test/themes.txt"));
    }
}
