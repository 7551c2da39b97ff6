use std::{fs, path::Path};

use log::{debug, warn};

use super::{AliasManager, ConfigError, ConfigPaths, Theme};

/// Reads and writes the flat-file state kept between sessions.
///
/// Loading never fails: a missing or unreadable file yields the default,
/// and unparsable rows are skipped.
pub struct ConfigLoader<'a> {
    paths: &'a ConfigPaths,
}

impl<'a> ConfigLoader<'a> {
    pub fn new(paths: &'a ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn load_aliases(&self) -> AliasManager {
        let mut aliases = AliasManager::new();
        let Some(content) = read_if_exists(&self.paths.alias_path) else {
            return aliases;
        };

        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            if let Err(e) = aliases.add_definition(line) {
                debug!("skipping alias row {:?}: {}", line, e);
            }
        }
        aliases
    }

    pub fn save_aliases(&self, aliases: &AliasManager) -> Result<(), ConfigError> {
        let mut content = String::new();
        for (name, target) in aliases.iter() {
            content.push_str(name);
            content.push('=');
            content.push_str(target);
            content.push('\n');
        }
        self.write(&self.paths.alias_path, &content)
    }

    pub fn load_theme(&self) -> Theme {
        read_if_exists(&self.paths.theme_path)
            .and_then(|content| match Theme::parse(&content) {
                Ok(theme) => Some(theme),
                Err(e) => {
                    warn!("ignoring theme file: {}", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: &Theme) -> Result<(), ConfigError> {
        self.write(&self.paths.theme_path, &theme.serialize())
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

fn read_if_exists(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!("failed to read {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths() -> (tempfile::TempDir, ConfigPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        (dir, paths)
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let (_dir, paths) = temp_paths();
        let loader = ConfigLoader::new(&paths);

        assert!(loader.load_aliases().is_empty());
        assert_eq!(loader.load_theme(), Theme::DARK);
    }

    #[test]
    fn test_alias_file_round_trip() {
        let (_dir, paths) = temp_paths();
        let loader = ConfigLoader::new(&paths);

        let mut aliases = AliasManager::new();
        aliases.add("gg", "echo").unwrap();
        aliases.add("t", "time").unwrap();
        loader.save_aliases(&aliases).unwrap();

        assert_eq!(fs::read_to_string(&paths.alias_path).unwrap(), "gg=echo\nt=time\n");
        let loaded = loader.load_aliases();
        assert_eq!(loaded.get("gg"), Some("echo"));
        assert_eq!(loaded.get("t"), Some("time"));
    }

    #[test]
    fn test_corrupt_alias_rows_are_skipped() {
        let (_dir, paths) = temp_paths();
        fs::write(&paths.alias_path, "garbage\nok=echo\n=\n").unwrap();

        let loaded = ConfigLoader::new(&paths).load_aliases();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("ok"), Some("echo"));
    }

    #[test]
    fn test_theme_round_trip_and_corruption() {
        let (_dir, paths) = temp_paths();
        let loader = ConfigLoader::new(&paths);

        loader.save_theme(&Theme::LIGHT).unwrap();
        assert_eq!(loader.load_theme(), Theme::LIGHT);

        fs::write(&paths.theme_path, "current_theme 99 nope").unwrap();
        assert_eq!(loader.load_theme(), Theme::DARK);
    }

    #[test]
    fn test_save_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path().join("nested"));
        ConfigLoader::new(&paths).save_theme(&Theme::DARK).unwrap();
        assert!(paths.theme_path.exists());
    }
}
