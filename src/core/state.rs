use std::sync::{Arc, Mutex};

use log::warn;

use super::commands::CommandError;
use super::config::{AliasManager, Config, Theme};
use crate::input::History;
use crate::runtime::Metrics;

/// Mutable state shared by the input loop, the scheduler and pool workers.
///
/// Each structure has its own lock; holders keep it only for the read or
/// mutation, never across command output or blocking waits.
#[derive(Clone)]
pub struct ShellState {
    pub config: Arc<Config>,
    pub history: Arc<Mutex<History>>,
    pub aliases: Arc<Mutex<AliasManager>>,
    pub theme: Arc<Mutex<Theme>>,
    pub metrics: Arc<Mutex<Metrics>>,
}

impl ShellState {
    /// Loads persisted history, aliases and theme, falling back to defaults.
    pub fn load(config: Config) -> Self {
        let loader = config.loader();
        let aliases = loader.load_aliases();
        let theme = loader.load_theme();
        let history = History::with_file(config.paths.history_path.clone(), config.history_capacity);

        ShellState {
            history: Arc::new(Mutex::new(history)),
            aliases: Arc::new(Mutex::new(aliases)),
            theme: Arc::new(Mutex::new(theme)),
            metrics: Arc::new(Mutex::new(Metrics::new())),
            config: Arc::new(config),
        }
    }

    /// Writes the alias table to disk. Failures are logged, not returned.
    pub fn persist_aliases(&self) -> Result<(), CommandError> {
        let snapshot = self
            .aliases
            .lock()
            .map_err(|_| CommandError::Execution("Failed to lock aliases".to_string()))?
            .clone();
        if let Err(e) = self.config.loader().save_aliases(&snapshot) {
            warn!("failed to save aliases: {}", e);
        }
        Ok(())
    }

    pub fn persist_theme(&self) -> Result<(), CommandError> {
        let theme = *self
            .theme
            .lock()
            .map_err(|_| CommandError::Execution("Failed to lock theme".to_string()))?;
        if let Err(e) = self.config.loader().save_theme(&theme) {
            warn!("failed to save theme: {}", e);
        }
        Ok(())
    }

    pub fn current_theme(&self) -> Theme {
        self.theme.lock().map(|t| *t).unwrap_or_default()
    }

    /// Records a submitted line; persisting failures are logged.
    pub fn record_history(&self, line: &str) {
        match self.history.lock() {
            Ok(mut history) => {
                if let Err(e) = history.add(line) {
                    warn!("couldn't save history: {}", e);
                }
            }
            Err(_) => warn!("history lock poisoned, line not recorded"),
        }
    }

    pub fn history_snapshot(&self) -> Vec<String> {
        self.history.lock().map(|h| h.snapshot()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigPaths;
    use std::fs;

    #[test]
    fn test_load_from_empty_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = ShellState::load(Config::with_paths(ConfigPaths::in_dir(dir.path())));

        assert!(state.history_snapshot().is_empty());
        assert!(state.aliases.lock().unwrap().is_empty());
        assert_eq!(state.current_theme(), Theme::DARK);
    }

    #[test]
    fn test_load_existing_state() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        fs::write(&paths.history_path, "echo one\ntime\n").unwrap();
        fs::write(&paths.alias_path, "gg=echo\n").unwrap();
        fs::write(&paths.theme_path, "current_theme 0 7 0 7").unwrap();

        let state = ShellState::load(Config::with_paths(paths));
        assert_eq!(state.history_snapshot(), vec!["echo one", "time"]);
        assert_eq!(state.aliases.lock().unwrap().get("gg"), Some("echo"));
        assert_eq!(state.current_theme(), Theme::LIGHT);
    }

    #[test]
    fn test_persist_aliases_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());
        let state = ShellState::load(Config::with_paths(paths.clone()));

        state.aliases.lock().unwrap().add("t", "time").unwrap();
        state.persist_aliases().unwrap();
        assert_eq!(fs::read_to_string(paths.alias_path).unwrap(), "t=time\n");
    }

    #[test]
    fn test_record_history() {
        let dir = tempfile::tempdir().unwrap();
        let state = ShellState::load(Config::with_paths(ConfigPaths::in_dir(dir.path())));
        state.record_history("echo hi");
        state.record_history("   ");
        assert_eq!(state.history_snapshot(), vec!["echo hi"]);
    }
}
