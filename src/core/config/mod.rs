use std::{fmt, io};

mod aliases;
mod loader;
mod paths;
mod theme;

pub use aliases::AliasManager;
pub use loader::ConfigLoader;
pub use paths::{ConfigPaths, HOME_ENV};
pub use theme::{Theme, MAX_COLOR};

/// Maximum number of history lines kept in memory and on disk.
pub const HISTORY_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct Config {
    pub paths: ConfigPaths,
    pub history_capacity: usize,
    pub pool_size: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::with_paths(ConfigPaths::new())
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Config {
            paths,
            history_capacity: HISTORY_CAPACITY,
            pool_size: crate::runtime::POOL_SIZE,
        }
    }

    pub fn loader(&self) -> ConfigLoader<'_> {
        ConfigLoader::new(&self.paths)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    MalformedTheme(String),
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::MalformedTheme(msg) => write!(f, "malformed theme: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
