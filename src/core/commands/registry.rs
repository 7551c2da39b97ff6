use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use super::Command;

/// Name → command mapping. Lookups are exact and case-sensitive.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<BTreeMap<String, Arc<dyn Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `command` under `name`, replacing any previous entry.
    pub fn register<C>(&self, name: impl Into<String>, command: C) -> Option<Arc<dyn Command>>
    where
        C: Command + 'static,
    {
        self.register_arc(name, Arc::new(command))
    }

    pub fn register_arc(
        &self,
        name: impl Into<String>,
        command: Arc<dyn Command>,
    ) -> Option<Arc<dyn Command>> {
        let name = name.into();
        debug!("registering command {:?}", name);
        self.commands
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, command)
    }

    /// The returned handle is independent of the registry lock.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Sorted command names.
    pub fn names(&self) -> Vec<String> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> Vec<(String, Arc<dyn Command>)> {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, cmd)| (name.clone(), Arc::clone(cmd)))
            .collect()
    }
}
