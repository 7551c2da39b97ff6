use std::collections::BTreeMap;

use crate::core::commands::CommandError;

/// Maps a short name to the name of another command.
///
/// Expansion replaces only the first token and happens exactly once, so an
/// alias pointing at another alias is not followed.
#[derive(Debug, Default, Clone)]
pub struct AliasManager {
    aliases: BTreeMap<String, String>,
}

impl AliasManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, target: &str) -> Result<(), CommandError> {
        let name = name.trim();
        let target = target.trim();
        if name.is_empty()
            || target.is_empty()
            || name.contains(char::is_whitespace)
            || name.contains('=')
        {
            return Err(CommandError::MalformedAlias(format!("{}={}", name, target)));
        }
        if target.contains(char::is_whitespace) {
            return Err(CommandError::MalformedAlias(format!(
                "{}={} (target must be a single command name)",
                name, target
            )));
        }

        self.aliases.insert(name.to_string(), target.to_string());
        Ok(())
    }

    /// Parses a `name=target` definition.
    pub fn add_definition(&mut self, definition: &str) -> Result<(), CommandError> {
        let (name, target) = definition
            .split_once('=')
            .ok_or_else(|| CommandError::MalformedAlias(definition.to_string()))?;
        let target = target.trim().trim_matches(|c| c == '\'' || c == '"');
        self.add(name, target)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Substitutes the head token if it names an alias.
    pub fn expand_head<'a>(&'a self, head: &'a str) -> &'a str {
        self.get(head).unwrap_or(head)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
