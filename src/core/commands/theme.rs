use std::io::Write;

use super::{Command, CommandError};
use crate::core::config::Theme;
use crate::core::state::ShellState;
use crate::highlight::Painter;

const USAGE: &str = "theme [dark | light | custom <prompt-fg> <prompt-bg> <text-fg> <text-bg>]";

#[derive(Clone)]
pub struct ThemeCommand {
    state: ShellState,
}

impl ThemeCommand {
    pub fn new(state: ShellState) -> Self {
        Self { state }
    }

    fn parse_custom(args: &[String]) -> Result<Theme, CommandError> {
        let mut slots = [0u8; 4];
        for (slot, arg) in slots.iter_mut().zip(args) {
            *slot = arg
                .parse()
                .map_err(|_| CommandError::InvalidArguments(USAGE.to_string()))?;
        }
        Theme::custom(slots).map_err(|e| CommandError::Execution(e.to_string()))
    }
}

impl Command for ThemeCommand {
    fn help(&self) -> &str {
        "Show or switch the colour theme"
    }

    fn usage(&self) -> &str {
        USAGE
    }

    fn validate(&self, args: &[String]) -> bool {
        match args.first().map(String::as_str) {
            None => true,
            Some("dark") | Some("light") => args.len() == 1,
            Some("custom") => args.len() == 5,
            Some(_) => false,
        }
    }

    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let Some(choice) = args.first() else {
            let theme = self.state.current_theme();
            writeln!(out, "current theme: {}", theme)?;
            writeln!(out, "sample: {}", Painter::new(theme).prompt("aether > "))?;
            return Ok(());
        };

        let theme = match choice.as_str() {
            "custom" => Self::parse_custom(&args[1..])?,
            name => Theme::preset(name).ok_or_else(|| CommandError::InvalidArguments(USAGE.to_string()))?,
        };

        *self
            .state
            .theme
            .lock()
            .map_err(|_| CommandError::Execution("Failed to lock theme".to_string()))? = theme;
        self.state.persist_theme()?;

        writeln!(out, "switched to {} theme ({})", choice, theme)?;
        Ok(())
    }

    fn completions(&self, prefix: &str) -> Vec<String> {
        ["dark", "light", "custom"]
            .iter()
            .filter(|s| s.starts_with(prefix))
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::commands::CommandError;
    use crate::core::config::Theme;
    use crate::core::dispatch::tests::Harness;
    use std::fs;

    #[test]
    fn test_switch_to_light_persists() {
        let h = Harness::new();
        h.output("theme light");

        let state = h.dispatcher.state();
        assert_eq!(state.current_theme(), Theme::LIGHT);
        let saved = fs::read_to_string(&state.config.paths.theme_path).unwrap();
        assert_eq!(Theme::parse(&saved).unwrap(), Theme::LIGHT);
    }

    #[test]
    fn test_custom_theme() {
        let h = Harness::new();
        h.output("theme custom 1 2 3 4");
        assert_eq!(h.dispatcher.state().current_theme().slots(), [1, 2, 3, 4]);

        let (_, report) = h.run("theme custom 1 2 3 16");
        assert!(matches!(report.error, Some(CommandError::Execution(_))));
        let (_, report) = h.run("theme custom 1 2 3 x");
        assert!(matches!(report.error, Some(CommandError::InvalidArguments(_))));
        assert_eq!(h.dispatcher.state().current_theme().slots(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_show_current() {
        let h = Harness::new();
        assert!(h.output("theme").starts_with("current theme: prompt 10/0, text 7/0"));
    }

    #[test]
    fn test_unknown_theme() {
        let h = Harness::new();
        let (_, report) = h.run("theme solarized");
        assert!(matches!(report.error, Some(CommandError::InvalidArguments(_))));
    }
}
