use std::fmt;

use super::ConfigError;

/// Highest console colour code accepted in a theme slot.
pub const MAX_COLOR: u8 = 15;

/// Colour codes (0 to 15) for the prompt and for regular output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub prompt_fg: u8,
    pub prompt_bg: u8,
    pub default_fg: u8,
    pub default_bg: u8,
}

impl Theme {
    pub const DARK: Theme = Theme {
        prompt_fg: 10,
        prompt_bg: 0,
        default_fg: 7,
        default_bg: 0,
    };

    pub const LIGHT: Theme = Theme {
        prompt_fg: 0,
        prompt_bg: 7,
        default_fg: 0,
        default_bg: 7,
    };

    pub fn custom(slots: [u8; 4]) -> Result<Self, ConfigError> {
        if let Some(bad) = slots.iter().find(|&&c| c > MAX_COLOR) {
            return Err(ConfigError::MalformedTheme(format!(
                "colour {} is outside 0-{}",
                bad, MAX_COLOR
            )));
        }
        let [prompt_fg, prompt_bg, default_fg, default_bg] = slots;
        Ok(Theme {
            prompt_fg,
            prompt_bg,
            default_fg,
            default_bg,
        })
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::DARK),
            "light" => Some(Self::LIGHT),
            _ => None,
        }
    }

    pub fn slots(&self) -> [u8; 4] {
        [self.prompt_fg, self.prompt_bg, self.default_fg, self.default_bg]
    }

    /// Reads `<name> <prompt-fg> <prompt-bg> <default-fg> <default-bg>`,
    /// whitespace separated.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut tokens = content.split_whitespace();
        tokens
            .next()
            .ok_or_else(|| ConfigError::MalformedTheme("empty theme file".to_string()))?;

        let mut slots = [0u8; 4];
        for slot in slots.iter_mut() {
            let token = tokens
                .next()
                .ok_or_else(|| ConfigError::MalformedTheme("missing colour slot".to_string()))?;
            *slot = token
                .parse()
                .map_err(|_| ConfigError::MalformedTheme(format!("invalid colour: {}", token)))?;
        }
        Self::custom(slots)
    }

    pub fn serialize(&self) -> String {
        let mut out = String::from("current_theme\n");
        for code in self.slots() {
            out.push_str(&code.to_string());
            out.push('\n');
        }
        out
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prompt {}/{}, text {}/{}",
            self.prompt_fg, self.prompt_bg, self.default_fg, self.default_bg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip() {
        let theme = Theme::custom([1, 2, 3, 4]).unwrap();
        assert_eq!(Theme::parse(&theme.serialize()).unwrap(), theme);
    }

    #[test]
    fn test_parse_slot_order() {
        let theme = Theme::parse("mine 12 0 7 1").unwrap();
        assert_eq!(theme.prompt_fg, 12);
        assert_eq!(theme.prompt_bg, 0);
        assert_eq!(theme.default_fg, 7);
        assert_eq!(theme.default_bg, 1);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Theme::parse("").is_err());
        assert!(Theme::parse("t 1 2 3").is_err());
        assert!(Theme::parse("t 1 2 x 4").is_err());
        assert!(Theme::parse("t 1 2 3 16").is_err());
    }

    #[test]
    fn test_presets() {
        assert_eq!(Theme::preset("dark"), Some(Theme::DARK));
        assert_eq!(Theme::preset("light"), Some(Theme::LIGHT));
        assert_eq!(Theme::preset("neon"), None);
        assert_eq!(Theme::default(), Theme::DARK);
    }
}
