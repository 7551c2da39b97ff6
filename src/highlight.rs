use inksac::prelude::*;

use crate::core::config::Theme;

/// RGB values of the sixteen classic console colours, indexed by code.
const PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (0, 0, 128),
    (0, 128, 0),
    (0, 128, 128),
    (128, 0, 0),
    (128, 0, 128),
    (128, 128, 0),
    (192, 192, 192),
    (128, 128, 128),
    (0, 0, 255),
    (0, 255, 0),
    (0, 255, 255),
    (255, 0, 0),
    (255, 0, 255),
    (255, 255, 0),
    (255, 255, 255),
];

fn color(code: u8) -> Color {
    let (r, g, b) = PALETTE[usize::from(code) % PALETTE.len()];
    Color::RGB(r, g, b)
}

/// Renders shell text in the active theme's colours.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    theme: Theme,
    color_support: ColorSupport,
}

impl Painter {
    pub fn new(theme: Theme) -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self::with_support(theme, support)
    }

    pub fn with_support(theme: Theme, color_support: ColorSupport) -> Self {
        Self {
            theme,
            color_support,
        }
    }

    pub fn plain(theme: Theme) -> Self {
        Self::with_support(theme, ColorSupport::NoColor)
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    pub fn prompt(&self, prompt: &str) -> String {
        if !self.enabled() {
            return prompt.to_string();
        }

        let style = Style::builder()
            .foreground(color(self.theme.prompt_fg))
            .background(color(self.theme.prompt_bg))
            .bold()
            .build();
        prompt.style(style).to_string()
    }

    pub fn text(&self, text: &str) -> String {
        if !self.enabled() {
            return text.to_string();
        }

        let style = Style::builder()
            .foreground(color(self.theme.default_fg))
            .background(color(self.theme.default_bg))
            .build();
        text.style(style).to_string()
    }

    pub fn error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let style = Style::builder().foreground(Color::Red).bold().build();
        error.style(style).to_string()
    }

    pub fn hint(&self, hint: &str) -> String {
        if !self.enabled() {
            return hint.to_string();
        }

        let style = Style::builder().foreground(color(8)).build();
        hint.style(style).to_string()
    }
}
