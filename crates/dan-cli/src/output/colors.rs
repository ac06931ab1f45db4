//! ANSI styling for terminal output.
//!
//! `DANWORLD_COLOR=always|never` overrides detection. Otherwise styling is
//! off when `NO_COLOR` is set or either stream is redirected.

use std::env;
use std::io::{self, IsTerminal};

#[derive(Debug, Clone, Copy)]
enum Style {
    Bold,
    Dim,
    Red,
    Green,
    Yellow,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Bold => "1",
            Style::Dim => "2",
            Style::Red => "31",
            Style::Green => "32",
            Style::Yellow => "33",
        }
    }
}

/// Whether output should carry escape codes
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    pub fn detect() -> Self {
        let enabled = match env::var("DANWORLD_COLOR").as_deref() {
            Ok("always") => true,
            Ok("never") => false,
            _ => {
                env::var_os("NO_COLOR").is_none()
                    && io::stdout().is_terminal()
                    && io::stderr().is_terminal()
            },
        };
        Self { enabled }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    fn apply(&self, style: Style, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("\x1b[{}m{}\x1b[0m", style.code(), text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.apply(Style::Bold, text)
    }

    /// Secondary text such as hints and labels
    pub fn dim(&self, text: &str) -> String {
        self.apply(Style::Dim, text)
    }

    pub fn red(&self, text: &str) -> String {
        self.apply(Style::Red, text)
    }

    pub fn green(&self, text: &str) -> String {
        self.apply(Style::Green, text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.apply(Style::Yellow, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_leaves_text_alone() {
        let colors = ColorSupport::disabled();
        assert_eq!(colors.red("error"), "error");
        assert_eq!(colors.bold("chunks"), "chunks");
    }

    #[test]
    fn test_enabled_wraps_in_escape_codes() {
        let colors = ColorSupport { enabled: true };
        assert_eq!(colors.green("ok"), "\x1b[32mok\x1b[0m");
        assert_eq!(colors.dim("help"), "\x1b[2mhelp\x1b[0m");
    }
}
