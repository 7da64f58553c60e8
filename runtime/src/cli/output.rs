//! Console styling: ANSI colors that switch off for pipes and `NO_COLOR`.

use std::io::IsTerminal;

/// Check if color output is enabled for stdout.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

const RESET: &str = "\x1b[0m";

/// Colored string builder.
#[derive(Debug, Clone, Copy)]
pub struct Styled {
    use_color: bool,
}

impl Styled {
    /// Color when the terminal supports it, unless `force_plain`.
    pub fn new(force_plain: bool) -> Self {
        Self {
            use_color: !force_plain && color_enabled(),
        }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn colored() -> Self {
        Self { use_color: true }
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Wrap `s` in the SGR color `code` (e.g. 31 for red).
    pub fn ansi(&self, code: u8, s: &str) -> String {
        if self.use_color {
            format!("\x1b[{code}m{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    /// Color for the class at position `index`: cycles red through white.
    pub fn class_color(&self, index: usize, s: &str) -> String {
        self.ansi(class_color_code(index), s)
    }
}

/// SGR foreground code for the class at `index`, cycling 31..=37.
pub fn class_color_code(index: usize) -> u8 {
    31 + (index % 7) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_color_cycles() {
        assert_eq!(class_color_code(0), 31);
        assert_eq!(class_color_code(6), 37);
        assert_eq!(class_color_code(7), 31);
        assert_eq!(class_color_code(9), 33);
    }

    #[test]
    fn test_plain_and_colored() {
        assert_eq!(Styled::plain().class_color(0, "hi"), "hi");
        assert_eq!(Styled::colored().class_color(1, "hi"), "\x1b[32mhi\x1b[0m");
        assert!(!Styled::new(true).use_color());
    }

    #[test]
    fn test_only_no_color_env_disables_color() {
        std::env::set_var("CENSUS_NO_COLOR", "1");
        if std::env::var_os("NO_COLOR").is_none() {
            assert_eq!(color_enabled(), std::io::stdout().is_terminal());
        }
        std::env::remove_var("CENSUS_NO_COLOR");
    }
}
