/*
 * Theme modes requested by the host and the concrete theme the control ends up
 * applying. Resolution is a pure function of the requested mode and the OS
 * color-scheme preference; the `auto` mode is the only one that consults it.
 */
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn follows_os(self) -> bool {
        self == ThemeMode::Auto
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::Auto => write!(f, "auto"),
        }
    }
}

impl fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedTheme::Light => write!(f, "light"),
            ResolvedTheme::Dark => write!(f, "dark"),
        }
    }
}

pub fn resolve_theme(mode: ThemeMode, os_prefers_dark: bool) -> ResolvedTheme {
    match mode {
        ThemeMode::Light => ResolvedTheme::Light,
        ThemeMode::Dark => ResolvedTheme::Dark,
        ThemeMode::Auto if os_prefers_dark => ResolvedTheme::Dark,
        ThemeMode::Auto => ResolvedTheme::Light,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_modes_ignore_os_preference() {
        for os_dark in [false, true] {
            assert_eq!(resolve_theme(ThemeMode::Light, os_dark), ResolvedTheme::Light);
            assert_eq!(resolve_theme(ThemeMode::Dark, os_dark), ResolvedTheme::Dark);
        }
    }

    #[test]
    fn test_auto_follows_os_preference() {
        assert_eq!(resolve_theme(ThemeMode::Auto, true), ResolvedTheme::Dark);
        assert_eq!(resolve_theme(ThemeMode::Auto, false), ResolvedTheme::Light);
    }

    #[test]
    fn test_theme_mode_serde_names() {
        let mode: ThemeMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(mode, ThemeMode::Auto);
        assert_eq!(serde_json::to_string(&ThemeMode::Dark).unwrap(), "\"dark\"");
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
    }
}
