//! Light/dark theme preference
//!
//! The browser keeps the persisted choice; this module models the same
//! rules as plain values so the generator can render the initial theme and
//! the rules can be tested. Nothing here touches storage: callers pass the
//! saved value in and persist whatever `apply`/`toggle` return.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown theme: {0:?}")]
pub struct UnknownTheme(pub String);

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Theme matching the display-mode signal
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The applied theme plus the persisted choice, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePreference {
    saved: Option<Theme>,
    current: Theme,
}

impl ThemePreference {
    /// Start from a persisted value, falling back to the display mode when
    /// nothing usable was saved
    pub fn load(saved: Option<&str>, system_dark: bool) -> Self {
        let saved = saved.and_then(|s| match s.parse::<Theme>() {
            Ok(theme) => Some(theme),
            Err(e) => {
                tracing::debug!("Ignoring saved theme: {}", e);
                None
            }
        });
        let current = saved.unwrap_or_else(|| Theme::from_system(system_dark));
        Self { saved, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn saved(&self) -> Option<Theme> {
        self.saved
    }

    /// Make `theme` current and persisted. Returns the value to store.
    pub fn apply(&mut self, theme: Theme) -> Theme {
        self.current = theme;
        self.saved = Some(theme);
        theme
    }

    /// Switch to the other theme and persist it
    pub fn toggle(&mut self) -> Theme {
        self.apply(self.current.toggled())
    }

    /// Follow a display-mode change unless the user has chosen a theme.
    /// Returns the new theme when it was followed.
    pub fn on_system_change(&mut self, system_dark: bool) -> Option<Theme> {
        if self.saved.is_some() {
            return None;
        }
        self.current = Theme::from_system(system_dark);
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_prefers_saved_value() {
        let pref = ThemePreference::load(Some("dark"), false);
        assert_eq!(pref.current(), Theme::Dark);
        assert_eq!(pref.saved(), Some(Theme::Dark));
    }

    #[test]
    fn test_load_falls_back_to_system() {
        assert_eq!(ThemePreference::load(None, true).current(), Theme::Dark);
        assert_eq!(ThemePreference::load(None, false).current(), Theme::Light);

        let pref = ThemePreference::load(Some("sepia"), true);
        assert_eq!(pref.current(), Theme::Dark);
        assert_eq!(pref.saved(), None);
    }

    #[test]
    fn test_toggle_persists() {
        let mut pref = ThemePreference::load(None, false);
        assert_eq!(pref.toggle(), Theme::Dark);
        assert_eq!(pref.saved(), Some(Theme::Dark));
        assert_eq!(pref.toggle(), Theme::Light);
        assert_eq!(pref.current(), Theme::Light);
    }

    #[test]
    fn test_system_change_only_without_saved_choice() {
        let mut pref = ThemePreference::load(None, false);
        assert_eq!(pref.on_system_change(true), Some(Theme::Dark));
        assert_eq!(pref.current(), Theme::Dark);

        pref.apply(Theme::Light);
        assert_eq!(pref.on_system_change(true), None);
        assert_eq!(pref.current(), Theme::Light);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert_eq!(
            "blue".parse::<Theme>(),
            Err(UnknownTheme("blue".to_string()))
        );
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
