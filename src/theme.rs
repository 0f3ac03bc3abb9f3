//! Light/dark theme selection and toggle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::Document;
use crate::error::SiteError;
use crate::preferences::PreferenceStore;

/// Preference key holding the selected theme.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph for the toggle button. Shows the theme a click switches to:
    /// a sun while dark is active, a moon otherwise.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => "☀️",
            Theme::Light => "🌙",
        }
    }

    /// Resolve the initial theme from a stored value and the OS color scheme.
    ///
    /// Any stored value wins over the OS signal, and only `"dark"` selects
    /// dark; an unrecognised stored value resolves to light.
    pub fn resolve(stored: Option<&str>, system_prefers_dark: bool) -> Self {
        match stored.filter(|s| !s.is_empty()) {
            Some("dark") => Theme::Dark,
            Some(_) => Theme::Light,
            None if system_prefers_dark => Theme::Dark,
            None => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Applies the active theme to the document and flips it on toggle.
#[derive(Debug, Default)]
pub struct ThemeController {
    current: Theme,
}

impl ThemeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Resolve and apply the initial theme.
    ///
    /// The OS signal is a snapshot taken at load; later changes are not tracked.
    pub fn init(
        &mut self,
        doc: &mut Document,
        store: &dyn PreferenceStore,
        system_prefers_dark: bool,
    ) -> Theme {
        let stored = store.get(THEME_KEY);
        let theme = Theme::resolve(stored.as_deref(), system_prefers_dark);
        debug!(
            "Theme resolved to {} (stored: {:?}, system dark: {})",
            theme, stored, system_prefers_dark
        );
        self.apply(doc, theme);
        theme
    }

    /// Flip the theme, persist it, and update the marker and glyph.
    pub fn toggle(
        &mut self,
        doc: &mut Document,
        store: &mut dyn PreferenceStore,
    ) -> Result<Theme, SiteError> {
        let current = doc.data_theme().unwrap_or(self.current);
        let next = current.flipped();
        self.apply(doc, next);
        store.set(THEME_KEY, next.as_str())?;
        Ok(next)
    }

    fn apply(&mut self, doc: &mut Document, theme: Theme) {
        self.current = theme;
        doc.set_data_theme(theme);
        if let Some(toggle) = doc.theme_toggle_mut() {
            toggle.icon = theme.icon().to_string();
        }
    }
}
