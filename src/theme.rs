//! Light/dark theme preference.
//!
//! The preference is a single key holding the literal string `light` or
//! `dark`. Anything else (including nothing) means the configured default;
//! the OS color scheme is never consulted. Applying a theme sets the
//! document's `data-theme` attribute and writes the preference back, so the
//! stored value always matches what is applied.
//!
//! Time is passed in explicitly (`Instant`) so the transition window can be
//! driven by a host event loop or by tests.

use crate::page::Page;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Class held on the document while a theme change animates.
pub const TRANSITION_CLASS: &str = "theme-transition";
/// Attribute carrying the applied theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown theme '{0}' (expected 'light' or 'dark')")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Accessible label for the toggle button while this theme is applied.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light mode",
            Theme::Light => "Switch to dark mode",
        }
    }

    fn tooltip(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to Light Mode",
            Theme::Light => "Switch to Dark Mode",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

// ============================================================================
// Preference storage
// ============================================================================

/// Persistent string key/value storage for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError>;
}

/// Preferences kept in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ThemeError> {
        let path = path.into();
        let values = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ThemeError> {
        self.values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

// ============================================================================
// Theme manager
// ============================================================================

/// Document-level theme state: what a browser would keep on `<html>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeState {
    /// Value of `data-theme`; `None` until a theme is applied.
    pub attribute: Option<Theme>,
    /// When the transition class comes off; `None` when not transitioning.
    pub transition_until: Option<Instant>,
    /// Current aria-label of the toggle button.
    pub toggle_label: Option<&'static str>,
}

/// Reads, applies, and persists the theme preference.
pub struct ThemeManager<S: PreferenceStore> {
    store: S,
    key: String,
    default: Theme,
    transition: Duration,
    state: ThemeState,
}

impl<S: PreferenceStore> ThemeManager<S> {
    pub fn new(store: S, key: impl Into<String>, default: Theme, transition: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            default,
            transition,
            state: ThemeState::default(),
        }
    }

    /// Build from the `[theme]` config section.
    pub fn from_config(store: S, config: &crate::config::ThemeConfig) -> Self {
        Self::new(
            store,
            config.storage_key.clone(),
            config.default,
            Duration::from_millis(config.transition_ms),
        )
    }

    /// Stored preference, or the default when unset or unrecognised.
    pub fn preferred(&self) -> Theme {
        self.store
            .get(&self.key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.default)
    }

    /// Apply the stored preference without a transition.
    pub fn init(&mut self, now: Instant) -> Result<Theme, ThemeError> {
        let theme = self.preferred();
        self.apply(theme, false, now)?;
        Ok(theme)
    }

    /// Theme currently applied to the document; the default when none is.
    pub fn current(&self) -> Theme {
        self.state.attribute.unwrap_or(self.default)
    }

    /// Persist, then set the document attribute and update the toggle label.
    ///
    /// Nothing changes when the preference cannot be saved.
    pub fn apply(&mut self, theme: Theme, with_transition: bool, now: Instant) -> Result<(), ThemeError> {
        self.store.set(&self.key, theme.as_str())?;
        if with_transition {
            self.state.transition_until = Some(now + self.transition);
        }
        self.state.attribute = Some(theme);
        self.state.toggle_label = Some(theme.toggle_label());
        tracing::debug!(theme = %theme, with_transition, "applied theme");
        Ok(())
    }

    /// Flip between light and dark, animated.
    pub fn toggle(&mut self, now: Instant) -> Result<Theme, ThemeError> {
        let next = self.current().toggled();
        self.apply(next, true, now)?;
        Ok(next)
    }

    /// True while the transition class should stay on the document.
    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.state.transition_until.is_some_and(|until| now < until)
    }

    /// Drop the transition class once its delay has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_transitioning(now) {
            self.state.transition_until = None;
        }
    }

    pub fn state(&self) -> &ThemeState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// The floating toggle button.
pub fn render_toggle_button(theme: Theme) -> Markup {
    html! {
        button.theme-toggle type="button" aria-label=(theme.toggle_label()) data-tooltip=(theme.tooltip()) {
            span.theme-toggle__icon {
                span.theme-toggle__sun { i.fas.fa-sun {} }
                span.theme-toggle__moon { i.fas.fa-moon {} }
            }
        }
    }
}

/// Stamp `theme` onto a page: `data-theme` on `<html>` and, when asked, a
/// toggle button appended to the body. A page that already has a toggle
/// button does not get a second one.
pub fn apply_to_page(page: &mut Page, theme: Theme, toggle_button: bool) {
    page.set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
    if toggle_button && !page.has_class("theme-toggle") {
        page.append_to_body(&render_toggle_button(theme).into_string());
    }
}
