//! Site configuration module.
//!
//! Handles loading, validating, and merging `folio.toml`. The file lives in
//! the site root and is sparse: stock defaults are the base layer and the
//! user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! data_dir = "data"          # JSON content files, relative to the site root
//!
//! [logo]
//! text = "Johann Cardenas"   # Used when navigation.json has no logo
//! url = "index.html"
//!
//! [headings]
//! other_posts = "More from the Blog"
//! other_projects = "Other Projects"
//!
//! [theme]
//! default = "light"          # Applied when no preference is stored
//! storage_key = "theme-preference"
//! store = ".folio-prefs.json"
//! transition_ms = 350
//! toggle_button = true
//!
//! [colors.light]
//! background = "#f7f5f2"
//! text = "#2d2d2d"
//! text_muted = "#6b6b6b"
//! border = "#ddd6cc"
//! link = "#4a4a4a"
//! link_hover = "#8b7355"
//! accent = "#c9a96e"
//!
//! [colors.dark]
//! background = "#1c1b19"
//! text = "#ececec"
//! text_muted = "#a39e96"
//! border = "#3a3733"
//! link = "#d6d2cb"
//! link_hover = "#e0c48f"
//! accent = "#c9a96e"
//!
//! [interaction]
//! reveal_threshold = 0.01
//! reveal_margin_px = 280
//! ripple_ms = 600
//! scroll_offset_px = 100
//! scroll_ms = 600
//!
//! [processing]
//! max_processes = 4          # Max parallel page renders (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the site root.
pub const CONFIG_FILE: &str = "folio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `folio.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the JSON content files, relative to the site root.
    pub data_dir: String,
    /// Logo used when `navigation.json` does not carry one.
    pub logo: LogoConfig,
    /// Section headings for "other items" listings.
    pub headings: HeadingsConfig,
    /// Theme preference handling.
    pub theme: ThemeConfig,
    /// Color schemes for light and dark themes.
    pub colors: ColorConfig,
    /// Timings and thresholds for the interaction layer.
    pub interaction: InteractionConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            logo: LogoConfig::default(),
            headings: HeadingsConfig::default(),
            theme: ThemeConfig::default(),
            colors: ColorConfig::default(),
            interaction: InteractionConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.trim().is_empty() {
            return Err(ConfigError::Validation("data_dir must not be empty".into()));
        }
        if self.theme.storage_key.is_empty() {
            return Err(ConfigError::Validation(
                "theme.storage_key must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.interaction.reveal_threshold) {
            return Err(ConfigError::Validation(
                "interaction.reveal_threshold must be between 0 and 1".into(),
            ));
        }
        if self.interaction.reveal_selectors.is_empty() {
            return Err(ConfigError::Validation(
                "interaction.reveal_selectors must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    pub text: String,
    pub url: String,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            text: "Johann Cardenas".to_string(),
            url: "index.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeadingsConfig {
    /// Heading above the blog cards on a post page.
    pub other_posts: String,
    /// Heading above the project cards on a project page.
    pub other_projects: String,
}

impl Default for HeadingsConfig {
    fn default() -> Self {
        Self {
            other_posts: "More from the Blog".to_string(),
            other_projects: "Other Projects".to_string(),
        }
    }
}

/// Theme preference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Theme used when nothing valid is stored. System preference is never
    /// consulted.
    pub default: Theme,
    /// Key the preference is stored under.
    pub storage_key: String,
    /// Preference store file, relative to the site root.
    pub store: String,
    /// How long the `theme-transition` class stays on after a toggle.
    pub transition_ms: u64,
    /// Append the toggle button to every page body.
    pub toggle_button: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: Theme::Light,
            storage_key: "theme-preference".to_string(),
            store: ".folio-prefs.json".to_string(),
            transition_ms: 350,
            toggle_button: true,
        }
    }
}

/// Color configuration for light and dark themes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// One palette, emitted as `--color-*` custom properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Muted/secondary text (meta lines, captions).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Highlight for tags, buttons and the active menu entry.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f7f5f2".to_string(),
            text: "#2d2d2d".to_string(),
            text_muted: "#6b6b6b".to_string(),
            border: "#ddd6cc".to_string(),
            link: "#4a4a4a".to_string(),
            link_hover: "#8b7355".to_string(),
            accent: "#c9a96e".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1c1b19".to_string(),
            text: "#ececec".to_string(),
            text_muted: "#a39e96".to_string(),
            border: "#3a3733".to_string(),
            link: "#d6d2cb".to_string(),
            link_hover: "#e0c48f".to_string(),
            accent: "#c9a96e".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Interaction layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Fraction of an element that must be visible to trigger a reveal.
    pub reveal_threshold: f64,
    /// Elements this far below the viewport already count as visible, so
    /// fast scrolling doesn't outrun the animation.
    pub reveal_margin_px: u32,
    /// Selectors whose matches are enrolled for reveal-on-scroll.
    pub reveal_selectors: Vec<String>,
    /// Lifetime of a click ripple.
    pub ripple_ms: u64,
    /// Space kept above an anchor target after a smooth scroll.
    pub scroll_offset_px: u32,
    /// Duration of the smooth-scroll animation.
    pub scroll_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: 0.01,
            reveal_margin_px: 280,
            reveal_selectors: [
                ".box",
                ".project-card",
                ".blog-card",
                "#main section",
                "#intro section",
                "ul.dates li",
                "ul.divided li",
                ".row > [class*=\"col-\"]",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ripple_ms: 600,
            scroll_offset_px: 100,
            scroll_ms: 600,
        }
    }
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of pages rendered in parallel.
    /// When absent, defaults to the number of CPU cores.
    pub max_processes: Option<usize>,
}

/// Worker count for page rendering: the configured cap, never more than the
/// machine's cores.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config: {e}")))
}

/// Layer `overlay` onto `base`.
///
/// Tables merge key by key, recursing into nested tables; any other value in
/// `overlay` (arrays included) replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `folio.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `folio.toml` in the site root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `folio.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory holding navigation.json, footer.json, blog-posts.json,
# projects.json and news.json, relative to the site root.
data_dir = "data"

# ---------------------------------------------------------------------------
# Header logo (used when navigation.json has no "logo" entry)
# ---------------------------------------------------------------------------
[logo]
text = "Johann Cardenas"
url = "index.html"

# ---------------------------------------------------------------------------
# Listing headings
# ---------------------------------------------------------------------------
[headings]
other_posts = "More from the Blog"
other_projects = "Other Projects"

# ---------------------------------------------------------------------------
# Theme preference
# ---------------------------------------------------------------------------
[theme]
# "light" or "dark". The OS color scheme is never consulted.
default = "light"
storage_key = "theme-preference"
# Preference store, relative to the site root.
store = ".folio-prefs.json"
# How long the theme-transition class stays on after a toggle.
transition_ms = 350
toggle_button = true

# ---------------------------------------------------------------------------
# Colors - emitted as CSS custom properties keyed on [data-theme]
# ---------------------------------------------------------------------------
[colors.light]
background = "#f7f5f2"
text = "#2d2d2d"
text_muted = "#6b6b6b"
border = "#ddd6cc"
link = "#4a4a4a"
link_hover = "#8b7355"
accent = "#c9a96e"

[colors.dark]
background = "#1c1b19"
text = "#ececec"
text_muted = "#a39e96"
border = "#3a3733"
link = "#d6d2cb"
link_hover = "#e0c48f"
accent = "#c9a96e"

# ---------------------------------------------------------------------------
# Interaction layer
# ---------------------------------------------------------------------------
[interaction]
reveal_threshold = 0.01
reveal_margin_px = 280
reveal_selectors = [
    ".box",
    ".project-card",
    ".blog-card",
    "#main section",
    "#intro section",
    "ul.dates li",
    "ul.divided li",
    '.row > [class*="col-"]',
]
ripple_ms = 600
scroll_offset_px = 100
scroll_ms = 600

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum pages rendered in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties for both themes.
///
/// Light is the `:root` default; dark applies only when the document
/// carries `data-theme="dark"`.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
{light}}}

[data-theme="dark"] {{
{dark}}}
"#,
        light = scheme_properties(&colors.light),
        dark = scheme_properties(&colors.dark),
    )
}

fn scheme_properties(scheme: &ColorScheme) -> String {
    [
        ("--color-bg", &scheme.background),
        ("--color-text", &scheme.text),
        ("--color-text-muted", &scheme.text_muted),
        ("--color-border", &scheme.border),
        ("--color-link", &scheme.link),
        ("--color-link-hover", &scheme.link_hover),
        ("--color-accent", &scheme.accent),
    ]
    .iter()
    .map(|(name, value)| format!("    {name}: {value};\n"))
    .collect()
}
