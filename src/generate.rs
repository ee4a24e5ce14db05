//! Site build: render every page of a site directory into an output tree.
//!
//! ## Pipeline per page
//!
//! ```text
//! page.html ──► ComponentLoader   (placeholders ← data files)
//!           ──► theme             (data-theme on <html>, toggle button)
//!           ──► mobile nav panel  (Readiness resolved, queued rebuild runs)
//!           ──► dist/page.html
//! ```
//!
//! Pages are independent and rendered in parallel on the rayon pool. Every
//! file that is not an `.html` page is copied verbatim, except the site's
//! own `folio.toml` and theme preference store. A `theme.css` carrying the
//! configured color schemes is written at the output root.
//!
//! Missing or broken data never fails a build: the affected placeholders are
//! left in place and reported in the [`BuildSummary`].
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── theme.css                 # Generated from [colors]
//! ├── index.html                # Rendered
//! ├── blog/
//! │   └── first-post.html       # Rendered, links prefixed with ../
//! ├── assets/css/main.css       # Copied
//! └── data/*.json               # Copied
//! ```

use crate::components::RenderContext;
use crate::config::{self, ConfigError, SiteConfig};
use crate::interaction::{self, NavPanel, Readiness};
use crate::loader::{ComponentLoader, LoadReport};
use crate::page::Page;
use crate::source::DataSource;
use crate::theme::{self, Theme};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Name of the generated stylesheet at the output root.
pub const THEME_CSS: &str = "theme.css";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One rendered page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub html: String,
    pub report: LoadReport,
    /// Whether a mobile navigation panel was installed.
    pub nav_panel: bool,
}

/// Outcome of rendering one page during a build.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    /// Path relative to the site root, `/` separated.
    pub path: String,
    pub report: LoadReport,
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub theme: Theme,
    /// Rendered pages in path order.
    pub pages: Vec<PageResult>,
    /// Copied files, relative to the site root, in path order.
    pub copied: Vec<String>,
}

impl BuildSummary {
    /// Number of placeholders left unrendered across all pages.
    pub fn failed_placeholders(&self) -> usize {
        self.pages.iter().map(|p| p.report.failed.len()).sum()
    }
}

/// Run the full page pipeline over one document.
///
/// `rel_path` locates the page below the site root and drives the base
/// path, the current-page highlight and the "other items" exclusion.
pub fn render_page(
    html: &str,
    rel_path: &str,
    config: &SiteConfig,
    source: &dyn DataSource,
    theme: Theme,
) -> RenderedPage {
    let ctx = RenderContext::for_page(rel_path, config, theme);
    let mut page = Page::new(html);
    let mut panel: Readiness<NavPanel> = Readiness::new();

    let report = ComponentLoader::new(source, &ctx).load(&mut page, &mut panel);
    theme::apply_to_page(&mut page, ctx.theme, config.theme.toggle_button);
    let nav_panel = interaction::install_nav_panel(&mut page, &mut panel);

    for failure in &report.failed {
        tracing::warn!(page = rel_path, placeholder = %failure.placeholder, "left unrendered");
    }

    RenderedPage {
        html: page.into_string(),
        report,
        nav_panel,
    }
}

/// Render `site` into `output`.
pub fn build(
    site: &Path,
    output: &Path,
    config: &SiteConfig,
    source: &dyn DataSource,
    theme: Theme,
) -> Result<BuildSummary, GenerateError> {
    fs::create_dir_all(output)?;
    let site_root = site.canonicalize()?;
    let output_root = output.canonicalize()?;

    let mut pages = Vec::new();
    let mut copied = Vec::new();

    let walker = WalkDir::new(&site_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != output_root);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&site_root) else {
            continue;
        };
        if is_site_private(rel, config) {
            continue;
        }
        if is_page(rel) {
            pages.push(rel.to_path_buf());
        } else {
            copied.push(rel.to_path_buf());
        }
    }

    for rel in &copied {
        let dest = output_root.join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(site_root.join(rel), &dest)?;
        tracing::trace!(file = %rel.display(), "copied");
    }

    let results = pages
        .par_iter()
        .map(|rel| -> Result<PageResult, GenerateError> {
            let path = to_url_path(rel);
            let html = fs::read_to_string(site_root.join(rel))?;
            let rendered = render_page(&html, &path, config, source, theme);
            let dest = output_root.join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&dest, rendered.html)?;
            tracing::debug!(page = %path, rendered = rendered.report.rendered.len(), "wrote page");
            Ok(PageResult {
                path,
                report: rendered.report,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    fs::write(
        output_root.join(THEME_CSS),
        config::generate_color_css(&config.colors),
    )?;

    Ok(BuildSummary {
        output: output.to_path_buf(),
        theme,
        pages: results,
        copied: copied.iter().map(|p| to_url_path(p)).collect(),
    })
}

fn is_page(rel: &Path) -> bool {
    rel.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

/// Files at the site root that configure the build rather than ship with it.
fn is_site_private(rel: &Path, config: &SiteConfig) -> bool {
    rel == Path::new(config::CONFIG_FILE) || rel == Path::new(&config.theme.store)
}

fn to_url_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DirSource, MemorySource};
    use crate::test_helpers::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    fn fixture_config(site: &Path) -> SiteConfig {
        config::load_config(site).unwrap()
    }

    #[test]
    fn render_page_fills_and_stamps_theme() {
        let html = page_with(&["nav-placeholder", "footer-placeholder"]);
        let rendered = render_page(
            &html,
            "index.html",
            &SiteConfig::default(),
            &sample_source(),
            Theme::Dark,
        );

        assert!(rendered.report.is_clean());
        assert!(rendered.nav_panel);
        assert!(rendered.html.contains(r#"<html lang="en" data-theme="dark">"#));
        assert_count(&rendered.html, "theme-toggle\"", 1);
        assert_count(&rendered.html, r#"id="navPanel""#, 1);
        assert!(rendered.html.contains("nav-panel-group"));
    }

    #[test]
    fn render_page_without_toggle_button() {
        let mut config = SiteConfig::default();
        config.theme.toggle_button = false;
        let html = page_with(&["footer-placeholder"]);
        let rendered = render_page(&html, "index.html", &config, &sample_source(), Theme::Light);
        assert!(!rendered.html.contains("theme-toggle"));
        assert!(rendered.html.contains(r#"data-theme="light""#));
        assert!(!rendered.nav_panel);
    }

    #[test]
    fn render_page_with_no_data_keeps_placeholders() {
        let html = page_with(&["nav-placeholder", "footer-placeholder"]);
        let rendered = render_page(
            &html,
            "index.html",
            &SiteConfig::default(),
            &MemorySource::new(),
            Theme::Light,
        );
        assert_eq!(rendered.report.failed.len(), 2);
        assert!(rendered.html.contains(r#"<div id="nav-placeholder"></div>"#));
        assert!(rendered.html.contains(r#"<div id="footer-placeholder"></div>"#));
        assert!(!rendered.nav_panel);
    }

    #[test]
    fn build_renders_pages_and_copies_assets() {
        let site = setup_fixtures();
        let out = TempDir::new().unwrap();
        let config = fixture_config(site.path());
        let source = DirSource::new(site.path().join(&config.data_dir));

        let summary = build(site.path(), out.path(), &config, &source, Theme::Light).unwrap();

        assert_eq!(summary.failed_placeholders(), 0);
        let paths: Vec<&str> = summary.pages.iter().map(|p| p.path.as_str()).collect();
        assert!(paths.contains(&"index.html"));
        assert!(paths.contains(&"blog/first-post.html"));
        assert!(summary.copied.contains(&"assets/css/main.css".to_string()));
        assert!(!summary.copied.contains(&config::CONFIG_FILE.to_string()));

        assert!(out.path().join(THEME_CSS).exists());
        assert!(out.path().join("assets/css/main.css").exists());
        assert!(!out.path().join(config::CONFIG_FILE).exists());

        let post = fs::read_to_string(out.path().join("blog/first-post.html")).unwrap();
        assert!(!post.contains("-placeholder\""));
        assert!(post.contains(r#"href="../index.html""#));
    }

    #[test]
    fn build_uses_configured_headings() {
        let site = setup_fixtures();
        let out = TempDir::new().unwrap();
        let config = fixture_config(site.path());
        let source = DirSource::new(site.path().join(&config.data_dir));

        build(site.path(), out.path(), &config, &source, Theme::Light).unwrap();

        let project = fs::read_to_string(out.path().join("projects/asphera.html")).unwrap();
        assert!(project.contains("More Projects"));
        assert!(!project.contains(r#"href="../projects/asphera.html""#));
        assert!(project.contains(r#"href="../projects/ml-models.html""#));
    }

    #[test]
    fn build_reports_missing_data() {
        let site = setup_fixtures();
        fs::remove_file(site.path().join("data/footer.json")).unwrap();
        let out = TempDir::new().unwrap();
        let config = fixture_config(site.path());
        let source = DirSource::new(site.path().join(&config.data_dir));

        let summary = build(site.path(), out.path(), &config, &source, Theme::Light).unwrap();

        assert_eq!(summary.failed_placeholders(), summary.pages.len());
        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains(r#"<div id="footer-placeholder"></div>"#));
    }

    #[test]
    fn build_skips_output_inside_site() {
        let site = setup_fixtures();
        let out = site.path().join("dist");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.txt"), "old").unwrap();
        let config = fixture_config(site.path());
        let source = DirSource::new(site.path().join(&config.data_dir));

        let summary = build(site.path(), &out, &config, &source, Theme::Light).unwrap();

        assert!(summary.copied.iter().all(|p| !p.starts_with("dist/")));
        assert!(!out.join("dist").exists());
    }

    #[test]
    fn url_paths_use_forward_slashes() {
        let rel: PathBuf = ["blog", "first-post.html"].iter().collect();
        assert_eq!(to_url_path(&rel), "blog/first-post.html");
    }

    #[test]
    fn page_detection() {
        assert!(is_page(Path::new("index.html")));
        assert!(is_page(Path::new("old/PAGE.HTM")));
        assert!(!is_page(Path::new("assets/css/main.css")));
        assert!(!is_page(Path::new("README")));
    }

    // =========================================================================
    // Logging
    // =========================================================================

    /// Formatted log output, collected for assertions.
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        /// Number of captured lines logged at `level` (`"ERROR"`, `"WARN"`).
        fn count(&self, level: &str) -> usize {
            let buffer = self.0.lock().unwrap();
            String::from_utf8_lossy(&buffer)
                .lines()
                .filter(|line| line.trim_start().starts_with(level))
                .count()
        }
    }

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn render_logged(source: &MemorySource, ids: &[&str]) -> (RenderedPage, LogCapture) {
        let logs = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let html = page_with(ids);
        let rendered = tracing::subscriber::with_default(subscriber, || {
            render_page(&html, "index.html", &SiteConfig::default(), source, Theme::Light)
        });
        (rendered, logs)
    }

    #[test]
    fn failed_fetch_logs_one_error() {
        let source = sample_source().with_status("footer.json", 500);
        let (rendered, logs) = render_logged(&source, &["nav-placeholder", "footer-placeholder"]);

        assert_eq!(rendered.report.failed.len(), 1);
        assert_eq!(logs.count("ERROR"), 1);
        assert_eq!(logs.count("WARN"), 1);
    }

    #[test]
    fn one_error_per_failed_placeholder() {
        let (rendered, logs) = render_logged(
            &MemorySource::new(),
            &["nav-placeholder", "footer-placeholder", "all-news-placeholder"],
        );
        assert_eq!(rendered.report.failed.len(), 3);
        assert_eq!(logs.count("ERROR"), 3);
    }

    #[test]
    fn clean_render_logs_no_error() {
        let (rendered, logs) = render_logged(&sample_source(), &["nav-placeholder"]);
        assert!(rendered.report.is_clean());
        assert_eq!(logs.count("ERROR"), 0);
        assert_eq!(logs.count("WARN"), 0);
    }
}
