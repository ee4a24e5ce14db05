//! # Folio
//!
//! Renders the data-driven parts of a static personal/academic site. Pages
//! are hand-written HTML carrying empty placeholder elements; navigation,
//! footer, blog, project and news listings live in JSON files and are
//! rendered into those placeholders at build time.
//!
//! # Architecture
//!
//! Data flows one way:
//!
//! ```text
//! JSON file ──► typed record ──► component ──► HTML fragment ──► placeholder
//!  (source)       (types)       (components)      (maud)          (page)
//! ```
//!
//! The [`loader`] drives that flow for one page; [`generate`] runs it over a
//! whole site directory in parallel. Around the content, [`theme`] stamps the
//! stored light/dark preference onto each page and [`interaction`] installs
//! the mobile navigation panel and models the page's cosmetic behavior.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Records deserialized from the five data files |
//! | [`source`] | Where data files come from: directory, HTTP, memory |
//! | [`components`] | Pure record → [`maud::Markup`] renderers and the per-page [`components::RenderContext`] |
//! | [`page`] | Locating and replacing placeholder elements in an HTML document |
//! | [`loader`] | Placeholder ↔ data file table, per-page loading, data checks |
//! | [`theme`] | Light/dark preference: storage, application, toggle button |
//! | [`interaction`] | Mobile nav panel readiness, reveal-on-scroll, ripple, smooth scroll |
//! | [`generate`] | Whole-site build: walk, render, copy, `theme.css` |
//! | [`config`] | `folio.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting for build and check |
//!
//! # Design Decisions
//!
//! ## Missing Data Is Not an Error
//!
//! Any failure to obtain a data file (absent, unreachable, non-2xx, malformed)
//! is logged once where it happens and the placeholder it feeds stays in the
//! page untouched. A site with half its data still builds; the build summary
//! says what was left out.
//!
//! ## Maud for Components
//!
//! Components are [Maud](https://maud.lambda.xyz/) templates: checked at
//! compile time and escaped by default. Excerpts are the one field rendered
//! as inline Markdown, since data authors use emphasis and links there.
//!
//! ## Readiness Instead of Polling
//!
//! The mobile navigation panel is rebuilt from the grouped menu once it
//! exists. Rather than waiting for it on a timer, the loader queues the
//! rebuild on a one-shot [`interaction::Readiness`] signal that fires when
//! the panel is installed.

pub mod components;
pub mod config;
pub mod generate;
pub mod interaction;
pub mod loader;
pub mod output;
pub mod page;
pub mod source;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
