//! Shared test utilities for the folio test suite.
//!
//! Provides the fixture site (`fixtures/site/`), an in-memory data source
//! loaded with the fixture data files, and a page builder for placeholder
//! tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let source = sample_source().with_status("footer.json", 500);
//! let mut page = Page::new(page_with(&["nav-placeholder", "footer-placeholder"]));
//! ```

use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::source::MemorySource;

// =========================================================================
// Fixture setup
// =========================================================================

/// A scratch copy of `fixtures/site/`, removed when dropped.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    for entry in WalkDir::new(&fixtures).min_depth(1) {
        let entry = entry.unwrap();
        let dest = tmp.path().join(entry.path().strip_prefix(&fixtures).unwrap());
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest).unwrap();
        } else {
            std::fs::copy(entry.path(), &dest).unwrap();
        }
    }
    tmp
}

// =========================================================================
// Data
// =========================================================================

/// The fixture data files, served from memory.
pub fn sample_source() -> MemorySource {
    MemorySource::new()
        .with_file(
            "navigation.json",
            include_str!("../fixtures/site/data/navigation.json"),
        )
        .with_file("footer.json", include_str!("../fixtures/site/data/footer.json"))
        .with_file(
            "blog-posts.json",
            include_str!("../fixtures/site/data/blog-posts.json"),
        )
        .with_file(
            "projects.json",
            include_str!("../fixtures/site/data/projects.json"),
        )
        .with_file("news.json", include_str!("../fixtures/site/data/news.json"))
}

// =========================================================================
// Pages
// =========================================================================

/// A minimal document with one empty `<div>` per placeholder id.
pub fn page_with(ids: &[&str]) -> String {
    let mut body = String::new();
    for id in ids {
        body.push_str(&format!("<div id=\"{id}\"></div>\n"));
    }
    format!("<!DOCTYPE html>\n<html lang=\"en\">\n<body>\n{body}</body>\n</html>\n")
}

/// Count non-overlapping occurrences of `needle`, with a readable panic
/// message when the expectation fails.
pub fn assert_count(html: &str, needle: &str, expected: usize) {
    let found = html.matches(needle).count();
    assert_eq!(
        found, expected,
        "expected {expected} occurrence(s) of {needle:?}, found {found}"
    );
}
