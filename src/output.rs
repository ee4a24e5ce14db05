//! CLI output formatting for the build and check commands.
//!
//! Output is page-centric: each rendered page is listed by its position and
//! site path, with the placeholders it filled in parentheses. Anything left
//! unrendered is shown as an indented context line under its page.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Pages
//! 001 Blog.html (nav, footer, all-blog-posts)
//! 002 blog/first-post.html (nav, footer)
//!     Unrendered: blog-posts-placeholder
//!         blog-posts.json: HTTP error! status: 404
//!
//! Copied 4 files
//! Theme: light
//! Rendered 2 pages, 1 placeholder left unrendered → dist
//! ```
//!
//! ## Check
//!
//! ```text
//! Data
//! navigation.json: 5 records
//!     Source: site/data/navigation.json
//! news.json: unavailable
//!     Source: site/data/news.json
//!     Error: news.json: HTTP error! status: 404
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{BuildSummary, PageResult};
use crate::loader::{DataStatus, Placeholder};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 page`, `2 pages`.
fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Placeholder id without its `-placeholder` suffix.
fn short_name(placeholder: Placeholder) -> &'static str {
    let id = placeholder.id();
    id.strip_suffix("-placeholder").unwrap_or(id)
}

// ============================================================================
// Build
// ============================================================================

fn page_lines(index: usize, page: &PageResult) -> Vec<String> {
    let mut lines = Vec::new();
    let filled: Vec<&str> = page.report.rendered.iter().map(|p| short_name(*p)).collect();
    if filled.is_empty() {
        lines.push(format!("{} {}", format_index(index), page.path));
    } else {
        lines.push(format!(
            "{} {} ({})",
            format_index(index),
            page.path,
            filled.join(", ")
        ));
    }
    for failure in &page.report.failed {
        lines.push(format!("{}Unrendered: {}", indent(1), failure.placeholder));
        lines.push(format!("{}{}", indent(2), failure.error));
    }
    lines
}

pub fn format_build_output(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !summary.pages.is_empty() {
        lines.push("Pages".to_string());
        for (i, page) in summary.pages.iter().enumerate() {
            lines.extend(page_lines(i + 1, page));
        }
        lines.push(String::new());
    }

    lines.push(format!(
        "Copied {}",
        plural(summary.copied.len(), "file", "files")
    ));
    lines.push(format!("Theme: {}", summary.theme));
    let failed = summary.failed_placeholders();
    lines.push(format!(
        "Rendered {}, {} left unrendered → {}",
        plural(summary.pages.len(), "page", "pages"),
        plural(failed, "placeholder", "placeholders"),
        summary.output.display()
    ));
    lines
}

pub fn print_build_output(summary: &BuildSummary) {
    for line in format_build_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(statuses: &[DataStatus]) -> Vec<String> {
    let mut lines = vec!["Data".to_string()];
    for status in statuses {
        match &status.result {
            Ok(n) => {
                lines.push(format!(
                    "{}: {}",
                    status.file,
                    plural(*n, "record", "records")
                ));
                lines.push(format!("{}Source: {}", indent(1), status.location));
            }
            Err(error) => {
                lines.push(format!("{}: unavailable", status.file));
                lines.push(format!("{}Source: {}", indent(1), status.location));
                lines.push(format!("{}Error: {}", indent(1), error));
            }
        }
    }
    lines
}

pub fn print_check_output(statuses: &[DataStatus]) {
    for line in format_check_output(statuses) {
        println!("{}", line);
    }
}
