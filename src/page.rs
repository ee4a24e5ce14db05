//! HTML page documents and placeholder replacement.
//!
//! Pages are hand-written HTML with empty placeholder elements such as
//! `<div id="nav-placeholder"></div>`. Rendering replaces a placeholder's
//! whole outer markup (open tag through its matching close tag) with a
//! generated fragment. Elements are located by scanning tags; the page is
//! never parsed into a tree, so everything outside the replaced spans is
//! written back byte-for-byte.

use regex::Regex;
use std::sync::LazyLock;

/// Something generated markup can be rendered into, addressed by element id.
pub trait RenderTarget {
    /// True when an element with this id exists.
    fn has_placeholder(&self, id: &str) -> bool;

    /// Replace the element's outer markup with `markup`.
    ///
    /// Returns `false` (and leaves the target untouched) when no element
    /// carries the id.
    fn replace_placeholder(&mut self, id: &str, markup: &str) -> bool;
}

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").unwrap());

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Byte offsets of one element inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSpan {
    /// Start of the opening tag (`<`).
    pub start: usize,
    /// Just past the opening tag's `>`.
    pub open_end: usize,
    /// Start of the closing tag; equals `open_end` for void elements.
    pub close_start: usize,
    /// Just past the closing tag.
    pub end: usize,
}

impl ElementSpan {
    pub fn outer(self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn inner(self) -> std::ops::Range<usize> {
        self.open_end..self.close_start
    }
}

/// An HTML document held as source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    html: String,
}

impl Page {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// Locate the first element whose `id` attribute equals `id`.
    pub fn find_element(&self, id: &str) -> Option<ElementSpan> {
        let pattern = format!(
            r#"(?is)<([a-z][a-z0-9-]*)(?:\s[^>]*?)?\sid\s*=\s*(?:"{id}"|'{id}')[^>]*>"#,
            id = regex::escape(id)
        );
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(&self.html)?;
        let whole = caps.get(0)?;
        let tag = caps.get(1)?.as_str().to_ascii_lowercase();
        Some(self.span_from_open_tag(&tag, whole.start(), whole.end()))
    }

    fn span_from_open_tag(&self, tag: &str, start: usize, open_end: usize) -> ElementSpan {
        let open_only = ElementSpan {
            start,
            open_end,
            close_start: open_end,
            end: open_end,
        };
        if self.html[start..open_end].ends_with("/>") || VOID_ELEMENTS.contains(&tag) {
            return open_only;
        }

        let Ok(tag_re) = Regex::new(&format!(r"(?i)</?{}\b[^>]*>", regex::escape(tag))) else {
            return open_only;
        };

        let mut depth = 1usize;
        for m in tag_re.find_iter(&self.html[open_end..]) {
            let text = m.as_str();
            if text.starts_with("</") {
                depth -= 1;
                if depth == 0 {
                    return ElementSpan {
                        start,
                        open_end,
                        close_start: open_end + m.start(),
                        end: open_end + m.end(),
                    };
                }
            } else if !text.ends_with("/>") {
                depth += 1;
            }
        }

        // Unclosed element: treat the opening tag as the whole element.
        open_only
    }

    /// Markup between an element's open and close tags.
    pub fn inner_html(&self, id: &str) -> Option<&str> {
        let span = self.find_element(id)?;
        Some(&self.html[span.inner()])
    }

    /// Replace an element's children, keeping the element itself.
    pub fn set_inner_html(&mut self, id: &str, markup: &str) -> bool {
        match self.find_element(id) {
            // Void and self-closed elements have no children to replace.
            Some(span) if span.end > span.close_start => {
                self.html.replace_range(span.inner(), markup);
                true
            }
            _ => false,
        }
    }

    /// Set an attribute on the root `<html>` element.
    ///
    /// An existing attribute of the same name is overwritten. Returns
    /// `false` when the page has no `<html>` tag.
    pub fn set_root_attribute(&mut self, name: &str, value: &str) -> bool {
        let Some(tag) = HTML_TAG.find(&self.html) else {
            return false;
        };
        let range = tag.range();
        let updated = set_attribute(tag.as_str(), name, value);
        self.html.replace_range(range, &updated);
        true
    }

    /// Read an attribute from the root `<html>` element.
    pub fn root_attribute(&self, name: &str) -> Option<String> {
        let tag = HTML_TAG.find(&self.html)?;
        attribute_value(tag.as_str(), name)
    }

    /// Insert markup just before `</body>`, or at the end when the page has
    /// no body close tag.
    pub fn append_to_body(&mut self, markup: &str) {
        let at = self
            .html
            .to_ascii_lowercase()
            .rfind("</body>")
            .unwrap_or(self.html.len());
        self.html.insert_str(at, markup);
    }

    /// True when some element lists `class` among its classes.
    pub fn has_class(&self, class: &str) -> bool {
        let pattern = format!(
            r#"(?i)\sclass\s*=\s*["'](?:[^"']*\s)?{}(?:\s[^"']*)?["']"#,
            regex::escape(class)
        );
        Regex::new(&pattern)
            .map(|re| re.is_match(&self.html))
            .unwrap_or(false)
    }
}

impl RenderTarget for Page {
    fn has_placeholder(&self, id: &str) -> bool {
        self.find_element(id).is_some()
    }

    fn replace_placeholder(&mut self, id: &str, markup: &str) -> bool {
        match self.find_element(id) {
            Some(span) => {
                self.html.replace_range(span.outer(), markup);
                true
            }
            None => false,
        }
    }
}

/// Rewrite one attribute inside a single opening tag.
fn set_attribute(tag: &str, name: &str, value: &str) -> String {
    let escaped = value.replace('&', "&amp;").replace('"', "&quot;");
    let existing = Regex::new(&format!(
        r#"(?i)\s{}\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#,
        regex::escape(name)
    ))
    .ok()
    .and_then(|re| re.find(tag).map(|m| m.range()));

    match existing {
        Some(range) => {
            let mut out = tag.to_string();
            out.replace_range(range, &format!(r#" {name}="{escaped}""#));
            out
        }
        None => {
            let close = if tag.ends_with("/>") { 2 } else { 1 };
            let (head, tail) = tag.split_at(tag.len() - close);
            format!(r#"{} {name}="{escaped}"{tail}"#, head.trim_end())
        }
    }
}

fn attribute_value(tag: &str, name: &str) -> Option<String> {
    let re = Regex::new(&format!(
        r#"(?i)\s{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#,
        regex::escape(name)
    ))
    .ok()?;
    let caps = re.captures(tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}
