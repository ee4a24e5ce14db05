//! Interaction layer: reveal-on-scroll, click ripples, smooth scrolling,
//! and the mobile navigation panel.
//!
//! Everything here is headless. A host (a browser shim, a test) reports
//! element geometry, clicks, and the current time; these types decide
//! which classes to add or remove and where to scroll. Nothing sleeps or
//! polls.
//!
//! The mobile panel is assembled through a one-shot [`Readiness`] signal:
//! whoever has better panel content registers a callback, and the callback
//! runs as soon as the panel exists (immediately, if it already does).

use crate::components::panel_link;
use crate::config::InteractionConfig;
use crate::page::Page;
use maud::{Markup, PreEscaped, html};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

/// Class added to elements enrolled for reveal-on-scroll.
pub const ANIMATE_CLASS: &str = "animate-on-scroll";
/// Class added once an enrolled element has scrolled into view.
pub const VISIBLE_CLASS: &str = "visible";

// ============================================================================
// Readiness
// ============================================================================

type ReadyCallback<T> = Box<dyn FnOnce(&mut T) + Send>;

/// A value that becomes available once, with callbacks waiting on it.
///
/// Callbacks registered before [`resolve`](Readiness::resolve) run in
/// registration order when it is called; later ones run immediately. If
/// the signal is never resolved the callbacks are dropped with it.
pub struct Readiness<T> {
    state: ReadyState<T>,
}

enum ReadyState<T> {
    Pending(Vec<ReadyCallback<T>>),
    Ready(T),
}

impl<T> Default for Readiness<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Readiness<T> {
    pub fn new() -> Self {
        Self {
            state: ReadyState::Pending(Vec::new()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ReadyState::Ready(_))
    }

    /// Run `f` against the value once it exists.
    pub fn when_ready(&mut self, f: impl FnOnce(&mut T) + Send + 'static) {
        match &mut self.state {
            ReadyState::Pending(waiting) => waiting.push(Box::new(f)),
            ReadyState::Ready(value) => f(value),
        }
    }

    /// Provide the value and run every waiting callback.
    ///
    /// Resolving twice replaces the value; callbacks have already run.
    pub fn resolve(&mut self, mut value: T) {
        let previous = std::mem::replace(&mut self.state, ReadyState::Pending(Vec::new()));
        if let ReadyState::Pending(waiting) = previous {
            for callback in waiting {
                callback(&mut value);
            }
        }
        self.state = ReadyState::Ready(value);
    }

    pub fn get(&self) -> Option<&T> {
        match &self.state {
            ReadyState::Ready(value) => Some(value),
            ReadyState::Pending(_) => None,
        }
    }

    /// Number of callbacks still waiting.
    pub fn pending(&self) -> usize {
        match &self.state {
            ReadyState::Pending(waiting) => waiting.len(),
            ReadyState::Ready(_) => 0,
        }
    }
}

// ============================================================================
// Mobile navigation panel
// ============================================================================

/// Contents of the mobile side panel's `<nav>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavPanel {
    links: String,
}

impl NavPanel {
    /// Seed the panel from desktop navigation markup: every link becomes a
    /// flat panel entry, indented by how deeply its `<li>` is nested.
    pub fn from_desktop_nav(nav_html: &str) -> Self {
        static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r#"(?is)<(/?)(li|a)\b([^>]*)>"#).unwrap()
        });
        static HREF: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r#"(?i)\shref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
        });
        static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

        let mut links = String::new();
        let mut li_depth = 0usize;
        let mut open_link: Option<(String, usize, usize)> = None;

        for caps in TOKEN.captures_iter(nav_html) {
            let closing = !caps[1].is_empty();
            let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
            match (caps[2].to_ascii_lowercase().as_str(), closing) {
                ("li", false) => li_depth += 1,
                ("li", true) => li_depth = li_depth.saturating_sub(1),
                ("a", false) => {
                    let href = HREF
                        .captures(&caps[3])
                        .and_then(|h| h.get(1).or_else(|| h.get(2)))
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default();
                    open_link = Some((href, li_depth.saturating_sub(1), whole.end));
                }
                ("a", true) => {
                    if let Some((href, depth, text_start)) = open_link.take() {
                        let text = TAG.replace_all(&nav_html[text_start..whole.start], "");
                        let text = decode_entities(text.trim());
                        links.push_str(&panel_link(&href, &text, depth).into_string());
                    }
                }
                _ => {}
            }
        }
        Self { links }
    }

    /// Replace the panel contents with pre-rendered link markup.
    pub fn set_links(&mut self, markup: impl Into<String>) {
        self.links = markup.into();
    }

    pub fn links(&self) -> &str {
        &self.links
    }

    /// Title bar toggle and the panel container, for pages that don't ship
    /// their own `#navPanel`.
    pub fn render(&self) -> Markup {
        html! {
            div #titleBar {
                a.toggle href="#navPanel" aria-label="Open menu" {
                    span.toggle-icon aria-hidden="true" {
                        (PreEscaped(MENU_ICON))
                    }
                }
            }
            div #navPanel {
                nav { (PreEscaped(&self.links)) }
            }
        }
    }
}

const MENU_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="22" height="22" fill="none" stroke="currentColor" stroke-width="2.25" stroke-linecap="round" stroke-linejoin="round"><line x1="3" y1="6" x2="21" y2="6"/><line x1="3" y1="12" x2="21" y2="12"/><line x1="3" y1="18" x2="21" y2="18"/></svg>"#;

/// Undo the escaping maud applied, so text can be escaped again on output.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Build the mobile panel for a page and resolve `panel` with it.
///
/// The panel is seeded from the page's rendered `#nav`; callbacks waiting
/// on `panel` (the loader's grouped markup) run during resolution and may
/// replace the seed. The result goes into the page's own `#navPanel` when
/// it has one, and is appended to the body otherwise.
///
/// Pages with neither `#nav` nor `#navPanel` get nothing and `panel` stays
/// pending. Returns whether a panel was installed.
pub fn install_nav_panel(page: &mut Page, panel: &mut Readiness<NavPanel>) -> bool {
    let desktop = page.inner_html("nav").map(str::to_string);
    let has_container = page.find_element("navPanel").is_some();
    if desktop.is_none() && !has_container {
        return false;
    }

    panel.resolve(NavPanel::from_desktop_nav(desktop.as_deref().unwrap_or("")));
    let Some(built) = panel.get() else {
        return false;
    };

    if has_container {
        let nav = html! { nav { (PreEscaped(built.links())) } };
        page.set_inner_html("navPanel", &nav.into_string());
    } else {
        page.append_to_body(&built.render().into_string());
    }
    tracing::debug!("installed mobile navigation panel");
    true
}

// ============================================================================
// Reveal-on-scroll
// ============================================================================

/// Vertical extent of an element relative to the viewport top, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    fn height(self) -> f64 {
        self.bottom - self.top
    }
}

/// One-shot reveal tracking in the manner of an intersection observer.
///
/// Elements are keyed by a host-chosen id. The host finds candidates with
/// [`query`](RevealObserver::query) and reports each one to
/// [`enroll`](RevealObserver::enroll).
#[derive(Debug, Clone)]
pub struct RevealObserver<K: Ord + Clone> {
    threshold: f64,
    margin: f64,
    selectors: Vec<String>,
    enabled: bool,
    observed: BTreeSet<K>,
}

impl<K: Ord + Clone> RevealObserver<K> {
    /// `reduced_motion` disables the effect: nothing is ever enrolled.
    pub fn new(config: &InteractionConfig, reduced_motion: bool) -> Self {
        Self {
            threshold: config.reveal_threshold,
            margin: f64::from(config.reveal_margin_px),
            selectors: config.reveal_selectors.clone(),
            enabled: !reduced_motion,
            observed: BTreeSet::new(),
        }
    }

    /// Selectors whose matches are candidates for the effect.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// The selector list as one `querySelectorAll` argument, or `None`
    /// when the effect is disabled and there is nothing to look for.
    pub fn query(&self) -> Option<String> {
        (self.enabled && !self.selectors.is_empty()).then(|| self.selectors.join(", "))
    }

    /// Consider an element for the effect at page load.
    ///
    /// Elements already visible in the upper half of the viewport are left
    /// alone so content above the fold never flashes in. Returns `true`
    /// when the element was enrolled and should get [`ANIMATE_CLASS`].
    pub fn enroll(&mut self, id: K, rect: Rect, viewport_height: f64) -> bool {
        if !self.enabled {
            return false;
        }
        let above_fold = rect.top < viewport_height && rect.bottom > 0.0;
        if above_fold && rect.top <= viewport_height * 0.5 {
            return false;
        }
        self.observed.insert(id);
        true
    }

    /// Does `rect` intersect the viewport extended by the bottom margin
    /// enough to cross the threshold?
    pub fn intersects(&self, rect: Rect, viewport_height: f64) -> bool {
        let visible = rect.bottom.min(viewport_height + self.margin) - rect.top.max(0.0);
        if visible <= 0.0 {
            return false;
        }
        let height = rect.height();
        if height <= 0.0 {
            return true;
        }
        visible / height >= self.threshold
    }

    /// Report current positions. Observed elements that now intersect are
    /// returned (they should get [`VISIBLE_CLASS`]) and stop being observed.
    pub fn on_scroll<I>(&mut self, positions: I, viewport_height: f64) -> Vec<K>
    where
        I: IntoIterator<Item = (K, Rect)>,
    {
        let mut revealed = Vec::new();
        for (id, rect) in positions {
            if self.observed.contains(&id) && self.intersects(rect, viewport_height) {
                self.observed.remove(&id);
                revealed.push(id);
            }
        }
        revealed
    }

    pub fn is_observing(&self, id: &K) -> bool {
        self.observed.contains(id)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }
}

// ============================================================================
// Ripples
// ============================================================================

/// A ripple span inside a button, positioned relative to the button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub left: f64,
    pub top: f64,
    pub expires: Instant,
}

/// Click ripples, at most one per button.
#[derive(Debug, Clone)]
pub struct Ripples<K: Ord + Clone> {
    lifetime: Duration,
    enabled: bool,
    active: BTreeMap<K, Ripple>,
}

impl<K: Ord + Clone> Ripples<K> {
    /// `reduced_motion` disables the effect: clicks spawn nothing.
    pub fn new(config: &InteractionConfig, reduced_motion: bool) -> Self {
        Self {
            lifetime: Duration::from_millis(config.ripple_ms),
            enabled: !reduced_motion,
            active: BTreeMap::new(),
        }
    }

    /// Spawn a ripple centred on the click, replacing the button's
    /// previous one.
    ///
    /// `button` is the button's page offset, `click` the pointer's page
    /// position, and `size` the rendered ripple size. Returns `None` when
    /// ripples are disabled.
    pub fn click(
        &mut self,
        id: K,
        button: (f64, f64),
        click: (f64, f64),
        size: (f64, f64),
        now: Instant,
    ) -> Option<Ripple> {
        if !self.enabled {
            return None;
        }
        let ripple = Ripple {
            left: click.0 - button.0 - size.0 / 2.0,
            top: click.1 - button.1 - size.1 / 2.0,
            expires: now + self.lifetime,
        };
        self.active.insert(id, ripple);
        Some(ripple)
    }

    /// Remove expired ripples, returning the buttons they belonged to.
    pub fn sweep(&mut self, now: Instant) -> Vec<K> {
        let expired: Vec<K> = self
            .active
            .iter()
            .filter(|(_, r)| now >= r.expires)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &expired {
            self.active.remove(id);
        }
        expired
    }

    pub fn get(&self, id: &K) -> Option<&Ripple> {
        self.active.get(id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

// ============================================================================
// Smooth scrolling
// ============================================================================

/// Where and how long to scroll for an in-page anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPlan {
    pub scroll_top: f64,
    pub duration: Duration,
}

/// Plan a smooth scroll for a link `href`.
///
/// Only `#id` links are handled; `locate` maps an id to its page offset.
/// `None` means the click should fall through to default navigation, which
/// is always the case under `reduced_motion`.
pub fn plan_smooth_scroll<F>(
    href: &str,
    locate: F,
    config: &InteractionConfig,
    reduced_motion: bool,
) -> Option<ScrollPlan>
where
    F: Fn(&str) -> Option<f64>,
{
    if reduced_motion {
        return None;
    }
    let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
    let offset_top = locate(id)?;
    Some(ScrollPlan {
        scroll_top: (offset_top - f64::from(config.scroll_offset_px)).max(0.0),
        duration: Duration::from_millis(config.scroll_ms),
    })
}
