//! HTML components rendered from content records.
//!
//! Every function here is a pure mapping from typed records plus a
//! [`RenderContext`] to [`Markup`]; nothing touches the filesystem or the
//! page being rendered. The loader decides which component goes into which
//! placeholder.
//!
//! ## Components
//!
//! | Function | Placeholder | Wrapper |
//! |----------|-------------|---------|
//! | [`render_navigation`] | `nav-placeholder` | `h1` logo + `nav#nav > ul` |
//! | [`render_footer`] | `footer-placeholder` | `section#footer` |
//! | [`render_blog_posts`] | `blog-posts-placeholder` | `section.other-posts` |
//! | [`render_all_blog_posts`] | `all-blog-posts-placeholder` | `div.blog-grid` |
//! | [`render_projects`] | `projects-placeholder` | `section.other-projects` |
//! | [`render_all_projects`] | `all-projects-placeholder` | `div.project-grid` |
//! | [`render_all_news`] | `all-news-placeholder` | `div.news-grid` |
//!
//! [`render_mobile_nav_panel`] produces the grouped side-menu markup for
//! the mobile navigation panel.
//!
//! Interpolated text is escaped by maud. Excerpts are the exception: they
//! are inline Markdown, so emphasis and links written in the data files
//! (and any raw inline HTML) come through. A line that would open a block
//! (`# `, `1990. `, `> `) stays text.

use crate::config::{HeadingsConfig, SiteConfig};
use crate::theme::Theme;
use crate::types::{
    BlogData, FooterData, Linked, Logo, MenuItem, NavigationData, NewsData, NewsItem, Post,
    Project, ProjectsData,
};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use regex::Regex;
use std::sync::LazyLock;

/// Everything a component needs to know about the page it renders into.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Prefix that turns a site-root-relative URL into one relative to
    /// this page (`""` at the root, `"../"` one level down).
    pub base_path: String,
    /// Final path segment of the page (`index.html` for a bare directory).
    pub current_page: String,
    /// Full site-absolute path of the page, e.g. `/blog/first-post.html`.
    pub current_page_url: String,
    /// Prefix for card images.
    pub image_base_path: String,
    /// Theme applied to the page.
    pub theme: Theme,
    /// Logo used when the navigation data has none.
    pub logo: Logo,
    pub headings: HeadingsConfig,
}

impl RenderContext {
    /// Context for the page at `rel_path` (relative to the site root, `/`
    /// separated).
    pub fn for_page(rel_path: &str, config: &SiteConfig, theme: Theme) -> Self {
        let rel_path = rel_path.trim_start_matches("./").trim_start_matches('/');
        let depth = rel_path.matches('/').count();
        let base_path = "../".repeat(depth);
        let current_page = match rel_path.rsplit('/').next() {
            Some(last) if !last.is_empty() => last.to_string(),
            _ => "index.html".to_string(),
        };
        Self {
            image_base_path: base_path.clone(),
            base_path,
            current_page,
            current_page_url: format!("/{rel_path}"),
            theme,
            logo: Logo {
                text: config.logo.text.clone(),
                url: config.logo.url.clone(),
            },
            headings: config.headings.clone(),
        }
    }

    /// A site-root-relative URL as seen from this page.
    pub fn link(&self, url: &str) -> String {
        format!("{}{}", self.base_path, url)
    }

    fn image(&self, path: &str) -> String {
        format!("{}{}", self.image_base_path, path)
    }

    /// Whether a navigation URL points at this page.
    ///
    /// Matches on the whole page name or on a `/`-aligned suffix of the
    /// page path, so `blog/post.html` marks `/blog/post.html` but `x.html`
    /// never marks `index.html`.
    pub fn is_current(&self, url: &str) -> bool {
        let url = url.trim_start_matches("./").trim_start_matches('/');
        if url.is_empty() {
            return false;
        }
        self.current_page == url
            || self.current_page_url == format!("/{url}")
            || self.current_page_url.ends_with(&format!("/{url}"))
    }
}

/// Last `/`-separated segment of a URL; empty for a trailing slash.
pub fn final_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or("")
}

/// Records whose page is not the current page (compared by final segment).
pub fn excluding_current<'a, T: Linked>(items: &'a [T], current_page_url: &str) -> Vec<&'a T> {
    let current = final_segment(current_page_url);
    items
        .iter()
        .filter(|item| final_segment(item.url()) != current)
        .collect()
}

/// Inline Markdown without the wrapping paragraph.
fn inline_markdown(text: &str) -> Markup {
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new(&escape_block_starts(text)));
    let trimmed = out.trim_end();
    let inner = trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .filter(|s| !s.contains("<p>"))
        .unwrap_or(trimmed);
    PreEscaped(inner.to_string())
}

/// Backslash-escape the marker of any line that would start a heading,
/// quote, list, or rule. Leading indentation is dropped so nothing becomes
/// a code block.
fn escape_block_starts(text: &str) -> String {
    static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"^(?:(#{1,6})(?:\s|$)|(>)|([-+*])(?:\s|$)|\d{1,9}([.)])(?:\s|$)|(=)=*\s*$|([-_*])(?:\s*[-_*]){2,}\s*$)",
        )
        .unwrap()
    });
    text.lines()
        .map(|line| {
            let line = line.trim_start();
            let marker = BLOCK_START
                .captures(line)
                .and_then(|caps| (1..=6).find_map(|i| caps.get(i)))
                .map(|m| m.start());
            match marker {
                Some(at) => format!("{}\\{}", &line[..at], &line[at..]),
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `tag-` class suffix for a news tag: lowercased, whitespace runs as `-`.
pub fn tag_class(tag: &str) -> String {
    tag.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

// ============================================================================
// Navigation
// ============================================================================

/// Header logo and the desktop navigation list.
pub fn render_navigation(nav: &NavigationData, ctx: &RenderContext) -> Markup {
    let logo = nav.logo.as_ref().unwrap_or(&ctx.logo);
    html! {
        h1 { a href=(ctx.link(&logo.url)) { (logo.text) } }
        nav id="nav" {
            ul {
                @for item in &nav.menu {
                    (render_menu_item(item, ctx))
                }
            }
        }
    }
}

fn render_menu_item(item: &MenuItem, ctx: &RenderContext) -> Markup {
    let current = ctx.is_current(&item.url).then_some("current");
    html! {
        li class=[current] {
            a href=(ctx.link(&item.url)) { (item.name) }
            @if item.is_dropdown() {
                ul {
                    @for child in &item.children {
                        li { a href=(ctx.link(&child.url)) { (child.name) } }
                    }
                }
            }
        }
    }
}

/// Side-menu markup for the mobile panel.
///
/// Dropdowns become a group whose children stay hidden until the trigger
/// is hovered or activated.
pub fn render_mobile_nav_panel(nav: &NavigationData, ctx: &RenderContext) -> Markup {
    html! {
        @for item in &nav.menu {
            @if item.is_dropdown() {
                div.nav-panel-group {
                    div.nav-panel-head {
                        (panel_link(&ctx.link(&item.url), &item.name, 0))
                        span.nav-panel-trigger role="button" tabindex="0" aria-label="Show submenu" {
                            (PreEscaped("&#9660;"))
                        }
                    }
                    div.nav-panel-subs {
                        @for child in &item.children {
                            (panel_link(&ctx.link(&child.url), &child.name, 1))
                        }
                    }
                }
            } @else {
                (panel_link(&ctx.link(&item.url), &item.name, 0))
            }
        }
    }
}

/// One mobile panel link at the given nesting depth.
pub fn panel_link(href: &str, text: &str, depth: usize) -> Markup {
    html! {
        a class={ "link depth-" (depth) } href=(href) {
            span class={ "indent-" (depth) } {}
            (text)
        }
    }
}

// ============================================================================
// Footer
// ============================================================================

pub fn render_footer(footer: &FooterData, ctx: &RenderContext) -> Markup {
    let contact = &footer.contact;
    let copyright = &footer.copyright;
    html! {
        section #footer .footer-modern {
            div.footer-accent {}
            div.footer-bg {}
            div.container {
                div.row.footer-blocks {
                    div class="col-4 col-6-medium col-12-small footer-block footer-block-1" {
                        section.footer-section {
                            header { h2 { "Content" } }
                            ul.divided {
                                @for link in &footer.content_links {
                                    li { a href=(ctx.link(&link.url)) { (link.name) } }
                                }
                            }
                        }
                    }
                    div class="col-4 col-6-medium col-12-small footer-block footer-block-2" {
                        section.footer-section {
                            header { h2 { "Affiliations" } }
                            ul.divided {
                                @for affiliation in &footer.affiliations {
                                    li { a href=(affiliation.url) { (affiliation.name) } }
                                }
                            }
                        }
                    }
                    div class="col-4 col-12-medium footer-block footer-block-3" {
                        section.footer-section {
                            header { h2 { "Connect with me:" } }
                            ul.social {
                                @for social in &footer.social_links {
                                    li {
                                        a class={ "icon brands " (social.icon) } href=(social.url) {
                                            span.label { (social.label) }
                                        }
                                    }
                                }
                            }
                            ul.contact {
                                li {
                                    h3 { "Address" }
                                    p {
                                        (contact.address.organization) " " br;
                                        (contact.address.street) " " br;
                                        (contact.address.city)
                                    }
                                }
                                li {
                                    h3 { "Mail" }
                                    p { a href={ "mailto:" (contact.email) } { (contact.email) } }
                                }
                                li {
                                    h3 { "Phone" }
                                    p { (contact.phone) }
                                }
                            }
                        }
                    }
                    div.col-12.footer-copyright-wrap {
                        div #copyright .footer-copyright {
                            ul.links {
                                li { "© " (copyright.year_text()) ". " (copyright.text) }
                                li { a href=(copyright.link.url) { (copyright.link.text) } }
                            }
                        }
                    }
                }
            }
        }
    }
}

// ============================================================================
// Cards
// ============================================================================

fn card_image(src: &str) -> Markup {
    html! {
        img src=(src) alt="" loading="lazy" decoding="async" fetchpriority="low";
    }
}

pub fn render_blog_card(post: &Post, ctx: &RenderContext) -> Markup {
    let href = ctx.link(&post.url);
    html! {
        article.blog-card-modern {
            div.blog-card-image {
                a href=(href) { (card_image(&ctx.image(&post.image))) }
            }
            div.blog-card-content {
                h3 { a href=(href) { (post.title) } }
                p.blog-meta { "Posted on " (post.date_display) }
                p.blog-excerpt { (inline_markdown(&post.excerpt)) }
                a.blog-read-btn href=(href) {
                    i.fas.fa-arrow-right {}
                    " Continue Reading"
                }
            }
        }
    }
}

/// A project card. Projects carrying a notice are locked: the image and
/// title are not links, an info icon shows the notice, and the button is
/// disabled.
pub fn render_project_card(project: &Project, ctx: &RenderContext) -> Markup {
    let href = ctx.link(&project.url);
    let image = ctx.image(&project.image);
    let locked = project.is_locked();
    let status_tag = project.status.as_deref().filter(|s| !s.is_empty()).map(|status| {
        html! {
            span class={ "project-status-tag project-status-" (status.to_lowercase()) } { (status) }
        }
    });
    html! {
        article.project-card-modern {
            div.project-card-image {
                @if let Some(notice) = project.notice.as_deref().filter(|_| locked) {
                    span.project-info-icon tabindex="0" {
                        i.fas.fa-info-circle {}
                        span.project-info-tooltip { (notice) }
                    }
                    (card_image(&image))
                } @else {
                    a href=(href) { (card_image(&image)) }
                }
                @if let Some(tag) = &status_tag {
                    (tag)
                }
            }
            div.project-card-content {
                @if locked {
                    h3 { (project.title) }
                } @else {
                    h3 { a href=(href) { (project.title) } }
                }
                p.project-excerpt { (inline_markdown(&project.excerpt)) }
                @if locked {
                    a.project-read-btn.project-read-btn-disabled href=(href) tabindex="-1" aria-disabled="true" onclick="return false;" {
                        i.fas.fa-arrow-right {}
                        " Learn More"
                    }
                } @else {
                    a.project-read-btn href=(href) {
                        i.fas.fa-arrow-right {}
                        " Learn More"
                    }
                }
            }
        }
    }
}

/// A news card. News links point off-site, so they open in a new tab and
/// are not prefixed with the base path.
pub fn render_news_card(item: &NewsItem, ctx: &RenderContext) -> Markup {
    html! {
        article.news-card-modern {
            @if let Some(image) = item.image.as_deref().filter(|i| !i.is_empty()) {
                div.news-card-image {
                    a href=(item.url) target="_blank" rel="noopener noreferrer" {
                        (card_image(&ctx.image(image)))
                    }
                }
            }
            div.news-card-content {
                @if !item.tags.is_empty() {
                    div.news-tags {
                        @for tag in &item.tags {
                            span class={ "news-tag tag-" (tag_class(tag)) } { (tag) }
                        }
                    }
                }
                h3 { a href=(item.url) target="_blank" rel="noopener noreferrer" { (item.title) } }
                p.news-meta { (item.source) " • " (item.date_display) }
                p.news-excerpt { (inline_markdown(&item.excerpt)) }
                a.news-read-btn href=(item.url) target="_blank" rel="noopener noreferrer" {
                    i.fas.fa-external-link-alt {}
                    " Read Article"
                }
            }
        }
    }
}

// ============================================================================
// Listings
// ============================================================================

/// Blog cards under "More from the Blog".
///
/// With `show_all == false` the post for the current page is left out.
/// Renders nothing when no post remains.
pub fn render_blog_posts(data: &BlogData, ctx: &RenderContext, show_all: bool) -> Markup {
    let posts: Vec<&Post> = if show_all {
        data.posts.iter().collect()
    } else {
        excluding_current(&data.posts, &ctx.current_page_url)
    };
    html! {
        @if !posts.is_empty() {
            section.other-posts {
                h3 { (ctx.headings.other_posts) }
                div.blog-grid {
                    @for post in posts {
                        (render_blog_card(post, ctx))
                    }
                }
            }
        }
    }
}

/// Every blog post, for listing pages.
pub fn render_all_blog_posts(data: &BlogData, ctx: &RenderContext) -> Markup {
    html! {
        div.blog-grid {
            @for post in &data.posts {
                (render_blog_card(post, ctx))
            }
        }
    }
}

/// Project cards under "Other Projects"; same filtering as
/// [`render_blog_posts`].
pub fn render_projects(data: &ProjectsData, ctx: &RenderContext, show_all: bool) -> Markup {
    let projects: Vec<&Project> = if show_all {
        data.projects.iter().collect()
    } else {
        excluding_current(&data.projects, &ctx.current_page_url)
    };
    html! {
        @if !projects.is_empty() {
            section.other-projects {
                h3 { (ctx.headings.other_projects) }
                div.project-grid {
                    @for project in projects {
                        (render_project_card(project, ctx))
                    }
                }
            }
        }
    }
}

/// Every project, for listing pages.
pub fn render_all_projects(data: &ProjectsData, ctx: &RenderContext) -> Markup {
    html! {
        div.project-grid {
            @for project in &data.projects {
                (render_project_card(project, ctx))
            }
        }
    }
}

/// Every news item; nothing at all when there are none.
pub fn render_all_news(data: &NewsData, ctx: &RenderContext) -> Markup {
    html! {
        @if !data.items.is_empty() {
            div.news-grid {
                @for item in &data.items {
                    (render_news_card(item, ctx))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NavLink;

    fn ctx(rel_path: &str) -> RenderContext {
        RenderContext::for_page(rel_path, &SiteConfig::default(), Theme::Light)
    }

    fn nav(json: &str) -> NavigationData {
        serde_json::from_str(json).unwrap()
    }

    fn post(title: &str, url: &str) -> Post {
        Post {
            title: title.to_string(),
            url: url.to_string(),
            image: format!("images/{title}.jpg"),
            excerpt: "An *excerpt*.".to_string(),
            date_display: "March 3, 2025".to_string(),
        }
    }

    fn project(title: &str, url: &str) -> Project {
        Project {
            title: title.to_string(),
            url: url.to_string(),
            image: "images/p.jpg".to_string(),
            excerpt: "Pavement modelling.".to_string(),
            status: None,
            notice: None,
        }
    }

    /// Count `<li` that sit directly under the `nav#nav` list.
    fn top_level_items(html: &str) -> usize {
        let mut depth = 0usize;
        let mut count = 0;
        let mut rest = html;
        while let Some(pos) = rest.find('<') {
            rest = &rest[pos..];
            if rest.starts_with("<ul") {
                depth += 1;
            } else if rest.starts_with("</ul") {
                depth -= 1;
            } else if rest.starts_with("<li") && depth == 1 {
                count += 1;
            }
            rest = &rest[1..];
        }
        count
    }

    // =========================================================================
    // Context
    // =========================================================================

    #[test]
    fn context_for_root_page() {
        let c = ctx("index.html");
        assert_eq!(c.base_path, "");
        assert_eq!(c.current_page, "index.html");
        assert_eq!(c.current_page_url, "/index.html");
    }

    #[test]
    fn context_for_nested_page() {
        let c = ctx("blog/first-post.html");
        assert_eq!(c.base_path, "../");
        assert_eq!(c.image_base_path, "../");
        assert_eq!(c.current_page, "first-post.html");
        assert_eq!(c.link("Blog.html"), "../Blog.html");
    }

    #[test]
    fn context_for_directory_defaults_to_index() {
        let c = ctx("");
        assert_eq!(c.current_page, "index.html");
        assert_eq!(c.base_path, "");
    }

    #[test]
    fn is_current_is_segment_aware() {
        let c = ctx("index.html");
        assert!(c.is_current("index.html"));
        assert!(!c.is_current("x.html"));
        assert!(!c.is_current(""));

        let c = ctx("blog/first-post.html");
        assert!(c.is_current("blog/first-post.html"));
        assert!(c.is_current("first-post.html"));
        assert!(!c.is_current("post.html"));
    }

    #[test]
    fn nested_page_marks_full_path_link() {
        let data = nav(
            r#"{"menu":[
                {"name":"Post","url":"blog/first-post.html"},
                {"name":"Elsewhere","url":"drafts/first-post.html"},
                {"name":"Tail","url":"t-post.html"}
            ]}"#,
        );
        let html = render_navigation(&data, &ctx("blog/first-post.html")).into_string();
        assert!(html.contains(
            r#"<li class="current"><a href="../blog/first-post.html">Post</a></li>"#
        ));
        assert_eq!(html.matches(r#"class="current""#).count(), 1);
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    #[test]
    fn single_home_item_is_current() {
        let data = nav(r#"{"menu":[{"name":"Home","url":"index.html"}]}"#);
        let html = render_navigation(&data, &ctx("index.html")).into_string();
        assert_eq!(top_level_items(&html), 1);
        assert!(html.contains(r#"<li class="current"><a href="index.html">Home</a></li>"#));
    }

    #[test]
    fn top_level_count_matches_menu() {
        let data = nav(
            r#"{"menu":[
                {"name":"Home","url":"index.html"},
                {"name":"Research","url":"Research.html","type":"dropdown","children":[
                    {"name":"Asphera","url":"e-labs/asphera.html"},
                    {"name":"Aircrafter","url":"e-labs/aircrafter.html"}
                ]},
                {"name":"Blog","url":"Blog.html"},
                {"name":"News","url":"News.html"}
            ]}"#,
        );
        let html = render_navigation(&data, &ctx("News.html")).into_string();
        assert_eq!(top_level_items(&html), 4);
        assert_eq!(html.matches("<li").count(), 6);
        assert!(html.contains("Asphera"));
        assert!(html.contains("Aircrafter"));
    }

    #[test]
    fn only_current_item_is_marked() {
        let data = nav(
            r#"{"menu":[
                {"name":"Home","url":"index.html"},
                {"name":"Blog","url":"Blog.html"},
                {"name":"Projects","url":"Projects.html"}
            ]}"#,
        );
        let html = render_navigation(&data, &ctx("Blog.html")).into_string();
        assert_eq!(html.matches(r#"class="current""#).count(), 1);
        assert!(html.contains(r#"<li class="current"><a href="Blog.html">Blog</a></li>"#));
    }

    #[test]
    fn nested_page_links_use_base_path() {
        let data = nav(r#"{"menu":[{"name":"Home","url":"index.html"}]}"#);
        let html = render_navigation(&data, &ctx("blog/post.html")).into_string();
        assert!(html.contains(r#"href="../index.html""#));
        assert!(!html.contains("current"));
    }

    #[test]
    fn logo_falls_back_to_config() {
        let data = nav(r#"{"menu":[]}"#);
        let html = render_navigation(&data, &ctx("index.html")).into_string();
        assert!(html.contains(r#"<h1><a href="index.html">Johann Cardenas</a></h1>"#));

        let data = nav(r#"{"logo":{"text":"Lab","url":"lab.html"},"menu":[]}"#);
        let html = render_navigation(&data, &ctx("index.html")).into_string();
        assert!(html.contains(">Lab</a>"));
    }

    #[test]
    fn mobile_panel_groups_dropdowns() {
        let data = NavigationData {
            logo: None,
            menu: vec![
                MenuItem {
                    name: "Home".to_string(),
                    url: "index.html".to_string(),
                    kind: None,
                    children: vec![],
                },
                MenuItem {
                    name: "Research".to_string(),
                    url: "Research.html".to_string(),
                    kind: Some("dropdown".to_string()),
                    children: vec![NavLink {
                        name: "Asphera".to_string(),
                        url: "e-labs/asphera.html".to_string(),
                    }],
                },
            ],
        };
        let html = render_mobile_nav_panel(&data, &ctx("index.html")).into_string();
        assert_eq!(html.matches("nav-panel-group").count(), 1);
        assert!(html.contains(
            r#"<a class="link depth-0" href="index.html"><span class="indent-0"></span>Home</a>"#
        ));
        assert!(html.contains(r#"<a class="link depth-1" href="e-labs/asphera.html">"#));
        assert!(html.contains(r#"aria-label="Show submenu">&#9660;</span>"#));
    }

    // =========================================================================
    // Footer
    // =========================================================================

    #[test]
    fn footer_renders_sections() {
        let footer: FooterData = serde_json::from_str(
            r#"{
                "contentLinks":[{"name":"Blog","url":"Blog.html"}],
                "affiliations":[{"name":"UIUC","url":"https://illinois.edu"}],
                "socialLinks":[{"icon":"fa-github","url":"https://github.com/x","label":"GitHub"}],
                "contact":{"address":{"organization":"Lab","street":"205 N Mathews","city":"Urbana"},
                           "email":"me@example.edu","phone":"555"},
                "copyright":{"year":2025,"text":"All rights reserved","link":{"text":"Design","url":"https://html5up.net"}}
            }"#,
        )
        .unwrap();
        let html = render_footer(&footer, &ctx("blog/a.html")).into_string();
        assert!(html.contains(r#"<a href="../Blog.html">Blog</a>"#));
        assert!(html.contains(r#"<a href="https://illinois.edu">UIUC</a>"#));
        assert!(html.contains(r#"class="icon brands fa-github""#));
        assert!(html.contains(r#"href="mailto:me@example.edu""#));
        assert!(html.contains("© 2025. All rights reserved"));
    }

    #[test]
    fn footer_with_missing_fields_still_renders() {
        let footer: FooterData = serde_json::from_str("{}").unwrap();
        let html = render_footer(&footer, &ctx("index.html")).into_string();
        assert!(html.contains(r#"id="footer""#));
        assert!(html.contains(r#"href="mailto:""#));
    }

    // =========================================================================
    // Cards and listings
    // =========================================================================

    #[test]
    fn blog_card_fields() {
        let html = render_blog_card(&post("first", "blog/first.html"), &ctx("Blog.html"))
            .into_string();
        assert!(html.contains(r#"<a href="blog/first.html">first</a>"#));
        assert!(html.contains("Posted on March 3, 2025"));
        assert!(html.contains("An <em>excerpt</em>."));
        assert!(html.contains(r#"src="images/first.jpg""#));
    }

    #[test]
    fn exclude_current_post() {
        let data = BlogData {
            posts: vec![
                post("a", "blog/a.html"),
                post("b", "blog/b.html"),
                post("c", "blog/c.html"),
            ],
        };
        let html = render_blog_posts(&data, &ctx("blog/b.html"), false).into_string();
        assert_eq!(html.matches("<article").count(), 2);
        assert!(!html.contains("blog/b.html"));
        assert!(html.contains("More from the Blog"));

        let html = render_blog_posts(&data, &ctx("blog/b.html"), true).into_string();
        assert_eq!(html.matches("<article").count(), 3);
    }

    #[test]
    fn exclusion_compares_final_segment() {
        let items = vec![post("a", "https://x.org/blog/a.html"), post("b", "b.html")];
        let others = excluding_current(&items, "/somewhere/else/a.html");
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].title, "b");
    }

    #[test]
    fn listing_empty_after_exclusion_renders_nothing() {
        let data = BlogData {
            posts: vec![post("only", "blog/only.html")],
        };
        let html = render_blog_posts(&data, &ctx("blog/only.html"), false).into_string();
        assert_eq!(html, "");
    }

    #[test]
    fn all_blog_posts_is_bare_grid() {
        let data = BlogData {
            posts: vec![post("a", "blog/a.html")],
        };
        let html = render_all_blog_posts(&data, &ctx("Blog.html")).into_string();
        assert!(html.starts_with(r#"<div class="blog-grid">"#));
        assert!(!html.contains("other-posts"));
    }

    #[test]
    fn project_status_tag() {
        let mut p = project("Asphera", "projects/asphera.html");
        p.status = Some("Active".to_string());
        let html = render_project_card(&p, &ctx("Projects.html")).into_string();
        assert!(html.contains(r#"<span class="project-status-tag project-status-active">Active</span>"#));
        assert!(html.contains(r#"<h3><a href="projects/asphera.html">Asphera</a></h3>"#));
    }

    #[test]
    fn locked_project_has_no_links() {
        let mut p = project("ML Models", "projects/ml.html");
        p.notice = Some("Report under review.".to_string());
        let html = render_project_card(&p, &ctx("Projects.html")).into_string();
        assert!(html.contains("<h3>ML Models</h3>"));
        assert!(html.contains(r#"<span class="project-info-tooltip">Report under review.</span>"#));
        assert!(html.contains("project-read-btn-disabled"));
        assert!(html.contains(r#"aria-disabled="true""#));
        // Only the disabled button still carries the href
        assert_eq!(html.matches(r#"href="projects/ml.html""#).count(), 1);
    }

    #[test]
    fn exclude_current_project() {
        let data = ProjectsData {
            projects: vec![
                project("A", "projects/a.html"),
                project("B", "projects/b.html"),
            ],
        };
        let html = render_projects(&data, &ctx("projects/a.html"), false).into_string();
        assert!(html.contains("Other Projects"));
        assert_eq!(html.matches("<article").count(), 1);
        let all = render_all_projects(&data, &ctx("Projects.html")).into_string();
        assert_eq!(all.matches("<article").count(), 2);
    }

    #[test]
    fn news_card_tags_and_external_links() {
        let item: NewsItem = serde_json::from_str(
            r#"{"title":"Award","url":"https://news.example/a","image":"images/n.jpg",
                "excerpt":"Won.","source":"Illinois News","dateDisplay":"Jan 2025",
                "tags":["Award", "Best  Paper"]}"#,
        )
        .unwrap();
        let html = render_news_card(&item, &ctx("News.html")).into_string();
        assert!(html.contains(r#"class="news-tag tag-award""#));
        assert!(html.contains(r#"class="news-tag tag-best-paper""#));
        assert!(html.contains(r#"target="_blank" rel="noopener noreferrer""#));
        assert!(html.contains("Illinois News • Jan 2025"));
        assert!(html.contains("news-card-image"));
    }

    #[test]
    fn news_card_without_image_or_tags() {
        let item: NewsItem =
            serde_json::from_str(r#"{"title":"T","url":"https://x","excerpt":"E"}"#).unwrap();
        let html = render_news_card(&item, &ctx("News.html")).into_string();
        assert!(!html.contains("news-card-image"));
        assert!(!html.contains("news-tags"));
    }

    #[test]
    fn empty_news_renders_nothing() {
        let html = render_all_news(&NewsData::default(), &ctx("News.html")).into_string();
        assert_eq!(html, "");
    }

    #[test]
    fn titles_are_escaped() {
        let html = render_blog_card(&post("<script>x</script>", "a.html"), &ctx("a.html"))
            .into_string();
        assert!(!html.contains("<script>x"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn inline_markdown_strips_paragraph() {
        assert_eq!(inline_markdown("a **b**").into_string(), "a <strong>b</strong>");
        assert_eq!(inline_markdown("").into_string(), "");
    }

    #[test]
    fn inline_markdown_keeps_leading_markers_as_text() {
        assert_eq!(inline_markdown("1990. A year").into_string(), "1990. A year");
        assert_eq!(inline_markdown("# x").into_string(), "# x");
        assert_eq!(inline_markdown("> quoted *word*").into_string(), "&gt; quoted <em>word</em>");
        assert_eq!(inline_markdown("- item").into_string(), "- item");
    }

    #[test]
    fn blog_card_excerpt_never_opens_a_block() {
        let mut p = post("year", "blog/year.html");
        p.excerpt = "1990. A year of *firsts*".to_string();
        let html = render_blog_card(&p, &ctx("Blog.html")).into_string();
        assert!(html.contains(r#"<p class="blog-excerpt">1990. A year of <em>firsts</em></p>"#));
        assert!(!html.contains("<ol"));

        p.excerpt = "# x".to_string();
        let html = render_blog_card(&p, &ctx("Blog.html")).into_string();
        assert!(html.contains(r#"<p class="blog-excerpt"># x</p>"#));
        assert!(!html.contains("<h1"));
    }
}
