//! Content loader: fills a page's placeholders from the data files.
//!
//! For each known placeholder present in the page, the loader fetches the
//! data file feeding it, renders the matching component, and replaces the
//! placeholder's outer markup. Placeholders whose data is unavailable are
//! left exactly as they were. Each placeholder fetches its own copy of the
//! data; nothing is cached between them.
//!
//! ```text
//! nav-placeholder             ← navigation.json   render_navigation
//! footer-placeholder          ← footer.json       render_footer
//! blog-posts-placeholder      ← blog-posts.json   render_blog_posts (others)
//! all-blog-posts-placeholder  ← blog-posts.json   render_all_blog_posts
//! projects-placeholder        ← projects.json     render_projects (others)
//! all-projects-placeholder    ← projects.json     render_all_projects
//! all-news-placeholder        ← news.json         render_all_news
//! ```

use crate::components::{self, RenderContext};
use crate::interaction::{NavPanel, Readiness};
use crate::page::RenderTarget;
use crate::source::{DataSource, load_json};
use crate::types::{BlogData, FooterData, NavigationData, NewsData, ProjectsData};
use maud::Markup;
use std::fmt;

/// The five JSON documents a site can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Navigation,
    Footer,
    BlogPosts,
    Projects,
    News,
}

impl DataFile {
    pub const ALL: [DataFile; 5] = [
        DataFile::Navigation,
        DataFile::Footer,
        DataFile::BlogPosts,
        DataFile::Projects,
        DataFile::News,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            DataFile::Navigation => "navigation.json",
            DataFile::Footer => "footer.json",
            DataFile::BlogPosts => "blog-posts.json",
            DataFile::Projects => "projects.json",
            DataFile::News => "news.json",
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Placeholder elements the loader knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Nav,
    Footer,
    BlogPosts,
    AllBlogPosts,
    Projects,
    AllProjects,
    AllNews,
}

impl Placeholder {
    /// Processing order: navigation first so the mobile panel rebuild is
    /// registered before anything else happens.
    pub const ALL: [Placeholder; 7] = [
        Placeholder::Nav,
        Placeholder::Footer,
        Placeholder::BlogPosts,
        Placeholder::AllBlogPosts,
        Placeholder::Projects,
        Placeholder::AllProjects,
        Placeholder::AllNews,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Placeholder::Nav => "nav-placeholder",
            Placeholder::Footer => "footer-placeholder",
            Placeholder::BlogPosts => "blog-posts-placeholder",
            Placeholder::AllBlogPosts => "all-blog-posts-placeholder",
            Placeholder::Projects => "projects-placeholder",
            Placeholder::AllProjects => "all-projects-placeholder",
            Placeholder::AllNews => "all-news-placeholder",
        }
    }

    pub fn data_file(self) -> DataFile {
        match self {
            Placeholder::Nav => DataFile::Navigation,
            Placeholder::Footer => DataFile::Footer,
            Placeholder::BlogPosts | Placeholder::AllBlogPosts => DataFile::BlogPosts,
            Placeholder::Projects | Placeholder::AllProjects => DataFile::Projects,
            Placeholder::AllNews => DataFile::News,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A placeholder left unrendered because its data was unavailable.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub placeholder: Placeholder,
    pub error: String,
}

/// What happened to one page's placeholders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub rendered: Vec<Placeholder>,
    pub failed: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Renders data-driven components into a page.
pub struct ComponentLoader<'a> {
    source: &'a dyn DataSource,
    ctx: &'a RenderContext,
}

impl<'a> ComponentLoader<'a> {
    pub fn new(source: &'a dyn DataSource, ctx: &'a RenderContext) -> Self {
        Self { source, ctx }
    }

    /// Fill every placeholder present in `target`.
    ///
    /// When navigation renders, a rebuild of the mobile panel with the
    /// grouped menu is queued on `panel`.
    pub fn load<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        panel: &mut Readiness<NavPanel>,
    ) -> LoadReport {
        let mut report = LoadReport::default();
        for placeholder in Placeholder::ALL {
            if !target.has_placeholder(placeholder.id()) {
                continue;
            }
            match self.render(placeholder, panel) {
                Ok(markup) => {
                    target.replace_placeholder(placeholder.id(), &markup.into_string());
                    tracing::debug!(%placeholder, "rendered placeholder");
                    report.rendered.push(placeholder);
                }
                Err(error) => report.failed.push(LoadFailure { placeholder, error }),
            }
        }
        report
    }

    fn render(
        &self,
        placeholder: Placeholder,
        panel: &mut Readiness<NavPanel>,
    ) -> Result<Markup, String> {
        let ctx = self.ctx;
        let markup = match placeholder {
            Placeholder::Nav => {
                let nav: NavigationData = self.fetch(placeholder)?;
                let grouped = components::render_mobile_nav_panel(&nav, ctx).into_string();
                panel.when_ready(move |p| p.set_links(grouped));
                components::render_navigation(&nav, ctx)
            }
            Placeholder::Footer => {
                let footer: FooterData = self.fetch(placeholder)?;
                components::render_footer(&footer, ctx)
            }
            Placeholder::BlogPosts => {
                let blog: BlogData = self.fetch(placeholder)?;
                components::render_blog_posts(&blog, ctx, false)
            }
            Placeholder::AllBlogPosts => {
                let blog: BlogData = self.fetch(placeholder)?;
                components::render_all_blog_posts(&blog, ctx)
            }
            Placeholder::Projects => {
                let projects: ProjectsData = self.fetch(placeholder)?;
                components::render_projects(&projects, ctx, false)
            }
            Placeholder::AllProjects => {
                let projects: ProjectsData = self.fetch(placeholder)?;
                components::render_all_projects(&projects, ctx)
            }
            Placeholder::AllNews => {
                let news: NewsData = self.fetch(placeholder)?;
                components::render_all_news(&news, ctx)
            }
        };
        Ok(markup)
    }

    fn fetch<T: serde::de::DeserializeOwned>(&self, placeholder: Placeholder) -> Result<T, String> {
        load_json(self.source, placeholder.data_file().file_name()).map_err(|e| e.to_string())
    }
}

/// Availability of one data file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataStatus {
    pub file: DataFile,
    pub location: String,
    /// Number of records (menu entries, posts, …) or the failure.
    pub result: Result<usize, String>,
}

/// Load every data file once and count its records.
pub fn check_data(source: &dyn DataSource) -> Vec<DataStatus> {
    DataFile::ALL
        .iter()
        .map(|&file| {
            let name = file.file_name();
            let result = match file {
                DataFile::Navigation => {
                    load_json::<NavigationData>(source, name).map(|d| d.menu.len())
                }
                DataFile::Footer => load_json::<FooterData>(source, name).map(|d| {
                    d.content_links.len() + d.affiliations.len() + d.social_links.len()
                }),
                DataFile::BlogPosts => load_json::<BlogData>(source, name).map(|d| d.posts.len()),
                DataFile::Projects => {
                    load_json::<ProjectsData>(source, name).map(|d| d.projects.len())
                }
                DataFile::News => load_json::<NewsData>(source, name).map(|d| d.items.len()),
            };
            DataStatus {
                file,
                location: source.locate(name),
                result: result.map_err(|e| e.to_string()),
            }
        })
        .collect()
}
