//! Content records read from the site's JSON data files.
//!
//! Every record is read once, rendered, and dropped. Fields mirror the
//! camelCase keys used in the data files; anything the templates do not
//! use is ignored. Missing fields deserialize to empty values so a sparse
//! data file still renders (with blanks) instead of failing.

use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit `null` the same as a missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `navigation.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationData {
    /// Header logo link. Falls back to the configured logo when absent.
    pub logo: Option<Logo>,
    #[serde(deserialize_with = "nullable")]
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logo {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

/// A top-level navigation entry.
///
/// Dropdowns are one level deep: children are plain [`NavLink`]s.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    /// `"dropdown"` for entries with children; anything else is a link.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub children: Vec<NavLink>,
}

impl MenuItem {
    /// True when the entry renders as a dropdown with a nested list.
    pub fn is_dropdown(&self) -> bool {
        self.kind.as_deref() == Some("dropdown") && !self.children.is_empty()
    }
}

/// A `{name, url}` pair used for dropdown children and footer link lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavLink {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

/// `footer.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterData {
    #[serde(deserialize_with = "nullable")]
    pub content_links: Vec<NavLink>,
    #[serde(deserialize_with = "nullable")]
    pub affiliations: Vec<NavLink>,
    #[serde(deserialize_with = "nullable")]
    pub social_links: Vec<SocialLink>,
    #[serde(deserialize_with = "nullable")]
    pub contact: Contact,
    #[serde(deserialize_with = "nullable")]
    pub copyright: Copyright,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    /// Icon class suffix, e.g. `fa-github`.
    #[serde(deserialize_with = "nullable")]
    pub icon: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "nullable")]
    pub address: Address,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "nullable")]
    pub organization: String,
    #[serde(deserialize_with = "nullable")]
    pub street: String,
    #[serde(deserialize_with = "nullable")]
    pub city: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Copyright {
    /// Kept as a raw JSON value: data files use both `2025` and `"2025"`.
    pub year: serde_json::Value,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    #[serde(deserialize_with = "nullable")]
    pub link: CopyrightLink,
}

impl Copyright {
    /// The year as display text; empty when missing.
    pub fn year_text(&self) -> String {
        match &self.year {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyrightLink {
    #[serde(deserialize_with = "nullable")]
    pub text: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
}

/// `blog-posts.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogData {
    #[serde(deserialize_with = "nullable")]
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub image: String,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: String,
    #[serde(deserialize_with = "nullable")]
    pub date_display: String,
}

/// `projects.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectsData {
    #[serde(deserialize_with = "nullable")]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub image: String,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: String,
    /// Short status badge, e.g. `Active` or `Completed`.
    pub status: Option<String>,
    /// When set, the project is shown locked: no links, and this text
    /// appears in an info tooltip over the image.
    pub notice: Option<String>,
}

impl Project {
    pub fn is_locked(&self) -> bool {
        self.notice.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// `news.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsData {
    #[serde(deserialize_with = "nullable")]
    pub items: Vec<NewsItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    pub image: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub excerpt: String,
    #[serde(deserialize_with = "nullable")]
    pub source: String,
    #[serde(deserialize_with = "nullable")]
    pub date_display: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

/// Records that carry a page URL and can be excluded from "other items"
/// listings on their own page.
pub trait Linked {
    fn url(&self) -> &str;
}

impl Linked for Post {
    fn url(&self) -> &str {
        &self.url
    }
}

impl Linked for Project {
    fn url(&self) -> &str {
        &self.url
    }
}

impl Linked for NewsItem {
    fn url(&self) -> &str {
        &self.url
    }
}
