use serde::{Deserialize, Serialize};

use crate::text::slugify;

/// Complete site configuration, loaded from site.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub meta: SiteMeta,
    pub owner: Owner,
    pub cms: CmsConfig,
    pub contact: ContactConfig,
    pub home: HomeContent,
    pub about: AboutContent,
    pub nav: Vec<NavItem>,
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
}

impl Site {
    /// Absolute URL for a site path ("/blog" -> "https://example.dev/blog")
    pub fn url(&self, path: &str) -> String {
        let base = self.meta.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            format!("{}/", base)
        } else if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    pub fn service(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug == slug)
    }

    pub fn featured_projects(&self) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.featured).collect()
    }
}

/// Site-wide metadata used for SEO defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMeta {
    pub name: String,
    pub base_url: String,
    pub description: String,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_image: Option<String>,
}

impl SiteMeta {
    /// BCP 47 language tag for the `<html lang>` attribute ("en_US" -> "en")
    pub fn language(&self) -> &str {
        self.locale
            .split(['_', '-'])
            .next()
            .filter(|l| !l.is_empty())
            .unwrap_or("en")
    }
}

/// The freelancer behind the site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub job_title: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub same_as: Vec<String>,
}

/// Where project entries come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectSource {
    #[default]
    Static,
    Cms,
}

/// Headless WordPress settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// REST root, e.g. "https://cms.example.dev/wp-json"
    pub base_url: String,
    /// Freshness window for CMS-backed pages, in seconds
    pub revalidate_secs: u64,
    pub per_page: u32,
    pub timeout_secs: u64,
    pub projects: ProjectSource,
}

/// Contact form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// External form/email handler that receives submissions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeContent {
    pub headline: String,
    pub tagline: String,
    /// Markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub cta_label: String,
    pub cta_href: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AboutContent {
    pub headline: String,
    /// Markdown
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

/// A service offering, rendered at /services/{slug}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub slug: String,
    pub title: String,
    pub summary: String,
    /// Markdown
    pub body: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_from: Option<String>,
    pub keywords: Vec<String>,
}

impl Service {
    pub fn path(&self) -> String {
        format!("/services/{}", self.slug)
    }
}

/// Portfolio entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub summary: String,
    /// Markdown (projects declared in site.toml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Pre-rendered HTML (projects fetched from the CMS)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub featured: bool,
}

impl Project {
    pub fn path(&self) -> String {
        format!("/projects/{}", self.slug)
    }

    /// URL-safe form of the category ("Web Apps" -> "web-apps")
    pub fn category_slug(&self) -> String {
        slugify(&self.category)
    }
}

/// Distinct project categories in first-seen order, as (slug, label)
pub fn project_categories(projects: &[Project]) -> Vec<(String, String)> {
    let mut seen: Vec<(String, String)> = Vec::new();
    for project in projects {
        let slug = project.category_slug();
        if !seen.iter().any(|(s, _)| *s == slug) {
            seen.push((slug, project.category.clone()));
        }
    }
    seen
}
