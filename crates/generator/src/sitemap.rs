//! sitemap.xml and robots.txt

use chrono::NaiveDateTime;
use folio_core::cms::{Post, Term, TermKind};
use folio_core::text::html_escape;
use folio_core::{Project, project_categories};

use crate::SiteRenderer;
use crate::pages::{archive_path, category_path};

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub path: String,
    pub lastmod: Option<NaiveDateTime>,
    pub priority: f32,
}

impl SitemapEntry {
    pub fn new(path: impl Into<String>, priority: f32) -> Self {
        Self {
            path: path.into(),
            lastmod: None,
            priority,
        }
    }
}

/// Everything the sitemap lists, gathered by the caller
#[derive(Debug, Default)]
pub struct SitemapSources<'a> {
    pub posts: &'a [Post],
    pub projects: &'a [Project],
    pub tags: &'a [Term],
    pub categories: &'a [Term],
}

impl SiteRenderer {
    /// Static routes, services, projects, posts and archives
    pub fn sitemap_entries(&self, sources: &SitemapSources<'_>) -> Vec<SitemapEntry> {
        let site = self.site();
        let mut entries = vec![
            SitemapEntry::new("/", 1.0),
            SitemapEntry::new("/about", 0.8),
            SitemapEntry::new("/services", 0.9),
            SitemapEntry::new("/projects", 0.8),
            SitemapEntry::new("/blog", 0.8),
            SitemapEntry::new("/contact", 0.7),
        ];

        entries.extend(site.services.iter().map(|s| SitemapEntry::new(s.path(), 0.9)));
        entries.extend(sources.projects.iter().map(|p| SitemapEntry::new(p.path(), 0.7)));
        entries.extend(
            project_categories(sources.projects)
                .into_iter()
                .map(|(slug, _)| SitemapEntry::new(category_path(&slug), 0.5)),
        );
        entries.extend(sources.posts.iter().map(|post| SitemapEntry {
            path: post.path(),
            lastmod: Some(post.modified_or_published()),
            priority: 0.6,
        }));
        entries.extend(
            sources
                .categories
                .iter()
                .map(|t| SitemapEntry::new(archive_path(TermKind::Category, &t.slug), 0.4)),
        );
        entries.extend(
            sources
                .tags
                .iter()
                .map(|t| SitemapEntry::new(archive_path(TermKind::Tag, &t.slug), 0.3)),
        );

        entries
    }

    pub fn sitemap(&self, entries: &[SitemapEntry]) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!(
                "    <loc>{}</loc>\n",
                html_escape(&self.site().url(&entry.path))
            ));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod.format("%Y-%m-%d")));
            }
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }
        xml.push_str("</urlset>\n");
        xml
    }

    pub fn robots(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\nDisallow: /_reload\n\nSitemap: {}\n",
            self.site().url("/sitemap.xml")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, site};
    use std::sync::Arc;

    #[test]
    fn test_sitemap_lists_every_kind_of_page() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        let posts = vec![post(1, "hello", "Hello")];
        let projects = renderer.site().projects.clone();
        let tags = vec![Term {
            slug: "rust".to_string(),
            ..Term::default()
        }];
        let entries = renderer.sitemap_entries(&SitemapSources {
            posts: &posts,
            projects: &projects,
            tags: &tags,
            categories: &[],
        });
        let xml = renderer.sitemap(&entries);

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://example.dev/</loc>"));
        assert!(xml.contains("<loc>https://example.dev/services/wordpress</loc>"));
        assert!(xml.contains("<loc>https://example.dev/projects/bakery-shop</loc>"));
        assert!(xml.contains("<loc>https://example.dev/projects/category/e-commerce</loc>"));
        assert!(xml.contains("<loc>https://example.dev/blog/hello</loc>"));
        assert!(xml.contains("<lastmod>2025-01-15</lastmod>"));
        assert!(xml.contains("<loc>https://example.dev/blog/tag/rust</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }

    #[test]
    fn test_robots_points_at_sitemap() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        assert!(renderer.robots().contains("Sitemap: https://example.dev/sitemap.xml"));
    }
}
