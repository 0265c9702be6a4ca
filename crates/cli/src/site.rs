//! Page data loading.
//!
//! Every loader degrades instead of failing: a listing that cannot be fetched
//! renders empty, a post that cannot be fetched is treated as missing. The
//! failure is logged and the page still renders.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use folio_cms::wordpress::{CMS_PASSWORD_ENV, CMS_USER_ENV};
use folio_cms::{ContentSource, InMemorySource, WordPressClient};
use folio_core::cms::{Paged, Post, PostQuery, Term, TermKind};
use folio_core::{Project, ProjectSource, Site, parse_site_toml};
use folio_generator::SiteRenderer;
use tracing::{debug, error, info, warn};

/// Upper bound on post pages walked by a full export
const MAX_EXPORT_PAGES: u32 = 500;

/// Load and validate `<dir>/site.toml`
pub fn load_site(dir: &Path) -> Result<Site> {
    let config_path = dir.join("site.toml");
    if !config_path.exists() {
        anyhow::bail!(
            "site.toml not found in {}\nRun 'folio init {}' first",
            dir.display(),
            dir.display()
        );
    }
    parse_site_toml(&config_path).context("Failed to parse site.toml")
}

/// WordPress client for the configured CMS, authenticated when
/// application password credentials are present in the environment
pub fn wordpress_source(site: &Site) -> Result<Arc<dyn ContentSource>> {
    let mut client = WordPressClient::from_config(&site.cms).context("Invalid CMS configuration")?;
    if let (Ok(user), Ok(password)) = (std::env::var(CMS_USER_ENV), std::env::var(CMS_PASSWORD_ENV)) {
        debug!(%user, "Using authenticated CMS requests");
        client = client.with_credentials(user, password);
    }
    Ok(Arc::new(client))
}

/// Content source without a CMS: blog pages render empty
pub fn offline_source() -> Arc<dyn ContentSource> {
    Arc::new(InMemorySource::new())
}

/// The renderer plus the content source behind it
pub struct SiteData {
    renderer: SiteRenderer,
    source: Arc<dyn ContentSource>,
}

impl SiteData {
    pub fn new(renderer: SiteRenderer, source: Arc<dyn ContentSource>) -> Self {
        Self { renderer, source }
    }

    pub fn renderer(&self) -> &SiteRenderer {
        &self.renderer
    }

    pub fn site(&self) -> &Site {
        self.renderer.site()
    }

    pub fn per_page(&self) -> u32 {
        self.site().cms.per_page
    }

    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.site().cms.revalidate_secs)
    }

    /// One page of posts; empty on failure
    pub async fn posts(&self, query: &PostQuery) -> Paged<Post> {
        match self.source.posts(query).await {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, page = query.page, "Failed to fetch posts");
                Paged::empty(query.page, query.per_page)
            }
        }
    }

    pub async fn recent_posts(&self, count: u32) -> Vec<Post> {
        self.posts(&PostQuery::page(1, count)).await.items
    }

    /// `None` when the post does not exist or cannot be fetched
    pub async fn post(&self, slug: &str) -> Option<Post> {
        match self.source.post_by_slug(slug).await {
            Ok(post) => post,
            Err(e) => {
                error!(error = %e, slug, "Failed to fetch post");
                None
            }
        }
    }

    pub async fn term(&self, kind: TermKind, slug: &str) -> Option<Term> {
        match self.source.term_by_slug(kind, slug).await {
            Ok(term) => term,
            Err(e) => {
                error!(error = %e, slug, taxonomy = kind.rest_name(), "Failed to fetch term");
                None
            }
        }
    }

    pub async fn terms(&self, kind: TermKind) -> Vec<Term> {
        match self.source.terms(kind).await {
            Ok(terms) => terms,
            Err(e) => {
                error!(error = %e, taxonomy = kind.rest_name(), "Failed to fetch terms");
                Vec::new()
            }
        }
    }

    /// Projects from site.toml, or from the CMS when configured so. A CMS
    /// failure falls back to the site.toml entries.
    pub async fn projects(&self) -> Vec<Project> {
        match self.site().cms.projects {
            ProjectSource::Static => self.site().projects.clone(),
            ProjectSource::Cms => match self.source.projects().await {
                Ok(projects) => projects,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch CMS projects, using site.toml projects");
                    self.site().projects.clone()
                }
            },
        }
    }

    pub async fn project(&self, slug: &str) -> Option<Project> {
        self.projects().await.into_iter().find(|p| p.slug == slug)
    }

    /// Every page of a post listing, for static export and the sitemap
    pub async fn all_pages(&self, base: PostQuery) -> Vec<Paged<Post>> {
        let mut pages = Vec::new();
        let mut page = 1;

        loop {
            let query = PostQuery { page, ..base.clone() };
            let listing = self.posts(&query).await;
            let more = listing.has_next() && page < MAX_EXPORT_PAGES;
            pages.push(listing);
            if !more {
                break;
            }
            page += 1;
        }

        info!(pages = pages.len(), "Fetched post listing");
        pages
    }

    pub async fn all_posts(&self) -> Vec<Post> {
        self.all_pages(PostQuery::page(1, self.per_page()))
            .await
            .into_iter()
            .flat_map(|p| p.items)
            .collect()
    }
}
