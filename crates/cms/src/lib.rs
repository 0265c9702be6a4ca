// Content sources for the site: the WordPress REST API, and an in-memory
// source for offline previews and tests.

pub mod error;
pub mod memory;
pub mod wordpress;

use async_trait::async_trait;
use folio_core::Project;
use folio_core::cms::{Media, Paged, Post, PostQuery, Term, TermKind};

pub use error::{CmsError, Result};
pub use memory::InMemorySource;
pub use wordpress::WordPressClient;

/// Read-only access to blog posts, media, taxonomy terms and CMS projects
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// One page of published posts, newest first
    async fn posts(&self, query: &PostQuery) -> Result<Paged<Post>>;

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    async fn media(&self, id: u64) -> Result<Option<Media>>;

    async fn terms(&self, kind: TermKind) -> Result<Vec<Term>>;

    async fn term_by_slug(&self, kind: TermKind, slug: &str) -> Result<Option<Term>>;

    /// Portfolio entries of the `projects` post type
    async fn projects(&self) -> Result<Vec<Project>>;

    async fn tags(&self) -> Result<Vec<Term>> {
        self.terms(TermKind::Tag).await
    }

    async fn categories(&self) -> Result<Vec<Term>> {
        self.terms(TermKind::Category).await
    }

    async fn tag_by_slug(&self, slug: &str) -> Result<Option<Term>> {
        self.term_by_slug(TermKind::Tag, slug).await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Term>> {
        self.term_by_slug(TermKind::Category, slug).await
    }
}
