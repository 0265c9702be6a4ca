// In-memory content source: offline previews (`folio serve --offline`) and
// tests that need a CMS without a network.

use async_trait::async_trait;
use folio_core::Project;
use folio_core::cms::{Media, Paged, Post, PostQuery, Term, TermKind};

use crate::ContentSource;
use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    posts: Vec<Post>,
    media: Vec<Media>,
    tags: Vec<Term>,
    categories: Vec<Term>,
    projects: Vec<Project>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts are kept newest first, matching the REST API ordering
    pub fn with_posts(mut self, mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        self.posts = posts;
        self
    }

    pub fn with_media(mut self, media: Vec<Media>) -> Self {
        self.media = media;
        self
    }

    pub fn with_terms(mut self, kind: TermKind, terms: Vec<Term>) -> Self {
        match kind {
            TermKind::Tag => self.tags = terms,
            TermKind::Category => self.categories = terms,
        }
        self
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    fn terms_of(&self, kind: TermKind) -> &[Term] {
        match kind {
            TermKind::Tag => &self.tags,
            TermKind::Category => &self.categories,
        }
    }
}

fn matches(post: &Post, query: &PostQuery) -> bool {
    let tag_ok = query.tag.is_none_or(|id| post.tags.contains(&id));
    let category_ok = query.category.is_none_or(|id| post.categories.contains(&id));
    let search_ok = query.search.as_deref().is_none_or(|needle| {
        let needle = needle.to_lowercase();
        post.title_text().to_lowercase().contains(&needle)
            || post.content.rendered.to_lowercase().contains(&needle)
    });
    tag_ok && category_ok && search_ok
}

#[async_trait]
impl ContentSource for InMemorySource {
    async fn posts(&self, query: &PostQuery) -> Result<Paged<Post>> {
        let per_page = query.per_page.max(1);
        let selected: Vec<&Post> = self.posts.iter().filter(|p| matches(p, query)).collect();

        let total = selected.len() as u64;
        let total_pages = selected.len().div_ceil(per_page as usize) as u32;
        let skip = (query.page.saturating_sub(1) as usize) * per_page as usize;

        Ok(Paged {
            items: selected
                .into_iter()
                .skip(skip)
                .take(per_page as usize)
                .cloned()
                .collect(),
            page: query.page,
            per_page,
            total,
            total_pages,
        })
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn media(&self, id: u64) -> Result<Option<Media>> {
        Ok(self.media.iter().find(|m| m.id == id).cloned())
    }

    async fn terms(&self, kind: TermKind) -> Result<Vec<Term>> {
        Ok(self.terms_of(kind).to_vec())
    }

    async fn term_by_slug(&self, kind: TermKind, slug: &str) -> Result<Option<Term>> {
        Ok(self.terms_of(kind).iter().find(|t| t.slug == slug).cloned())
    }

    async fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }
}
