//! WordPress REST entities.
//!
//! These mirror the default `wp/v2` response schema closely enough to
//! deserialize posts, media and taxonomy terms. Every field the site does not
//! strictly need is defaulted: embedded objects in particular come back as
//! `{code, message}` error stubs when the API user lacks permission, and a
//! single bad embed must not fail the whole post.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::text::{collapse_whitespace, decode_entities, html_to_text, strip_tags};

/// `{"rendered": "..."}` wrapper used for titles and excerpts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

/// Post body: server-rendered HTML plus, in edit context, the block markup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostContent {
    #[serde(default)]
    pub rendered: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default)]
    pub protected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub date: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub title: Rendered,
    #[serde(default)]
    pub content: PostContent,
    #[serde(default)]
    pub excerpt: Rendered,
    #[serde(default)]
    pub author: u64,
    #[serde(default)]
    pub featured_media: u64,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

impl Post {
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Title as plain text ("Don&#8217;t" -> "Don’t")
    pub fn title_text(&self) -> String {
        html_to_text(&self.title.rendered)
    }

    /// Excerpt as plain text, without WordPress' trailing "[…]" marker
    pub fn excerpt_text(&self) -> String {
        let text = html_to_text(&self.excerpt.rendered);
        let text = text.strip_suffix("[…]").unwrap_or(&text);
        collapse_whitespace(text)
    }

    /// Serialized block markup, when the API exposed it and it is non-blank
    pub fn block_markup(&self) -> Option<&str> {
        self.content
            .raw
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
    }

    pub fn modified_or_published(&self) -> NaiveDateTime {
        self.modified.unwrap_or(self.date)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .author
            .iter()
            .find(|a| !a.name.is_empty())
            .map(|a| a.name.as_str())
    }

    pub fn featured_image(&self) -> Option<&Media> {
        self.embedded
            .as_ref()?
            .featured_media
            .iter()
            .find(|m| !m.source_url.is_empty())
    }

    /// Embedded terms of one taxonomy ("post_tag", "category")
    pub fn terms(&self, taxonomy: &str) -> Vec<&Term> {
        self.embedded
            .iter()
            .flat_map(|e| e.terms.iter().flatten())
            .filter(|t| t.taxonomy == taxonomy && !t.slug.is_empty())
            .collect()
    }

    pub fn tag_terms(&self) -> Vec<&Term> {
        self.terms("post_tag")
    }

    pub fn category_terms(&self) -> Vec<&Term> {
        self.terms("category")
    }
}

/// `_embedded` block returned with `?_embed=1`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(default)]
    pub author: Vec<Author>,
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<Media>,
    #[serde(rename = "wp:term", default)]
    pub terms: Vec<Vec<Term>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_details: Option<MediaDetails>,
}

impl Media {
    /// Alt text, falling back to the caller's description when the editor
    /// left it empty
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.alt_text.trim().is_empty() {
            fallback
        } else {
            &self.alt_text
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Taxonomy term (tag or category)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Term {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub taxonomy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default)]
    pub description: String,
}

impl Term {
    /// Display name with entities decoded ("Tips &amp; Tricks" -> "Tips & Tricks")
    pub fn label(&self) -> String {
        decode_entities(&self.name)
    }

    pub fn description_text(&self) -> String {
        collapse_whitespace(&decode_entities(&strip_tags(&self.description)))
    }
}

pub type Tag = Term;
pub type Category = Term;

/// Which archive a post listing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Tag,
    Category,
}

impl TermKind {
    /// REST collection / query parameter name
    pub fn rest_name(self) -> &'static str {
        match self {
            TermKind::Tag => "tags",
            TermKind::Category => "categories",
        }
    }

    /// URL segment under /blog
    pub fn path_segment(self) -> &'static str {
        match self {
            TermKind::Tag => "tag",
            TermKind::Category => "category",
        }
    }
}

/// Query for a page of posts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub page: u32,
    pub per_page: u32,
    pub tag: Option<u64>,
    pub category: Option<u64>,
    pub search: Option<String>,
}

impl PostQuery {
    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page,
            tag: None,
            category: None,
            search: None,
        }
    }

    pub fn with_term(mut self, kind: TermKind, id: u64) -> Self {
        match kind {
            TermKind::Tag => self.tag = Some(id),
            TermKind::Category => self.category = Some(id),
        }
        self
    }
}

impl Default for PostQuery {
    fn default() -> Self {
        Self::page(1, 10)
    }
}

/// One page of a paginated collection
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Paged<T> {
    pub fn empty(page: u32, per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            page,
            per_page,
            total: 0,
            total_pages: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post_json() -> serde_json::Value {
        serde_json::json!({
            "id": 42,
            "date": "2025-03-04T09:30:00",
            "modified": "2025-03-05T10:00:00",
            "slug": "headless-wordpress",
            "link": "https://cms.example.dev/headless-wordpress/",
            "title": { "rendered": "Going Headless: WordPress &amp; Rust" },
            "content": { "rendered": "<p>Body</p>", "protected": false },
            "excerpt": { "rendered": "<p>Why we moved the front end off PHP&#8230; [&hellip;]</p>\n" },
            "author": 1,
            "featured_media": 7,
            "categories": [3],
            "tags": [5, 6],
            "_embedded": {
                "author": [{ "id": 1, "name": "Sam Rivera", "slug": "sam" }],
                "wp:featuredmedia": [{
                    "id": 7,
                    "source_url": "https://cms.example.dev/uploads/hero.jpg",
                    "alt_text": "",
                    "media_details": { "width": 1200, "height": 630 }
                }],
                "wp:term": [
                    [{ "id": 3, "name": "Engineering", "slug": "engineering", "taxonomy": "category" }],
                    [
                        { "id": 5, "name": "WordPress", "slug": "wordpress", "taxonomy": "post_tag" },
                        { "id": 6, "name": "Tips &amp; Tricks", "slug": "tips", "taxonomy": "post_tag" }
                    ]
                ]
            }
        })
    }

    #[test]
    fn test_deserialize_embedded_post() {
        let post: Post = serde_json::from_value(sample_post_json()).unwrap();
        assert_eq!(post.id, 42);
        assert_eq!(post.title_text(), "Going Headless: WordPress & Rust");
        assert_eq!(post.excerpt_text(), "Why we moved the front end off PHP…");
        assert_eq!(post.author_name(), Some("Sam Rivera"));
        assert_eq!(
            post.featured_image().map(|m| m.source_url.as_str()),
            Some("https://cms.example.dev/uploads/hero.jpg")
        );
        assert_eq!(post.tag_terms().len(), 2);
        assert_eq!(post.tag_terms()[1].label(), "Tips & Tricks");
        assert_eq!(post.category_terms()[0].slug, "engineering");
        assert_eq!(post.block_markup(), None);
    }

    #[test]
    fn test_deserialize_tolerates_forbidden_embeds() {
        let mut json = sample_post_json();
        json["_embedded"]["wp:featuredmedia"] = serde_json::json!([{
            "code": "rest_forbidden",
            "message": "Sorry, you are not allowed to do that.",
            "data": { "status": 401 }
        }]);
        json["_embedded"]["author"] = serde_json::json!([{ "code": "rest_user_invalid_id" }]);

        let post: Post = serde_json::from_value(json).unwrap();
        assert!(post.featured_image().is_none());
        assert!(post.author_name().is_none());
    }

    #[test]
    fn test_block_markup_ignores_blank_raw() {
        let mut json = sample_post_json();
        json["content"]["raw"] = serde_json::json!("   \n");
        let post: Post = serde_json::from_value(json).unwrap();
        assert_eq!(post.block_markup(), None);
    }

    #[test]
    fn test_minimal_post() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": 1,
            "slug": "hello-world",
            "date": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(post.title_text(), "");
        assert!(post.terms("post_tag").is_empty());
        assert_eq!(post.modified_or_published(), post.date);
    }

    #[test]
    fn test_paged_navigation() {
        let mut page: Paged<u32> = Paged::empty(1, 10);
        assert!(!page.has_next());
        assert!(!page.has_prev());
        page.total_pages = 3;
        assert!(page.has_next());
        page.page = 3;
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_post_query_clamps_page() {
        let query = PostQuery::page(0, 9).with_term(TermKind::Tag, 5);
        assert_eq!(query.page, 1);
        assert_eq!(query.tag, Some(5));
        assert_eq!(query.category, None);
    }
}
