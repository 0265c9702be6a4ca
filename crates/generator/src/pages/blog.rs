use folio_core::cms::{Paged, Post, Term, TermKind};
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::components::{Breadcrumbs, CardGrid, Pagination, PostCard, TocNav, page_href};
use crate::schema;
use crate::seo::{Breadcrumb, PageMeta};

use super::{blog_crumb, home_crumb};

const DISPLAY_DATE: &str = "%B %-d, %Y";
const MACHINE_DATE: &str = "%Y-%m-%d";

fn post_grid(posts: &[Post]) -> impl IntoView + use<> {
    if posts.is_empty() {
        view! { <p class="empty-state">"No posts here yet. Check back soon."</p> }.into_any()
    } else {
        let cards = posts
            .iter()
            .cloned()
            .map(|post| view! { <PostCard post=post/> })
            .collect_view();
        view! { <CardGrid>{cards}</CardGrid> }.into_any()
    }
}

impl SiteRenderer {
    /// `/blog` and `/blog/page/{n}`
    pub fn blog(&self, listing: &Paged<Post>) -> String {
        let site = self.site();
        let path = page_href("/blog", listing.page);
        let mut trail = vec![home_crumb(), blog_crumb()];
        if listing.page > 1 {
            trail.push(Breadcrumb::new(format!("Page {}", listing.page), path.clone()));
        }

        let body = view! {
            <div class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">"Blog"</h1>
                    <p class="page-lead">"Notes on WordPress, performance and building for the web."</p>
                </header>
                {post_grid(&listing.items)}
                <Pagination base={"/blog".to_string()} page={listing.page} total_pages={listing.total_pages}/>
            </div>
        }
        .to_html();

        let title = if listing.page > 1 {
            format!("Blog (page {})", listing.page)
        } else {
            "Blog".to_string()
        };
        let meta = PageMeta::new(
            title,
            format!("Articles and notes from {}.", site.meta.name),
            path.clone(),
        );
        let schemas = vec![schema::blog(site, &path, &listing.items)];
        self.page(&meta, schemas, &trail, body)
    }

    /// `/blog/tag/{slug}` and `/blog/category/{slug}`, with `/page/{n}`
    pub fn archive(&self, kind: TermKind, term: &Term, listing: &Paged<Post>) -> String {
        let site = self.site();
        let base = archive_path(kind, &term.slug);
        let path = page_href(&base, listing.page);
        let label = term.label();
        let heading = match kind {
            TermKind::Tag => format!("Posts tagged “{label}”"),
            TermKind::Category => label.clone(),
        };
        let trail = vec![home_crumb(), blog_crumb(), Breadcrumb::new(label.clone(), base.clone())];

        let description = {
            let text = term.description_text();
            if text.is_empty() {
                match kind {
                    TermKind::Tag => format!("Articles tagged {label} on the {} blog.", site.meta.name),
                    TermKind::Category => format!("Articles about {label} on the {} blog.", site.meta.name),
                }
            } else {
                text
            }
        };

        let count = term
            .count
            .map(|n| view! { <p class="archive-count">{format!("{n} article{}", if n == 1 { "" } else { "s" })}</p> });

        let body = view! {
            <div class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">{heading.clone()}</h1>
                    <p class="page-lead">{description.clone()}</p>
                    {count}
                </header>
                {post_grid(&listing.items)}
                <Pagination base=base page={listing.page} total_pages={listing.total_pages}/>
            </div>
        }
        .to_html();

        let mut meta = PageMeta::new(heading.clone(), description.clone(), path.clone());
        // Only the first page of an archive is worth indexing
        if listing.page > 1 {
            meta = meta.noindex();
        }
        let schemas = vec![schema::collection_page(site, &heading, &description, &path)];
        self.page(&meta, schemas, &trail, body)
    }

    /// `/blog/{slug}`: the post body goes through the content pipeline
    pub fn post(&self, post: &Post) -> String {
        let site = self.site();
        let processed = self.content().process_post(post);
        let title = post.title_text();
        let trail = vec![home_crumb(), blog_crumb(), Breadcrumb::new(title.clone(), post.path())];

        let published = post.date.format(DISPLAY_DATE).to_string();
        let machine = post.date.format(MACHINE_DATE).to_string();
        let updated = post
            .modified
            .filter(|m| m.date() > post.date.date())
            .map(|m| {
                let machine = m.format(MACHINE_DATE).to_string();
                let display = format!("Updated {}", m.format(DISPLAY_DATE));
                view! { <time class="post-updated" datetime=machine>{display}</time> }
            });
        let author = post
            .author_name()
            .map(|name| view! { <span class="post-author">{format!("By {name}")}</span> });
        let reading = format!("{} min read", processed.reading_time.max(1));

        let categories = post
            .category_terms()
            .into_iter()
            .map(|t| {
                let href = archive_path(TermKind::Category, &t.slug);
                view! { <a href=href class="post-category">{t.label()}</a> }
            })
            .collect_view();
        let tags = post
            .tag_terms()
            .into_iter()
            .map(|t| {
                let href = archive_path(TermKind::Tag, &t.slug);
                view! { <li><a href=href class="tag">{t.label()}</a></li> }
            })
            .collect_view();

        let image = post.featured_image().map(|media| {
            let src = media.source_url.clone();
            let alt = media.alt_or(&title).to_string();
            let width = media.media_details.as_ref().and_then(|d| d.width).map(|w| w.to_string());
            let height = media.media_details.as_ref().and_then(|d| d.height).map(|h| h.to_string());
            view! { <img class="post-image" src=src alt=alt width=width height=height/> }
        });

        let body = view! {
            <article class="container post">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="post-header">
                    <div class="post-categories">{categories}</div>
                    <h1 class="post-title">{title.clone()}</h1>
                    <p class="post-meta">
                        <time datetime=machine>{published}</time>
                        {updated}
                        {author}
                        <span class="post-reading-time">{reading}</span>
                    </p>
                </header>
                {image}
                <div class="post-layout">
                    <TocNav entries={processed.toc.clone()}/>
                    <div class="prose post-content" inner_html={processed.html.clone()}></div>
                </div>
                <footer class="post-footer">
                    <ul class="tag-list">{tags}</ul>
                    <a href="/blog" class="section-link">"← All posts"</a>
                </footer>
            </article>
        }
        .to_html();

        let mut meta = PageMeta::new(title.clone(), post.excerpt_text(), post.path())
            .article(post.date, post.modified)
            .with_author(post.author_name().map(str::to_string))
            .with_tags(post.tag_terms().iter().map(|t| t.label()).collect());
        if let Some(media) = post.featured_image() {
            meta = meta.with_image(media.source_url.clone(), Some(media.alt_or(&title).to_string()));
        }

        let words = folio_content::word_count(&processed.html);
        let schemas = vec![schema::blog_posting(site, post, words)];
        self.page(&meta, schemas, &trail, body)
    }
}

/// `/blog/tag/{slug}` or `/blog/category/{slug}`
pub fn archive_path(kind: TermKind, slug: &str) -> String {
    format!("/blog/{}/{}", kind.path_segment(), slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, site};
    use std::sync::Arc;

    fn renderer() -> SiteRenderer {
        SiteRenderer::new(Arc::new(site())).unwrap()
    }

    fn listing(page: u32, total_pages: u32, items: Vec<Post>) -> Paged<Post> {
        Paged {
            total: items.len() as u64,
            items,
            page,
            per_page: 9,
            total_pages,
        }
    }

    #[test]
    fn test_blog_index_paginates() {
        let html = renderer().blog(&listing(2, 3, vec![post(1, "hello", "Hello")]));
        assert!(html.contains("<title>Blog (page 2) | Sam Rivera Studio</title>"));
        assert!(html.contains("href=\"https://example.dev/blog/page/2\""));
        assert!(html.contains("href=\"/blog/page/3\""));
        assert!(html.contains("\"@type\":\"Blog\""));
    }

    #[test]
    fn test_empty_blog_shows_empty_state() {
        let html = renderer().blog(&Paged::empty(1, 9));
        assert!(html.contains("No posts here yet"));
        assert!(!html.contains("rel=\"next\""));
    }

    #[test]
    fn test_tag_archive() {
        let term = Term {
            id: 5,
            name: "Rust".to_string(),
            slug: "rust".to_string(),
            taxonomy: "post_tag".to_string(),
            count: Some(1),
            description: String::new(),
        };
        let html = renderer().archive(TermKind::Tag, &term, &listing(1, 1, vec![post(1, "a", "A")]));
        assert!(html.contains("Posts tagged “Rust”"));
        assert!(html.contains("1 article<"));
        assert!(html.contains("https://example.dev/blog/tag/rust"));
        assert!(html.contains("\"@type\":\"CollectionPage\""));
        assert!(!html.contains("noindex"));
    }

    #[test]
    fn test_later_archive_pages_are_noindex() {
        let term = Term {
            slug: "engineering".to_string(),
            name: "Engineering".to_string(),
            ..Term::default()
        };
        let html = renderer().archive(TermKind::Category, &term, &listing(2, 2, vec![]));
        assert!(html.contains("noindex, follow"));
        assert!(html.contains("href=\"/blog/category/engineering\""));
    }

    #[test]
    fn test_post_page() {
        let html = renderer().post(&post(7, "hello-world", "Hello &amp; Welcome"));

        assert!(html.contains("<title>Hello &amp; Welcome | Sam Rivera Studio</title>"));
        assert!(html.contains("id=\"intro\""));
        assert!(html.contains("href=\"#details\""));
        assert!(html.contains("1 min read"));
        assert!(html.contains("href=\"/blog/tag/rust\""));
        assert!(html.contains("href=\"/blog/category/engineering\""));
        assert!(html.contains("og:type\" content=\"article\""));
        assert!(html.contains("\"@type\":\"BlogPosting\""));
        assert!(html.contains("January 15, 2025"));
    }

    #[test]
    fn test_archive_path() {
        assert_eq!(archive_path(TermKind::Tag, "rust"), "/blog/tag/rust");
        assert_eq!(archive_path(TermKind::Category, "news"), "/blog/category/news");
    }
}
