//! Page handlers.
//!
//! Handlers never fail: missing content is a 404 page, and fetch failures
//! degrade inside [`SiteData`].

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use folio_core::ProjectSource;
use folio_core::cms::{PostQuery, TermKind};
use folio_generator::{ContactFormState, SitemapSources, archive_path};
use tracing::debug;

use super::response::{Freshness, HTML, TEXT, XML, cached, html};
use super::serve::AppState;
use crate::site::SiteData;

const HOME_RECENT_POSTS: u32 = 3;

fn cms_freshness(data: &SiteData) -> Freshness {
    Freshness::Cms(data.revalidate())
}

fn project_freshness(data: &SiteData) -> Freshness {
    match data.site().cms.projects {
        ProjectSource::Static => Freshness::Static,
        ProjectSource::Cms => cms_freshness(data),
    }
}

fn not_found_page(data: &SiteData, headers: &HeaderMap, path: &str) -> Response {
    debug!(path, "Not found");
    html(
        headers,
        StatusCode::NOT_FOUND,
        data.renderer().not_found(path),
        Freshness::NoStore,
    )
}

/// Listing page number from a `/page/{n}` segment. Page 1 has no such URL.
enum PageNumber {
    First,
    Later(u32),
    Invalid,
}

fn page_number(raw: &str) -> PageNumber {
    match raw.parse::<u32>() {
        Ok(1) => PageNumber::First,
        Ok(n) if n > 1 => PageNumber::Later(n),
        _ => PageNumber::Invalid,
    }
}

pub(super) async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    let (posts, projects) = tokio::join!(data.recent_posts(HOME_RECENT_POSTS), data.projects());
    let body = data.renderer().home(&posts, &projects);
    html(&headers, StatusCode::OK, body, cms_freshness(&data))
}

pub(super) async fn about(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    html(&headers, StatusCode::OK, data.renderer().about(), Freshness::Static)
}

pub(super) async fn services(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    html(&headers, StatusCode::OK, data.renderer().services(), Freshness::Static)
}

pub(super) async fn service(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let data = state.data();
    match data.site().service(&slug) {
        Some(service) => html(
            &headers,
            StatusCode::OK,
            data.renderer().service(service),
            Freshness::Static,
        ),
        None => not_found_page(&data, &headers, &format!("/services/{}", slug)),
    }
}

pub(super) async fn projects(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    let projects = data.projects().await;
    match data.renderer().projects(&projects, None) {
        Some(body) => html(&headers, StatusCode::OK, body, project_freshness(&data)),
        None => not_found_page(&data, &headers, "/projects"),
    }
}

pub(super) async fn project_category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(category): Path<String>,
) -> Response {
    let data = state.data();
    let projects = data.projects().await;
    match data.renderer().projects(&projects, Some(&category)) {
        Some(body) => html(&headers, StatusCode::OK, body, project_freshness(&data)),
        None => not_found_page(&data, &headers, &format!("/projects/category/{}", category)),
    }
}

pub(super) async fn project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let data = state.data();
    match data.project(&slug).await {
        Some(project) => html(
            &headers,
            StatusCode::OK,
            data.renderer().project(&project),
            project_freshness(&data),
        ),
        None => not_found_page(&data, &headers, &format!("/projects/{}", slug)),
    }
}

async fn blog_listing(data: &SiteData, headers: &HeaderMap, page: u32) -> Response {
    let listing = data.posts(&PostQuery::page(page, data.per_page())).await;
    if page > 1 && listing.items.is_empty() {
        return not_found_page(data, headers, &format!("/blog/page/{}", page));
    }
    html(
        headers,
        StatusCode::OK,
        data.renderer().blog(&listing),
        cms_freshness(data),
    )
}

pub(super) async fn blog(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    blog_listing(&data, &headers, 1).await
}

pub(super) async fn blog_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(page): Path<String>,
) -> Response {
    let data = state.data();
    match page_number(&page) {
        PageNumber::First => Redirect::permanent("/blog").into_response(),
        PageNumber::Later(n) => blog_listing(&data, &headers, n).await,
        PageNumber::Invalid => not_found_page(&data, &headers, &format!("/blog/page/{}", page)),
    }
}

pub(super) async fn post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let data = state.data();
    match data.post(&slug).await {
        Some(post) => html(
            &headers,
            StatusCode::OK,
            data.renderer().post(&post),
            cms_freshness(&data),
        ),
        None => not_found_page(&data, &headers, &format!("/blog/{}", slug)),
    }
}

async fn term_archive(
    data: &SiteData,
    headers: &HeaderMap,
    kind: TermKind,
    slug: &str,
    page: u32,
) -> Response {
    let path = archive_path(kind, slug);
    let Some(term) = data.term(kind, slug).await else {
        return not_found_page(data, headers, &path);
    };

    let query = PostQuery::page(page, data.per_page()).with_term(kind, term.id);
    let listing = data.posts(&query).await;
    if page > 1 && listing.items.is_empty() {
        return not_found_page(data, headers, &format!("{}/page/{}", path, page));
    }

    html(
        headers,
        StatusCode::OK,
        data.renderer().archive(kind, &term, &listing),
        cms_freshness(data),
    )
}

async fn term_archive_page(
    data: &SiteData,
    headers: &HeaderMap,
    kind: TermKind,
    slug: &str,
    page: &str,
) -> Response {
    match page_number(page) {
        PageNumber::First => Redirect::permanent(&archive_path(kind, slug)).into_response(),
        PageNumber::Later(n) => term_archive(data, headers, kind, slug, n).await,
        PageNumber::Invalid => not_found_page(
            data,
            headers,
            &format!("{}/page/{}", archive_path(kind, slug), page),
        ),
    }
}

pub(super) async fn tag(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let data = state.data();
    term_archive(&data, &headers, TermKind::Tag, &slug, 1).await
}

pub(super) async fn tag_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((slug, page)): Path<(String, String)>,
) -> Response {
    let data = state.data();
    term_archive_page(&data, &headers, TermKind::Tag, &slug, &page).await
}

pub(super) async fn category(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let data = state.data();
    term_archive(&data, &headers, TermKind::Category, &slug, 1).await
}

pub(super) async fn category_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((slug, page)): Path<(String, String)>,
) -> Response {
    let data = state.data();
    term_archive_page(&data, &headers, TermKind::Category, &slug, &page).await
}

pub(super) async fn contact(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    let body = data.renderer().contact(&ContactFormState::default());
    html(&headers, StatusCode::OK, body, Freshness::Static)
}

pub(super) async fn sitemap(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    let (posts, projects, tags, categories) = tokio::join!(
        data.all_posts(),
        data.projects(),
        data.terms(TermKind::Tag),
        data.terms(TermKind::Category),
    );
    let tags: Vec<_> = tags.into_iter().filter(|t| t.count != Some(0)).collect();
    let categories: Vec<_> = categories.into_iter().filter(|t| t.count != Some(0)).collect();

    let renderer = data.renderer();
    let entries = renderer.sitemap_entries(&SitemapSources {
        posts: &posts,
        projects: &projects,
        tags: &tags,
        categories: &categories,
    });
    cached(
        &headers,
        StatusCode::OK,
        XML,
        renderer.sitemap(&entries),
        cms_freshness(&data),
    )
}

pub(super) async fn robots(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let data = state.data();
    cached(
        &headers,
        StatusCode::OK,
        TEXT,
        data.renderer().robots(),
        Freshness::Static,
    )
}

/// Fallback for anything no route or static file answered
pub(super) async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let data = state.data();
    (
        StatusCode::NOT_FOUND,
        [(axum::http::header::CONTENT_TYPE, HTML)],
        data.renderer().not_found(uri.path()),
    )
        .into_response()
}
