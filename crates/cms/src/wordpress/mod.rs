// WordPress REST API client (wp/v2)

use std::time::Duration;

use async_trait::async_trait;
use folio_core::cms::{Embedded, Media, Paged, Post, PostContent, PostQuery, Rendered, Term, TermKind};
use folio_core::text::html_to_text;
use folio_core::{CmsConfig, Project};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::ContentSource;
use crate::error::{CmsError, Result};

/// Application password credentials, read by the CLI
pub const CMS_USER_ENV: &str = "FOLIO_CMS_USER";
pub const CMS_PASSWORD_ENV: &str = "FOLIO_CMS_APP_PASSWORD";

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Largest page the REST API accepts
const MAX_PER_PAGE: u32 = 100;

/// Post type slug for portfolio entries
const PROJECTS_TYPE: &str = "projects";

pub struct WordPressClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl WordPressClient {
    /// `base_url` is the REST root, e.g. "https://cms.example.dev/wp-json"
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CmsError::Config(format!(
                "CMS URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            credentials: None,
        })
    }

    pub fn from_config(cms: &CmsConfig) -> Result<Self> {
        Self::new(&cms.base_url, Duration::from_secs(cms.timeout_secs))
    }

    /// Authenticate with an application password. Authenticated requests
    /// use the edit context, which exposes the raw block markup of posts.
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((user.into(), password.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp/v2/{}", self.base_url, path)
    }

    fn context(&self) -> &'static str {
        if self.credentials.is_some() {
            "edit"
        } else {
            "view"
        }
    }

    async fn send(&self, path: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        debug!(%url, ?query, "GET");

        let mut request = self.client.get(&url).query(query);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, Some(password));
        }

        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(api_error(response).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, HeaderMap)> {
        let response = self.send(path, query).await?;
        let headers = response.headers().clone();
        let body = response.text().await?;
        let value = serde_json::from_str(&body).map_err(|e| CmsError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;
        Ok((value, headers))
    }

    /// Every page of a collection, for taxonomies and projects
    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut paged_query = query.to_vec();
            paged_query.push(("per_page", MAX_PER_PAGE.to_string()));
            paged_query.push(("page", page.to_string()));

            let (batch, headers): (Vec<T>, _) = self.get_json(path, &paged_query).await?;
            let (_, total_pages) = pagination(&headers, batch.len());
            items.extend(batch);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl ContentSource for WordPressClient {
    async fn posts(&self, query: &PostQuery) -> Result<Paged<Post>> {
        let per_page = query.per_page.clamp(1, MAX_PER_PAGE);
        let mut params = vec![
            ("_embed", "1".to_string()),
            ("page", query.page.to_string()),
            ("per_page", per_page.to_string()),
            ("orderby", "date".to_string()),
            ("order", "desc".to_string()),
        ];
        if let Some(tag) = query.tag {
            params.push(("tags", tag.to_string()));
        }
        if let Some(category) = query.category {
            params.push(("categories", category.to_string()));
        }
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }

        match self.get_json::<Vec<Post>>("posts", &params).await {
            Ok((items, headers)) => {
                let (total, total_pages) = pagination(&headers, items.len());
                Ok(Paged {
                    items,
                    page: query.page,
                    per_page,
                    total,
                    total_pages,
                })
            }
            // Requesting past the last page is not an error for the site
            Err(e) if e.code() == Some("rest_post_invalid_page_number") => {
                debug!(page = query.page, "page past the end of the post list");
                Ok(Paged::empty(query.page, per_page))
            }
            Err(e) => Err(e),
        }
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let params = [
            ("slug", slug.to_string()),
            ("_embed", "1".to_string()),
            ("context", self.context().to_string()),
        ];
        let (posts, _): (Vec<Post>, _) = self.get_json("posts", &params).await?;
        Ok(posts.into_iter().next())
    }

    async fn media(&self, id: u64) -> Result<Option<Media>> {
        match self.get_json::<Media>(&format!("media/{id}"), &[]).await {
            Ok((media, _)) => Ok(Some(media)),
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND.as_u16()) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn terms(&self, kind: TermKind) -> Result<Vec<Term>> {
        let params = [("hide_empty", "true".to_string())];
        self.get_all(kind.rest_name(), &params).await
    }

    async fn term_by_slug(&self, kind: TermKind, slug: &str) -> Result<Option<Term>> {
        let params = [("slug", slug.to_string())];
        let (terms, _): (Vec<Term>, _) = self.get_json(kind.rest_name(), &params).await?;
        Ok(terms.into_iter().next())
    }

    async fn projects(&self) -> Result<Vec<Project>> {
        let params = [
            ("_embed", "1".to_string()),
            ("orderby", "menu_order".to_string()),
            ("order", "asc".to_string()),
        ];
        let entries: Vec<ProjectEntry> = self.get_all(PROJECTS_TYPE, &params).await?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let project = entry.into_project();
                if project.is_none() {
                    warn!("Skipping CMS project without slug or title");
                }
                project
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

async fn api_error(response: reqwest::Response) -> CmsError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();

    let (code, message) = match parsed {
        Some(ApiErrorBody { code, message }) => (
            code,
            message.unwrap_or_else(|| status.to_string()),
        ),
        None => (None, status.to_string()),
    };

    CmsError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}

/// (X-WP-Total, X-WP-TotalPages). Missing or malformed headers are derived
/// from the number of items in the response, as a single page.
fn pagination(headers: &HeaderMap, item_count: usize) -> (u64, u32) {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    let total = read("x-wp-total").unwrap_or(item_count as u64);
    let total_pages = read("x-wp-totalpages")
        .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
        .unwrap_or(if total > 0 { 1 } else { 0 });
    (total, total_pages)
}

/// Entry of the `projects` custom post type. Custom fields live under `acf`,
/// which WordPress serializes as `[]` when a post has none.
#[derive(Deserialize)]
struct ProjectEntry {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    excerpt: Rendered,
    #[serde(default)]
    content: PostContent,
    #[serde(default)]
    acf: Value,
    #[serde(rename = "_embedded", default)]
    embedded: Option<Embedded>,
}

impl ProjectEntry {
    fn into_project(self) -> Option<Project> {
        let title = html_to_text(&self.title.rendered);
        if self.slug.is_empty() || title.is_empty() {
            return None;
        }

        let field = |name: &str| {
            self.acf
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let tags = match self.acf.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        let year = match self.acf.get("year") {
            Some(Value::Number(n)) => n.as_u64().and_then(|y| u16::try_from(y).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        let featured = matches!(self.acf.get("featured"), Some(Value::Bool(true)));

        let image = self
            .embedded
            .as_ref()
            .and_then(|e| e.featured_media.iter().find(|m| !m.source_url.is_empty()))
            .map(|m| m.source_url.clone());

        let body_html = Some(self.content.rendered.clone()).filter(|b| !b.trim().is_empty());
        let category = field("category").unwrap_or_else(|| "Other".to_string());

        Some(Project {
            slug: self.slug.clone(),
            title,
            category,
            tags,
            summary: html_to_text(&self.excerpt.rendered),
            body: None,
            body_html,
            url: field("url"),
            repository: field("repository"),
            image,
            year,
            featured,
        })
    }
}
