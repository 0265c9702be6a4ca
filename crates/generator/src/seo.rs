//! `<head>` metadata: title, description, canonical URL, Open Graph and
//! Twitter card tags.
//!
//! Every value is HTML-escaped here; callers pass plain text.

use chrono::NaiveDateTime;
use folio_core::Site;
use folio_core::text::{collapse_whitespace, html_escape, truncate_words};

/// Search snippets get cut around this many characters
const DESCRIPTION_MAX: usize = 160;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OgType {
    #[default]
    Website,
    Article,
    Profile,
}

impl OgType {
    fn as_str(self) -> &'static str {
        match self {
            OgType::Website => "website",
            OgType::Article => "article",
            OgType::Profile => "profile",
        }
    }
}

/// One step of a breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

impl Breadcrumb {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Per-page metadata
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    /// Page title without the site suffix; `None` for the home page
    pub title: Option<String>,
    pub description: String,
    /// Site path, e.g. "/blog/hello-world"
    pub path: String,
    pub og_type: OgType,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub published: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub noindex: bool,
}

impl PageMeta {
    pub fn new(title: impl Into<String>, description: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: description.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn home(description: impl Into<String>) -> Self {
        Self {
            title: None,
            description: description.into(),
            path: "/".to_string(),
            ..Self::default()
        }
    }

    pub fn article(mut self, published: NaiveDateTime, modified: Option<NaiveDateTime>) -> Self {
        self.og_type = OgType::Article;
        self.published = Some(published);
        self.modified = modified;
        self
    }

    pub fn with_image(mut self, url: impl Into<String>, alt: Option<String>) -> Self {
        self.image = Some(url.into());
        self.image_alt = alt;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_type(mut self, og_type: OgType) -> Self {
        self.og_type = og_type;
        self
    }

    pub fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }

    /// "{page} | {site}", or the site name alone on the home page
    pub fn full_title(&self, site: &Site) -> String {
        match &self.title {
            Some(title) if !title.is_empty() && *title != site.meta.name => {
                format!("{} | {}", title, site.meta.name)
            }
            _ => site.meta.name.clone(),
        }
    }

    /// Description for the meta tags, falling back to the site description
    pub fn summary(&self, site: &Site) -> String {
        let text = collapse_whitespace(&self.description);
        let text = if text.is_empty() {
            collapse_whitespace(&site.meta.description)
        } else {
            text
        };
        truncate_words(&text, DESCRIPTION_MAX)
    }
}

/// Render the metadata part of `<head>`
pub fn render_head(site: &Site, meta: &PageMeta) -> String {
    let title = html_escape(&meta.full_title(site));
    let description = html_escape(&meta.summary(site));
    let canonical = html_escape(&site.url(&meta.path));
    let site_name = html_escape(&site.meta.name);
    let robots = if meta.noindex {
        "noindex, follow"
    } else {
        "index, follow, max-image-preview:large"
    };

    let mut head = format!(
        r#"<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<meta name="robots" content="{robots}">
<link rel="canonical" href="{canonical}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:url" content="{canonical}">
<meta property="og:type" content="{og_type}">
<meta property="og:site_name" content="{site_name}">
<meta property="og:locale" content="{locale}">
"#,
        og_type = meta.og_type.as_str(),
        locale = html_escape(&site.meta.locale),
    );

    let image = meta
        .image
        .as_deref()
        .or(site.meta.default_image.as_deref())
        .map(|image| html_escape(&site.url(image)));

    if let Some(image) = &image {
        head.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            image
        ));
        if let Some(alt) = &meta.image_alt {
            head.push_str(&format!(
                "<meta property=\"og:image:alt\" content=\"{}\">\n",
                html_escape(alt)
            ));
        }
    }

    if meta.og_type == OgType::Article {
        if let Some(published) = meta.published {
            head.push_str(&format!(
                "<meta property=\"article:published_time\" content=\"{}\">\n",
                published.format(DATE_FORMAT)
            ));
        }
        if let Some(modified) = meta.modified.or(meta.published) {
            head.push_str(&format!(
                "<meta property=\"article:modified_time\" content=\"{}\">\n",
                modified.format(DATE_FORMAT)
            ));
        }
        if let Some(author) = &meta.author {
            head.push_str(&format!(
                "<meta property=\"article:author\" content=\"{}\">\n",
                html_escape(author)
            ));
        }
        for tag in &meta.tags {
            head.push_str(&format!(
                "<meta property=\"article:tag\" content=\"{}\">\n",
                html_escape(tag)
            ));
        }
    }

    let card = if image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    head.push_str(&format!(
        r#"<meta name="twitter:card" content="{card}">
<meta name="twitter:title" content="{title}">
<meta name="twitter:description" content="{description}">
"#
    ));
    if let Some(image) = &image {
        head.push_str(&format!(
            "<meta name=\"twitter:image\" content=\"{}\">\n",
            image
        ));
    }
    if let Some(handle) = &site.meta.twitter {
        let handle = html_escape(handle);
        head.push_str(&format!(
            "<meta name=\"twitter:site\" content=\"{handle}\">\n<meta name=\"twitter:creator\" content=\"{handle}\">\n"
        ));
    }

    head
}
