// Server-side rendering of the site with Leptos SSR

pub mod components;
mod document;
pub mod markdown;
mod pages;
pub mod schema;
pub mod seo;
pub mod sitemap;

use std::sync::Arc;

use folio_content::{ContentError, ContentProcessor};
use folio_core::Site;

pub use components::{BLUR_PLACEHOLDER, ContactFormState};
pub use document::{LIVE_RELOAD_SCRIPT, STYLESHEET};
pub use pages::{archive_path, category_path};
pub use seo::{Breadcrumb, OgType, PageMeta};
pub use sitemap::{SitemapEntry, SitemapSources};

/// Output of a static build
pub struct GeneratedSite {
    pub pages: Vec<(String, String)>,   // (path, html)
    pub assets: Vec<(String, Vec<u8>)>, // (path, data)
}

impl GeneratedSite {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            assets: Vec::new(),
        }
    }

    pub fn page(&mut self, path: impl Into<String>, html: String) {
        self.pages.push((path.into(), html));
    }

    pub fn asset(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.assets.push((path.into(), data.into()));
    }
}

impl Default for GeneratedSite {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders every page of the site. Page methods live in `pages/`, one
/// module per section.
pub struct SiteRenderer {
    site: Arc<Site>,
    content: ContentProcessor,
    live_reload: bool,
    contact_action: String,
}

impl SiteRenderer {
    pub fn new(site: Arc<Site>) -> Result<Self, ContentError> {
        Ok(Self {
            site,
            content: ContentProcessor::new()?,
            live_reload: false,
            contact_action: "/contact".to_string(),
        })
    }

    /// Inject the `/_reload` listener into every page
    pub fn with_live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    /// Where the contact form posts. Static builds have no server to
    /// receive it and post to the external endpoint directly.
    pub fn with_contact_action(mut self, action: impl Into<String>) -> Self {
        self.contact_action = action.into();
        self
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn content(&self) -> &ContentProcessor {
        &self.content
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use folio_core::Site;
    use folio_core::cms::Post;
    use folio_core::config::parse_site_toml_str;

    pub const SITE_TOML: &str = r###"
[site]
name = "Sam Rivera Studio"
base_url = "https://example.dev"
description = "Freelance WordPress and web application developer"
twitter = "@samrivera"

[owner]
name = "Sam Rivera"
job_title = "Freelance Web Developer"
email = "hello@example.dev"
location = "Lisbon, Portugal"
same_as = ["https://github.com/samrivera"]

[cms]
base_url = "https://cms.example.dev/wp-json"

[contact]
endpoint = "https://forms.example.dev/submit"

[home]
headline = "Websites that work as hard as you do"
tagline = "WordPress, headless and custom builds"
intro = "I help **small teams** ship fast sites."

[about]
headline = "About Sam"
body = "## Background\n\nTen years of building for the web."

[[service]]
slug = "wordpress"
title = "WordPress Development"
summary = "Custom themes and plugins"
body = "## What you get\n\nA theme built for you."
features = ["Custom theme", "Block editor support"]
price_from = "€2,500"

[[service]]
slug = "headless"
title = "Headless Builds"
summary = "Fast front ends on top of WordPress"
body = "Decoupled sites."

[[project]]
slug = "bakery-shop"
title = "Bakery Shop"
category = "E-commerce"
tags = ["WooCommerce"]
summary = "Online ordering for a local bakery"
body = "Built in **six weeks**."
image = "/images/projects/bakery.jpg"
year = 2024
featured = true

[[project]]
slug = "tide-charts"
title = "Tide Charts"
category = "Web Apps"
summary = "Tide predictions for surfers"
"###;

    pub fn site() -> Site {
        parse_site_toml_str(SITE_TOML).unwrap()
    }

    pub fn post(id: u64, slug: &str, title: &str) -> Post {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "slug": slug,
            "date": "2025-01-15T10:00:00",
            "title": { "rendered": title },
            "excerpt": { "rendered": "<p>An excerpt.</p>" },
            "content": { "rendered": "<h2>Intro</h2><p>Hello there.</p><h2>Details</h2><p>More.</p>" },
            "_embedded": {
                "wp:term": [
                    [{ "id": 3, "name": "Engineering", "slug": "engineering", "taxonomy": "category" }],
                    [{ "id": 5, "name": "Rust", "slug": "rust", "taxonomy": "post_tag" }]
                ]
            }
        }))
        .unwrap()
    }
}
