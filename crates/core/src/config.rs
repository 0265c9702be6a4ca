use crate::error::{Error, Result};
use crate::text::{is_url_safe_slug, is_valid_email};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path};

/// Environment variable that overrides `cms.base_url`
pub const CMS_URL_ENV: &str = "FOLIO_CMS_URL";

const DEFAULT_REVALIDATE_SECS: u64 = 3600;
const DEFAULT_PER_PAGE: u32 = 9;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSiteMeta,
    owner: RawOwner,
    cms: RawCmsConfig,
    #[serde(default)]
    contact: RawContactConfig,
    home: RawHome,
    about: RawAbout,
    #[serde(default)]
    nav: Vec<NavItem>,
    #[serde(default)]
    service: Vec<RawService>,
    #[serde(default)]
    project: Vec<RawProject>,
}

#[derive(Debug, Deserialize)]
struct RawSiteMeta {
    name: String,
    base_url: String,
    description: String,
    locale: Option<String>,
    twitter: Option<String>,
    default_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOwner {
    name: String,
    job_title: String,
    email: String,
    location: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    same_as: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCmsConfig {
    base_url: String,
    revalidate_secs: Option<u64>,
    per_page: Option<u32>,
    timeout_secs: Option<u64>,
    #[serde(default)]
    projects: ProjectSource,
}

#[derive(Debug, Default, Deserialize)]
struct RawContactConfig {
    endpoint: Option<String>,
    headline: Option<String>,
    intro: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHome {
    headline: String,
    tagline: String,
    intro: Option<String>,
    cta_label: Option<String>,
    cta_href: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAbout {
    headline: Option<String>,
    body: String,
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawService {
    slug: String,
    title: String,
    summary: String,
    body: String,
    #[serde(default)]
    features: Vec<String>,
    price_from: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    slug: String,
    title: String,
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    summary: String,
    body: Option<String>,
    url: Option<String>,
    repository: Option<String>,
    image: Option<String>,
    year: Option<u16>,
    #[serde(default)]
    featured: bool,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<Site> {
    let content = fs::read_to_string(path)?;
    let mut site = parse_site_toml_str(&content)?;
    apply_env_overrides(&mut site, |key| std::env::var(key).ok())?;
    Ok(site)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<Site> {
    let raw: RawConfig = toml::from_str(content)?;

    validate_http_url(&raw.site.base_url, "site.base_url")?;
    validate_http_url(&raw.cms.base_url, "cms.base_url")?;
    if let Some(endpoint) = &raw.contact.endpoint {
        validate_http_url(endpoint, "contact.endpoint")?;
    }

    if !is_valid_email(&raw.owner.email) {
        return Err(Error::ConfigParse(format!(
            "Invalid owner.email: '{}'",
            raw.owner.email
        )));
    }

    let per_page = raw.cms.per_page.unwrap_or(DEFAULT_PER_PAGE);
    if !(1..=100).contains(&per_page) {
        return Err(Error::ConfigParse(format!(
            "cms.per_page must be between 1 and 100, got {}",
            per_page
        )));
    }

    let default_image = raw
        .site
        .default_image
        .map(|img| validate_asset_ref(&img, "site.default_image"))
        .transpose()?;

    let meta = SiteMeta {
        name: raw.site.name,
        base_url: raw.site.base_url.trim_end_matches('/').to_string(),
        description: raw.site.description,
        locale: raw.site.locale.unwrap_or_else(|| "en_US".to_string()),
        twitter: raw.site.twitter,
        default_image,
    };

    let owner = Owner {
        name: raw.owner.name,
        job_title: raw.owner.job_title,
        email: raw.owner.email,
        location: raw.owner.location,
        bio: raw.owner.bio,
        same_as: raw.owner.same_as,
    };

    let cms = CmsConfig {
        base_url: raw.cms.base_url.trim_end_matches('/').to_string(),
        revalidate_secs: raw.cms.revalidate_secs.unwrap_or(DEFAULT_REVALIDATE_SECS),
        per_page,
        timeout_secs: raw.cms.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        projects: raw.cms.projects,
    };

    let contact = ContactConfig {
        endpoint: raw.contact.endpoint,
        headline: raw
            .contact
            .headline
            .unwrap_or_else(|| "Let's work together".to_string()),
        intro: raw.contact.intro,
    };

    let home = HomeContent {
        headline: raw.home.headline,
        tagline: raw.home.tagline,
        intro: raw.home.intro,
        cta_label: raw
            .home
            .cta_label
            .unwrap_or_else(|| "Start a project".to_string()),
        cta_href: raw.home.cta_href.unwrap_or_else(|| "/contact".to_string()),
    };

    let about = AboutContent {
        headline: raw.about.headline.unwrap_or_else(|| "About".to_string()),
        body: raw.about.body,
        image: raw
            .about
            .image
            .map(|img| validate_asset_ref(&img, "about.image"))
            .transpose()?,
    };

    let nav = if raw.nav.is_empty() {
        default_nav()
    } else {
        raw.nav
    };

    let mut service_slugs = HashSet::new();
    let services: Result<Vec<Service>> = raw
        .service
        .into_iter()
        .map(|s| {
            validate_slug(&s.slug, "service.slug", &mut service_slugs)?;
            Ok(Service {
                slug: s.slug,
                title: s.title,
                summary: s.summary,
                body: s.body,
                features: s.features,
                price_from: s.price_from,
                keywords: s.keywords,
            })
        })
        .collect();

    let mut project_slugs = HashSet::new();
    let projects: Result<Vec<Project>> = raw
        .project
        .into_iter()
        .map(|p| {
            validate_slug(&p.slug, "project.slug", &mut project_slugs)?;
            let image = p
                .image
                .map(|img| validate_asset_ref(&img, "project.image"))
                .transpose()?;
            Ok(Project {
                slug: p.slug,
                title: p.title,
                category: p.category,
                tags: p.tags,
                summary: p.summary,
                body: p.body,
                body_html: None,
                url: p.url,
                repository: p.repository,
                image,
                year: p.year,
                featured: p.featured,
            })
        })
        .collect();

    Ok(Site {
        meta,
        owner,
        cms,
        contact,
        home,
        about,
        nav,
        services: services?,
        projects: projects?,
    })
}

/// Apply environment overrides. Only the CMS base URL is overridable.
pub fn apply_env_overrides<F>(site: &mut Site, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(CMS_URL_ENV).filter(|u| !u.trim().is_empty()) {
        validate_http_url(&url, CMS_URL_ENV)?;
        site.cms.base_url = url.trim_end_matches('/').to_string();
    }
    Ok(())
}

fn default_nav() -> Vec<NavItem> {
    [
        ("Services", "/services"),
        ("Projects", "/projects"),
        ("Blog", "/blog"),
        ("About", "/about"),
        ("Contact", "/contact"),
    ]
    .into_iter()
    .map(|(label, href)| NavItem {
        label: label.to_string(),
        href: href.to_string(),
    })
    .collect()
}

/// Require an absolute http(s) URL with a host
fn validate_http_url(url: &str, field_name: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| {
            Error::ConfigParse(format!(
                "'{}' must be an absolute http(s) URL, got '{}'",
                field_name, url
            ))
        })?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(Error::ConfigParse(format!(
            "'{}' has no valid host: '{}'",
            field_name, url
        )));
    }

    Ok(())
}

/// Slugs become URL segments and output directories: they must be URL-safe
/// and unique within their kind.
fn validate_slug(slug: &str, field_name: &str, seen: &mut HashSet<String>) -> Result<()> {
    if !is_url_safe_slug(slug) {
        return Err(Error::ConfigParse(format!(
            "Invalid '{}': '{}'. Use lowercase letters, digits and single hyphens.",
            field_name, slug
        )));
    }

    if !seen.insert(slug.to_string()) {
        return Err(Error::ConfigParse(format!(
            "Duplicate '{}': '{}'",
            field_name, slug
        )));
    }

    Ok(())
}

/// Validate an image/asset reference.
///
/// Accepts absolute http(s) URLs, or site paths rooted at `/` that are
/// served from `public/`. Site paths must not contain parent directory
/// references (`..`), since the static build copies `public/` by these paths.
fn validate_asset_ref(value: &str, field_name: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::ConfigParse(format!(
            "Empty path in '{}' field",
            field_name
        )));
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        validate_http_url(value, field_name)?;
        return Ok(value.to_string());
    }

    if !value.starts_with('/') {
        return Err(Error::ConfigParse(format!(
            "'{}' must be a URL or a site path starting with '/': '{}'",
            field_name, value
        )));
    }

    if Path::new(value)
        .components()
        .any(|c| c == Component::ParentDir)
    {
        return Err(Error::ConfigParse(format!(
            "Parent directory references (..) not allowed in '{}': '{}'",
            field_name, value
        )));
    }

    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r##"
[site]
name = "Sam Rivera Web Development"
base_url = "https://samrivera.dev/"
description = "Freelance WordPress and web application developer"

[owner]
name = "Sam Rivera"
job_title = "Freelance Web Developer"
email = "hello@samrivera.dev"

[cms]
base_url = "https://cms.samrivera.dev/wp-json"

[home]
headline = "Websites that work as hard as you do"
tagline = "WordPress, headless and custom builds"

[about]
body = "I build websites."
"##;

    fn with_extra(extra: &str) -> String {
        format!("{}\n{}", MINIMAL, extra)
    }

    #[test]
    fn test_parse_minimal_config() {
        let site = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(site.meta.name, "Sam Rivera Web Development");
        assert_eq!(site.meta.base_url, "https://samrivera.dev");
        assert_eq!(site.meta.locale, "en_US");
        assert_eq!(site.cms.per_page, 9);
        assert_eq!(site.cms.revalidate_secs, 3600);
        assert_eq!(site.cms.projects, ProjectSource::Static);
        assert_eq!(site.home.cta_href, "/contact");
        assert_eq!(site.nav.len(), 5);
        assert!(site.services.is_empty());
        assert!(site.contact.endpoint.is_none());
    }

    #[test]
    fn test_parse_services_and_projects() {
        let toml = with_extra(
            r###"
[[service]]
slug = "wordpress"
title = "WordPress Development"
summary = "Custom themes and plugins"
body = "## What you get"
features = ["Custom theme", "Block editor support"]
price_from = "€2,500"

[[project]]
slug = "bakery-shop"
title = "Bakery Shop"
category = "E-commerce"
tags = ["WooCommerce"]
summary = "Online ordering for a local bakery"
image = "/images/projects/bakery.jpg"
year = 2024
featured = true
"###,
        );

        let site = parse_site_toml_str(&toml).unwrap();
        assert_eq!(site.services.len(), 1);
        assert_eq!(site.service("wordpress").unwrap().features.len(), 2);
        assert_eq!(site.projects[0].category_slug(), "e-commerce");
        assert_eq!(site.featured_projects().len(), 1);
    }

    #[test]
    fn test_parse_rejects_duplicate_service_slug() {
        let toml = with_extra(
            r##"
[[service]]
slug = "wordpress"
title = "A"
summary = "A"
body = "A"

[[service]]
slug = "wordpress"
title = "B"
summary = "B"
body = "B"
"##,
        );

        let err = parse_site_toml_str(&toml).unwrap_err().to_string();
        assert!(err.contains("Duplicate 'service.slug'"));
    }

    #[test]
    fn test_parse_rejects_unsafe_slug() {
        let toml = with_extra(
            r##"
[[project]]
slug = "../etc"
title = "Evil"
category = "x"
summary = "x"
"##,
        );

        let err = parse_site_toml_str(&toml).unwrap_err().to_string();
        assert!(err.contains("project.slug"));
    }

    #[test]
    fn test_parse_rejects_relative_base_url() {
        let toml = MINIMAL.replace("https://samrivera.dev/", "samrivera.dev");
        let err = parse_site_toml_str(&toml).unwrap_err().to_string();
        assert!(err.contains("site.base_url"));
    }

    #[test]
    fn test_parse_rejects_bad_email() {
        let toml = MINIMAL.replace("hello@samrivera.dev", "hello");
        let err = parse_site_toml_str(&toml).unwrap_err().to_string();
        assert!(err.contains("owner.email"));
    }

    #[test]
    fn test_parse_rejects_per_page_out_of_range() {
        let toml = MINIMAL.replace(
            "base_url = \"https://cms.samrivera.dev/wp-json\"",
            "base_url = \"https://cms.samrivera.dev/wp-json\"\nper_page = 0",
        );
        let err = parse_site_toml_str(&toml).unwrap_err().to_string();
        assert!(err.contains("per_page"));
    }

    #[test]
    fn test_validate_asset_ref() {
        assert!(validate_asset_ref("/images/og.jpg", "img").is_ok());
        assert!(validate_asset_ref("https://cdn.example.com/og.jpg", "img").is_ok());

        let err = validate_asset_ref("/images/../../secret", "img").unwrap_err();
        assert!(err.to_string().contains("Parent directory references"));

        let err = validate_asset_ref("images/og.jpg", "img").unwrap_err();
        assert!(err.to_string().contains("starting with '/'"));

        assert!(validate_asset_ref("  ", "img").is_err());
    }

    #[test]
    fn test_validate_http_url() {
        assert!(validate_http_url("https://example.com", "u").is_ok());
        assert!(validate_http_url("http://localhost:8080/wp-json", "u").is_ok());
        assert!(validate_http_url("ftp://example.com", "u").is_err());
        assert!(validate_http_url("https://", "u").is_err());
    }

    #[test]
    fn test_env_override_cms_url() {
        let mut site = parse_site_toml_str(MINIMAL).unwrap();
        apply_env_overrides(&mut site, |key| {
            (key == CMS_URL_ENV).then(|| "http://localhost:8888/wp-json/".to_string())
        })
        .unwrap();
        assert_eq!(site.cms.base_url, "http://localhost:8888/wp-json");

        let err = apply_env_overrides(&mut site, |_| Some("not a url".to_string())).unwrap_err();
        assert!(err.to_string().contains(CMS_URL_ENV));
    }

    #[test]
    fn test_site_url() {
        let site = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(site.url("/"), "https://samrivera.dev/");
        assert_eq!(site.url("/blog/hello"), "https://samrivera.dev/blog/hello");
        assert_eq!(site.url("about"), "https://samrivera.dev/about");
        assert_eq!(
            site.url("https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
    }
}
