//! schema.org JSON-LD builders.
//!
//! Each builder returns a `serde_json::Value`; [`script`] wraps one in a
//! `<script type="application/ld+json">` tag.

use chrono::NaiveDateTime;
use folio_core::cms::Post;
use folio_core::{Project, Service, Site};
use serde_json::{Value, json};

use crate::seo::Breadcrumb;

const CONTEXT: &str = "https://schema.org";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn date(dt: NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

fn organization_id(site: &Site) -> String {
    site.url("/#organization")
}

fn person_id(site: &Site) -> String {
    site.url("/#person")
}

fn website_id(site: &Site) -> String {
    site.url("/#website")
}

/// The freelancer as a `Person`
pub fn person(site: &Site) -> Value {
    let owner = &site.owner;
    let mut person = json!({
        "@context": CONTEXT,
        "@type": "Person",
        "@id": person_id(site),
        "name": owner.name,
        "jobTitle": owner.job_title,
        "email": format!("mailto:{}", owner.email),
        "url": site.url("/about"),
    });
    if !owner.same_as.is_empty() {
        person["sameAs"] = json!(owner.same_as);
    }
    if let Some(location) = &owner.location {
        person["address"] = json!({ "@type": "PostalAddress", "addressLocality": location });
    }
    person
}

/// The business behind the site, founded by [`person`]
pub fn professional_service(site: &Site) -> Value {
    let mut org = json!({
        "@context": CONTEXT,
        "@type": "ProfessionalService",
        "@id": organization_id(site),
        "name": site.meta.name,
        "description": site.meta.description,
        "url": site.url("/"),
        "email": site.owner.email,
        "founder": { "@id": person_id(site) },
    });
    if let Some(image) = &site.meta.default_image {
        org["image"] = json!(site.url(image));
    }
    if let Some(location) = &site.owner.location {
        org["areaServed"] = json!(location);
    }
    if !site.services.is_empty() {
        org["hasOfferCatalog"] = json!({
            "@type": "OfferCatalog",
            "name": "Services",
            "itemListElement": site.services.iter().map(|s| json!({
                "@type": "Offer",
                "itemOffered": { "@type": "Service", "name": s.title, "url": site.url(&s.path()) },
            })).collect::<Vec<_>>(),
        });
    }
    org
}

pub fn website(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "WebSite",
        "@id": website_id(site),
        "name": site.meta.name,
        "url": site.url("/"),
        "inLanguage": site.meta.language(),
        "publisher": { "@id": organization_id(site) },
    })
}

pub fn breadcrumbs(site: &Site, trail: &[Breadcrumb]) -> Value {
    let items: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, crumb)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": crumb.name,
                "item": site.url(&crumb.path),
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

pub fn blog_posting(site: &Site, post: &Post, word_count: usize) -> Value {
    let url = site.url(&post.path());
    let author = post
        .author_name()
        .map(|name| json!({ "@type": "Person", "name": name }))
        .unwrap_or_else(|| json!({ "@id": person_id(site) }));

    let mut posting = json!({
        "@context": CONTEXT,
        "@type": "BlogPosting",
        "headline": post.title_text(),
        "description": post.excerpt_text(),
        "url": url,
        "mainEntityOfPage": { "@type": "WebPage", "@id": url },
        "datePublished": date(post.date),
        "dateModified": date(post.modified_or_published()),
        "author": author,
        "publisher": { "@id": organization_id(site) },
        "inLanguage": site.meta.language(),
        "wordCount": word_count,
    });

    if let Some(image) = post.featured_image() {
        posting["image"] = json!(image.source_url);
    }
    let keywords: Vec<String> = post.tag_terms().iter().map(|t| t.label()).collect();
    if !keywords.is_empty() {
        posting["keywords"] = json!(keywords.join(", "));
    }
    if let Some(category) = post.category_terms().first() {
        posting["articleSection"] = json!(category.label());
    }
    posting
}

fn posting_summary(site: &Site, post: &Post) -> Value {
    json!({
        "@type": "BlogPosting",
        "headline": post.title_text(),
        "url": site.url(&post.path()),
        "datePublished": date(post.date),
    })
}

/// The blog index
pub fn blog(site: &Site, path: &str, posts: &[Post]) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "Blog",
        "name": format!("{} Blog", site.meta.name),
        "url": site.url(path),
        "publisher": { "@id": organization_id(site) },
        "blogPost": posts.iter().map(|p| posting_summary(site, p)).collect::<Vec<_>>(),
    })
}

/// Tag and category archives, and the projects category filter
pub fn collection_page(site: &Site, name: &str, description: &str, path: &str) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "CollectionPage",
        "name": name,
        "description": description,
        "url": site.url(path),
        "isPartOf": { "@id": website_id(site) },
    })
}

pub fn service(site: &Site, service: &Service) -> Value {
    let mut value = json!({
        "@context": CONTEXT,
        "@type": "Service",
        "name": service.title,
        "description": service.summary,
        "url": site.url(&service.path()),
        "provider": { "@id": organization_id(site) },
        "serviceType": service.title,
    });
    if let Some(location) = &site.owner.location {
        value["areaServed"] = json!(location);
    }
    if let Some(price) = &service.price_from {
        value["offers"] = json!({ "@type": "Offer", "description": format!("From {price}") });
    }
    if !service.keywords.is_empty() {
        value["keywords"] = json!(service.keywords.join(", "));
    }
    value
}

/// A portfolio entry
pub fn creative_work(site: &Site, project: &Project) -> Value {
    let mut work = json!({
        "@context": CONTEXT,
        "@type": "CreativeWork",
        "name": project.title,
        "description": project.summary,
        "url": site.url(&project.path()),
        "genre": project.category,
        "creator": { "@id": person_id(site) },
    });
    if let Some(image) = &project.image {
        work["image"] = json!(site.url(image));
    }
    if let Some(year) = project.year {
        work["dateCreated"] = json!(year.to_string());
    }
    if !project.tags.is_empty() {
        work["keywords"] = json!(project.tags.join(", "));
    }
    if let Some(url) = &project.url {
        work["sameAs"] = json!(url);
    }
    work
}

pub fn item_list(site: &Site, projects: &[&Project]) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "ItemList",
        "itemListElement": projects.iter().enumerate().map(|(i, p)| json!({
            "@type": "ListItem",
            "position": i + 1,
            "url": site.url(&p.path()),
            "name": p.title,
        })).collect::<Vec<_>>(),
    })
}

pub fn contact_page(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "ContactPage",
        "name": site.contact.headline,
        "url": site.url("/contact"),
        "about": { "@id": organization_id(site) },
    })
}

pub fn about_page(site: &Site) -> Value {
    json!({
        "@context": CONTEXT,
        "@type": "AboutPage",
        "name": site.about.headline,
        "url": site.url("/about"),
        "mainEntity": { "@id": person_id(site) },
    })
}

/// Serialize into a script tag. `</` is escaped so that text fields cannot
/// close the tag early.
pub fn script(value: &Value) -> String {
    let json = value.to_string().replace("</", "<\\/");
    format!("<script type=\"application/ld+json\">{json}</script>")
}
