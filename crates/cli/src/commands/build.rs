use anyhow::{Context, Result};
use folio_core::cms::{Paged, Post, PostQuery, TermKind};
use folio_core::project_categories;
use folio_core::text::is_url_safe_slug;
use folio_generator::{
    ContactFormState, GeneratedSite, SiteRenderer, SitemapSources, archive_path, category_path,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::site::{SiteData, load_site, offline_source, wordpress_source};

/// Export every route as static files
pub async fn run(path: PathBuf, output: PathBuf, offline: bool) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let site = load_site(&path)?;
    println!("✓ Loaded: {}", site.meta.name);

    let source = if offline {
        println!("  ⚠ Offline: blog pages render empty");
        offline_source()
    } else {
        println!("  CMS: {}", site.cms.base_url);
        wordpress_source(&site)?
    };

    // No server receives the form in a static export
    let contact_action = match &site.contact.endpoint {
        Some(endpoint) => endpoint.clone(),
        None => {
            println!("  ⚠ No contact endpoint: the contact form will not deliver messages");
            "/contact".to_string()
        }
    };
    let renderer = SiteRenderer::new(Arc::new(site))
        .context("Failed to initialize content pipeline")?
        .with_contact_action(contact_action);
    let data = SiteData::new(renderer, source);
    println!();

    println!("📄 Rendering pages...");
    let generated = generate(&data).await;
    println!("   ✓ Rendered {} pages", generated.pages.len());

    println!("📁 Writing output...");
    fs::create_dir_all(&output).context("Failed to create output directory")?;
    let written = write_site(&generated, &output)?;
    println!("   ✓ Wrote {} files", written);
    let skipped = generated.pages.len() + generated.assets.len() - written;
    if skipped > 0 {
        println!("   ⚠ Skipped {} routes with unsafe slugs", skipped);
    }

    println!("🎨 Copying public/...");
    let copied = copy_public(&path.join("public"), &output)?;
    println!("   ✓ Copied {} files", copied);

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Route of listing page `page` under `base`
fn listing_path(base: &str, page: u32) -> String {
    if page <= 1 {
        base.to_string()
    } else {
        format!("{}/page/{}", base, page)
    }
}

/// Render every page. Fetch failures leave the affected listings empty.
pub async fn generate(data: &SiteData) -> GeneratedSite {
    let renderer = data.renderer();
    let site = data.site();
    let mut out = GeneratedSite::new();

    let blog_pages = data.all_pages(PostQuery::page(1, data.per_page())).await;
    let posts: Vec<Post> = blog_pages.iter().flat_map(|p| p.items.clone()).collect();
    let projects = data.projects().await;
    let recent: Vec<Post> = posts.iter().take(3).cloned().collect();

    out.page("/", renderer.home(&recent, &projects));
    out.page("/about", renderer.about());
    out.page("/services", renderer.services());
    for service in &site.services {
        out.page(service.path(), renderer.service(service));
    }

    if let Some(index) = renderer.projects(&projects, None) {
        out.page("/projects", index);
    }
    for (slug, _) in project_categories(&projects) {
        if let Some(page) = renderer.projects(&projects, Some(&slug)) {
            out.page(category_path(&slug), page);
        }
    }
    for project in &projects {
        out.page(project.path(), renderer.project(project));
    }

    for listing in &blog_pages {
        out.page(listing_path("/blog", listing.page), renderer.blog(listing));
    }
    for post in &posts {
        out.page(post.path(), renderer.post(post));
    }

    let mut archived_terms = Vec::new();
    for kind in [TermKind::Category, TermKind::Tag] {
        let terms: Vec<_> = data
            .terms(kind)
            .await
            .into_iter()
            .filter(|t| t.count != Some(0))
            .collect();
        for term in &terms {
            let base = archive_path(kind, &term.slug);
            let query = PostQuery::page(1, data.per_page()).with_term(kind, term.id);
            let pages: Vec<Paged<Post>> = data.all_pages(query).await;
            for listing in &pages {
                out.page(
                    listing_path(&base, listing.page),
                    renderer.archive(kind, term, listing),
                );
            }
        }
        archived_terms.push((kind, terms));
    }

    out.page("/contact", renderer.contact(&ContactFormState::default()));
    out.page("/404.html", renderer.not_found("/404.html"));

    let mut tags = Vec::new();
    let mut categories = Vec::new();
    for (kind, terms) in archived_terms {
        match kind {
            TermKind::Tag => tags = terms,
            TermKind::Category => categories = terms,
        }
    }
    let entries = renderer.sitemap_entries(&SitemapSources {
        posts: &posts,
        projects: &projects,
        tags: &tags,
        categories: &categories,
    });
    out.asset("/sitemap.xml", renderer.sitemap(&entries));
    out.asset("/robots.txt", renderer.robots());

    info!(
        pages = out.pages.len(),
        posts = posts.len(),
        projects = projects.len(),
        "Rendered site"
    );
    out
}

/// File a route is written to: routes become directories with an
/// index.html, paths with an extension are written as-is
fn output_file(output: &Path, route: &str) -> PathBuf {
    let relative = route.trim_matches('/');
    if relative.is_empty() {
        return output.join("index.html");
    }
    let path = output.join(relative);
    if path.extension().is_some() {
        path
    } else {
        path.join("index.html")
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

/// True when every segment of `route` is a plain slug, the last one
/// optionally with a file extension. CMS slugs end up in routes, so this
/// keeps writes inside the output directory.
fn is_writable_route(route: &str) -> bool {
    let relative = route.trim_matches('/');
    if relative.is_empty() {
        return true;
    }
    let segments: Vec<&str> = relative.split('/').collect();
    let last = segments.len() - 1;
    segments.iter().enumerate().all(|(i, segment)| {
        is_url_safe_slug(segment)
            || (i == last
                && segment
                    .split_once('.')
                    .is_some_and(|(stem, ext)| is_url_safe_slug(stem) && is_url_safe_slug(ext)))
    })
}

/// Write pages and assets. Routes that are not plain slug paths are
/// skipped with a warning. Returns how many files were written.
pub fn write_site(site: &GeneratedSite, output: &Path) -> Result<usize> {
    let files = site
        .pages
        .iter()
        .map(|(route, html)| (route, html.as_bytes()))
        .chain(site.assets.iter().map(|(route, data)| (route, data.as_slice())));

    let mut written = 0;
    for (route, data) in files {
        if !is_writable_route(route) {
            warn!(route = %route, "Skipping route that is not a plain slug path");
            continue;
        }
        write_file(&output_file(output, route), data)?;
        written += 1;
    }
    Ok(written)
}

/// Copy `public/` into the output root. Generated files win over public
/// files with the same name.
fn copy_public(public: &Path, output: &Path) -> Result<usize> {
    if !public.exists() {
        warn!(path = %public.display(), "No public directory");
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(public).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let filename = entry.file_name().to_string_lossy();
        if filename.starts_with('.') {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(public)
            .context("Walked outside public directory")?;
        let dst = output.join(relative);
        if dst.exists() {
            eprintln!("   ⚠ Skipping public/{}: generated file has the same path", relative.display());
            continue;
        }
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    Ok(copied)
}
