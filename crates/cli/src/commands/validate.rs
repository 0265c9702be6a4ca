use crate::site::{load_site, wordpress_source};
use folio_core::cms::PostQuery;
use folio_core::project_categories;
use std::path::PathBuf;

pub async fn run(path: PathBuf, check_cms: bool) -> anyhow::Result<()> {
    println!("Validating site at: {}", path.display());

    let site = load_site(&path)?;

    println!("✓ site.toml valid");
    println!("  Site: {} ({})", site.meta.name, site.meta.base_url);
    println!("  Owner: {} <{}>", site.owner.name, site.owner.email);
    println!("  Services: {}", site.services.len());
    println!(
        "  Projects: {} in {} categories",
        site.projects.len(),
        project_categories(&site.projects).len()
    );
    match &site.contact.endpoint {
        Some(endpoint) => println!("  Contact endpoint: {}", endpoint),
        None => println!("  ⚠ No contact endpoint: the form will not deliver messages"),
    }

    if !path.join("public").join("styles.css").exists() {
        println!("  ⚠ public/styles.css not found: pages will render unstyled");
    }

    if check_cms {
        println!("\nChecking CMS at: {}", site.cms.base_url);
        let source = wordpress_source(&site)?;
        let listing = source.posts(&PostQuery::page(1, 1)).await?;
        println!("✓ CMS reachable");
        println!("  Posts: {}", listing.total);

        let categories = source.categories().await?;
        let tags = source.tags().await?;
        println!("  Categories: {}", categories.len());
        println!("  Tags: {}", tags.len());
    }

    Ok(())
}
