use anyhow::{Context, Result};
use folio_core::config::parse_site_toml_str;
use folio_core::text::is_valid_email;
use std::fs;
use std::path::{Path, PathBuf};

/// Starter stylesheet covering every class the renderer emits
const STARTER_STYLESHEET: &str = include_str!("../../assets/styles.css");

/// Values supplied on the command line; anything missing gets a placeholder
#[derive(Debug, Default, Clone)]
pub struct InitOptions {
    pub name: Option<String>,
    pub email: Option<String>,
    pub cms_url: Option<String>,
}

/// Escape a string for safe inclusion in a TOML basic string.
///
/// The scaffold is written from a commented template rather than serialized,
/// so values are escaped by hand.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Initialize a new site directory.
///
/// Creates:
/// - `site.toml` with every section filled in with placeholders
/// - `public/styles.css`, a starter stylesheet
/// - `public/images/` for project and portrait images
///
/// # Errors
///
/// Returns an error if site.toml already exists, if the email or CMS URL
/// supplied is invalid, or if file operations fail.
pub fn run(path: PathBuf, options: InitOptions) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    let site_toml_path = path.join("site.toml");
    if site_toml_path.exists() {
        anyhow::bail!(
            "site.toml already exists at {}\nHint: Delete it first or use a different directory",
            site_toml_path.display()
        );
    }

    fs::create_dir_all(path.join("public").join("images"))
        .with_context(|| format!("Failed to create {}", path.display()))?;

    generate_site_toml(&path, &options)?;
    println!("✓ Wrote site.toml");

    let stylesheet = path.join("public").join("styles.css");
    if stylesheet.exists() {
        println!("  Keeping existing public/styles.css");
    } else {
        fs::write(&stylesheet, STARTER_STYLESHEET)?;
        println!("✓ Wrote public/styles.css");
    }

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── site.toml            ← Edit this: owner, services, projects");
    println!("  └── public/");
    println!("      ├── images/");
    println!("      └── styles.css");
    println!("\nNext steps:");
    println!("  1. Point [cms].base_url at your WordPress REST root");
    println!("  2. Describe your services and projects in site.toml");
    println!("  3. Serve: folio serve {} --watch", path.display());

    Ok(())
}

fn generate_site_toml(base: &Path, options: &InitOptions) -> Result<()> {
    if let Some(email) = options.email.as_deref()
        && !is_valid_email(email)
    {
        anyhow::bail!("Invalid email address: {}", email);
    }

    let name = options
        .name
        .as_deref()
        .map(toml_escape_string)
        .unwrap_or_else(|| "Your Name".to_string());
    let name_comment = if options.name.is_some() {
        ""
    } else {
        "  # TODO: Set your name"
    };
    let email = options
        .email
        .as_deref()
        .map(toml_escape_string)
        .unwrap_or_else(|| "hello@example.com".to_string());
    let email_comment = if options.email.is_some() {
        ""
    } else {
        "  # TODO: Set contact email"
    };
    let cms_url = options
        .cms_url
        .as_deref()
        .map(|u| toml_escape_string(u.trim_end_matches('/')))
        .unwrap_or_else(|| "https://cms.example.com/wp-json".to_string());

    let toml = format!(
        r##"# Site configuration for folio
# Markdown is accepted in every field marked (markdown)

[site]
name = "{name}"{name_comment}
base_url = "https://example.com"  # TODO: Public URL of the site
description = "Freelance web developer building fast, accessible websites"
locale = "en_US"
# twitter = "@handle"
# default_image = "/images/og.jpg"

[owner]
name = "{name}"
job_title = "Freelance Web Developer"
email = "{email}"{email_comment}
# location = "City, Country"
same_as = []

[cms]
# WordPress REST root. FOLIO_CMS_URL overrides it.
# Set FOLIO_CMS_USER and FOLIO_CMS_APP_PASSWORD to read block markup.
base_url = "{cms_url}"
revalidate_secs = 3600
per_page = 9
timeout_secs = 10
# "static" reads [[project]] below, "cms" reads the projects post type
projects = "static"

[contact]
# External handler that receives submissions as JSON
# endpoint = "https://forms.example.com/submit"
headline = "Let's work together"
intro = "Tell me about your project and I'll get back to you within two working days."

[home]
headline = "Websites that work as hard as you do"
tagline = "WordPress, headless and custom web development"
intro = "I help small teams ship **fast, maintainable** websites."  # (markdown)

[about]
body = """
## Background

Write a few paragraphs about yourself here. (markdown)
"""

[[service]]
slug = "wordpress-development"
title = "WordPress Development"
summary = "Custom themes and plugins built for your content"
body = """
Describe what this service includes. (markdown)
"""
features = ["Custom theme", "Block editor support", "Performance tuning"]
# price_from = "$2,500"

[[project]]
slug = "example-project"
title = "Example Project"
category = "Web Apps"
tags = ["WordPress"]
summary = "One sentence about what you built and for whom"
# url = "https://example.com"
# image = "/images/example-project.jpg"
featured = true
"##
    );

    // The scaffold must load with the same rules the server applies
    parse_site_toml_str(&toml)
        .context("Generated site.toml is invalid - this is a bug in the template generator")?;

    fs::write(base.join("site.toml"), toml)?;

    Ok(())
}
