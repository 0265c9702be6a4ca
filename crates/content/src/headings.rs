//! Heading anchors and the table of contents.

use std::collections::HashSet;

use folio_core::text::{html_escape, html_to_text};
use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::Result;

/// One table-of-contents line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub text: String,
    pub id: String,
}

pub struct Headings {
    heading: Regex,
    id_attr: Regex,
}

impl Headings {
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading: Regex::new(r"(?is)<h([23])(\s[^>]*)?>(.*?)</h[23]\s*>")?,
            id_attr: Regex::new(r#"(?i)(?:^|\s)id\s*=\s*["']([^"']*)["']"#)?,
        })
    }

    /// Give every `<h2>`/`<h3>` without an id one derived from its text.
    ///
    /// Existing ids are left alone, and a derived id never collides with
    /// any id already in the document, so running this twice is a no-op.
    pub fn inject_ids(&self, html: &str) -> String {
        let mut used: HashSet<String> = self
            .id_attr
            .captures_iter(html)
            .map(|caps| caps[1].to_string())
            .collect();

        self.heading
            .replace_all(html, |caps: &Captures| {
                let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                if self.id_attr.is_match(attrs) {
                    return caps[0].to_string();
                }

                let level = &caps[1];
                let inner = &caps[3];
                let id = unique_id(heading_slug(&html_to_text(inner)), &mut used);
                format!(
                    r#"<h{} id="{}"{}>{}</h{}>"#,
                    level,
                    html_escape(&id),
                    attrs,
                    inner,
                    level
                )
            })
            .into_owned()
    }

    /// Headings carrying an id, in document order
    pub fn toc(&self, html: &str) -> Vec<TocEntry> {
        self.heading
            .captures_iter(html)
            .filter_map(|caps| {
                let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                let id = self.id_attr.captures(attrs)?[1].to_string();
                let text = html_to_text(&caps[3]);
                if id.is_empty() || text.is_empty() {
                    return None;
                }
                let level = if &caps[1] == "2" { 2 } else { 3 };
                Some(TocEntry { level, text, id })
            })
            .collect()
    }
}

/// Anchor id from heading text: lowercased, whitespace to `-`, everything
/// that is not an ASCII word character dropped.
///
/// "Why Rust? (2025 edition)" -> "why-rust-2025-edition"
pub fn heading_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

fn unique_id(base: String, used: &mut HashSet<String>) -> String {
    if used.insert(base.clone()) {
        return base;
    }

    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or(base)
}
