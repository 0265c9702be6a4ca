//! Block tree to HTML.
//!
//! Static blocks already carry their saved markup, so the default is to
//! splice rendered children back into `inner_content`. Only the blocks whose
//! front-end output WordPress computes at render time get special handling.

use folio_core::text::html_escape;
use regex::Regex;
use tracing::debug;

use crate::blocks::{Block, Fragment};
use crate::error::Result;

/// Blocks that never produce front-end output
const SKIPPED_BLOCKS: &[&str] = &["core/more", "core/nextpage", "core/shortcode"];

pub struct BlockRenderer {
    youtube: Regex,
    vimeo: Regex,
    url: Regex,
    figcaption: Regex,
    block_level: Regex,
    paragraph_break: Regex,
}

impl BlockRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            youtube: Regex::new(
                r"^https?://(?:www\.|m\.)?(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{6,})",
            )?,
            vimeo: Regex::new(r"^https?://(?:www\.)?(?:player\.)?vimeo\.com/(?:video/)?(\d+)")?,
            url: Regex::new(r#"https?://[^\s<>"']+"#)?,
            figcaption: Regex::new(r"(?is)<figcaption\b[^>]*>.*?</figcaption\s*>")?,
            block_level: Regex::new(
                r"(?i)<(?:p|div|h[1-6]|ul|ol|table|blockquote|pre|figure|section|hr)\b",
            )?,
            paragraph_break: Regex::new(r"\n\s*\n")?,
        })
    }

    pub fn render(&self, blocks: &[Block]) -> String {
        let mut out = String::new();
        for block in blocks {
            self.render_block(block, &mut out);
        }
        out
    }

    fn render_block(&self, block: &Block, out: &mut String) {
        let Some(name) = block.name.as_deref() else {
            out.push_str(&self.autop(&block.inner_html));
            return;
        };

        if SKIPPED_BLOCKS.contains(&name) {
            return;
        }

        if block.is_empty() {
            debug!(block = name, "skipping dynamic block without saved markup");
            return;
        }

        match name {
            "core/html" => out.push_str(&block.inner_html),
            "core/embed" => out.push_str(&self.render_embed(block)),
            n if n.starts_with("core-embed/") => out.push_str(&self.render_embed(block)),
            "core/code" => out.push_str(&code_with_language(
                &self.serialize(block),
                block.attr_str("language"),
            )),
            _ => out.push_str(&self.serialize(block)),
        }
    }

    /// Saved markup with children rendered in place
    fn serialize(&self, block: &Block) -> String {
        let mut out = String::with_capacity(block.inner_html.len());
        for fragment in &block.inner_content {
            match fragment {
                Fragment::Html(html) => out.push_str(html),
                Fragment::Block(index) => {
                    if let Some(child) = block.inner_blocks.get(*index) {
                        self.render_block(child, &mut out);
                    }
                }
            }
        }
        out
    }

    fn render_embed(&self, block: &Block) -> String {
        let url = block
            .attr_str("url")
            .map(str::to_string)
            .or_else(|| {
                self.url
                    .find(&block.inner_html)
                    .map(|m| m.as_str().to_string())
            });

        let Some(url) = url else {
            return String::new();
        };

        let caption = self
            .figcaption
            .find(&block.inner_html)
            .map(|m| m.as_str())
            .unwrap_or_default();

        match self.player_url(&url) {
            Some(src) => format!(
                r#"<figure class="wp-block-embed"><div class="embed-responsive"><iframe src="{}" title="Embedded video" loading="lazy" allowfullscreen></iframe></div>{}</figure>"#,
                html_escape(&src),
                caption
            ),
            None => {
                let escaped = html_escape(&url);
                format!(
                    r#"<figure class="wp-block-embed"><p><a href="{}" rel="noopener">{}</a></p>{}</figure>"#,
                    escaped, escaped, caption
                )
            }
        }
    }

    /// Privacy-friendly player URL for the providers we embed inline
    pub fn player_url(&self, url: &str) -> Option<String> {
        if let Some(caps) = self.youtube.captures(url) {
            return Some(format!("https://www.youtube-nocookie.com/embed/{}", &caps[1]));
        }
        if let Some(caps) = self.vimeo.captures(url) {
            return Some(format!("https://player.vimeo.com/video/{}", &caps[1]));
        }
        None
    }

    /// Classic-editor content: infer paragraphs from blank lines unless the
    /// HTML is already structured.
    fn autop(&self, html: &str) -> String {
        if self.block_level.is_match(html) {
            return html.to_string();
        }

        self.paragraph_break
            .split(html)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("<p>{}</p>\n", p.replace('\n', "<br />\n")))
            .collect()
    }
}

/// Expose the code block's language as a `language-*` class on `<code>`
fn code_with_language(html: &str, language: Option<&str>) -> String {
    let Some(lang) = language.filter(|l| {
        !l.is_empty() && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '+')
    }) else {
        return html.to_string();
    };

    if html.contains("<code class=") {
        return html.to_string();
    }

    html.replacen("<code", &format!(r#"<code class="language-{}""#, lang), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockParser;

    fn render(doc: &str) -> String {
        let blocks = BlockParser::new().unwrap().parse(doc).unwrap();
        BlockRenderer::new().unwrap().render(&blocks)
    }

    #[test]
    fn test_static_blocks_keep_saved_markup() {
        let html = render(
            "<!-- wp:paragraph -->\n<p>Hello <strong>world</strong></p>\n<!-- /wp:paragraph -->",
        );
        assert_eq!(html, "\n<p>Hello <strong>world</strong></p>\n");
    }

    #[test]
    fn test_nested_children_render_in_place() {
        let html = render(
            "<!-- wp:quote --><blockquote class=\"wp-block-quote\">\
             <!-- wp:paragraph --><p>Ship it.</p><!-- /wp:paragraph -->\
             <cite>Someone</cite></blockquote><!-- /wp:quote -->",
        );
        assert_eq!(
            html,
            "<blockquote class=\"wp-block-quote\"><p>Ship it.</p><cite>Someone</cite></blockquote>"
        );
    }

    #[test]
    fn test_dynamic_and_skipped_blocks_are_dropped() {
        let html = render(
            "<!-- wp:latest-posts /--><!-- wp:more --><!--more--><!-- /wp:more -->\
             <!-- wp:paragraph --><p>kept</p><!-- /wp:paragraph -->",
        );
        assert_eq!(html, "<p>kept</p>");
    }

    #[test]
    fn test_youtube_embed_becomes_iframe() {
        let html = render(
            "<!-- wp:embed {\"url\":\"https://www.youtube.com/watch?v=dQw4w9WgXcQ\",\"providerNameSlug\":\"youtube\"} -->\n\
             <figure class=\"wp-block-embed\"><div class=\"wp-block-embed__wrapper\">\n\
             https://www.youtube.com/watch?v=dQw4w9WgXcQ\n</div><figcaption>Demo</figcaption></figure>\n\
             <!-- /wp:embed -->",
        );
        assert!(html.contains(r#"src="https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ""#));
        assert!(html.contains("<figcaption>Demo</figcaption>"));
    }

    #[test]
    fn test_unknown_embed_becomes_link() {
        let html = render(
            "<!-- wp:embed {\"url\":\"https://twitter.com/x/status/1\"} -->\
             <figure></figure><!-- /wp:embed -->",
        );
        assert!(html.contains(r#"<a href="https://twitter.com/x/status/1""#));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_player_url() {
        let renderer = BlockRenderer::new().unwrap();
        assert_eq!(
            renderer.player_url("https://youtu.be/abcdef12345").as_deref(),
            Some("https://www.youtube-nocookie.com/embed/abcdef12345")
        );
        assert_eq!(
            renderer.player_url("https://vimeo.com/76979871").as_deref(),
            Some("https://player.vimeo.com/video/76979871")
        );
        assert_eq!(renderer.player_url("https://example.com/video"), None);
    }

    #[test]
    fn test_code_language_class() {
        let html = render(
            "<!-- wp:code {\"language\":\"rust\"} --><pre class=\"wp-block-code\"><code>fn main() {}</code></pre><!-- /wp:code -->",
        );
        assert_eq!(
            html,
            "<pre class=\"wp-block-code\"><code class=\"language-rust\">fn main() {}</code></pre>"
        );
    }

    #[test]
    fn test_freeform_autop() {
        let html = render("First line\nsecond line\n\nNext paragraph");
        assert_eq!(
            html,
            "<p>First line<br />\nsecond line</p>\n<p>Next paragraph</p>\n"
        );

        let structured = render("<p>Already wrapped</p>\n\n<p>Twice</p>");
        assert_eq!(structured, "<p>Already wrapped</p>\n\n<p>Twice</p>");
    }
}
