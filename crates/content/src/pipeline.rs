//! The blog content pipeline.
//!
//! ```text
//! block markup ──parse──► blocks ──render──► HTML ─┐
//!        │ (absent)                 (error)        │
//!        └────────► rendered HTML ◄────────────────┤
//!                                                  ▼
//!                       sanitize ► style ► heading ids ► TOC + reading time
//! ```
//!
//! Processing is a single stateless pass per post. A [`ContentProcessor`]
//! holds only compiled patterns and is shared across requests.

use folio_core::cms::Post;
use serde::Serialize;
use tracing::{debug, warn};

use crate::blocks::BlockParser;
use crate::error::Result;
use crate::headings::{Headings, TocEntry};
use crate::reading_time::reading_time_minutes;
use crate::render::BlockRenderer;
use crate::sanitize::Sanitizer;
use crate::style::Styler;

/// Which source the final HTML came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderPath {
    /// Converted from block markup
    Blocks,
    /// No block markup: WordPress' rendered HTML
    Rendered,
    /// Block conversion failed: WordPress' rendered HTML
    Fallback,
}

/// Article body ready to inline into a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedContent {
    pub html: String,
    pub toc: Vec<TocEntry>,
    pub reading_time: u32,
    pub path: RenderPath,
}

pub struct ContentProcessor {
    parser: BlockParser,
    renderer: BlockRenderer,
    sanitizer: Sanitizer,
    styler: Styler,
    headings: Headings,
}

impl ContentProcessor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            parser: BlockParser::new()?,
            renderer: BlockRenderer::new()?,
            sanitizer: Sanitizer::new()?,
            styler: Styler::new()?,
            headings: Headings::new()?,
        })
    }

    pub fn process_post(&self, post: &Post) -> ProcessedContent {
        debug!(post = post.id, slug = %post.slug, "processing post content");
        self.process(post.block_markup(), &post.content.rendered)
    }

    /// Run the pipeline. Never fails: a block conversion error is logged and
    /// the rendered HTML is used instead.
    pub fn process(&self, block_markup: Option<&str>, rendered: &str) -> ProcessedContent {
        let (html, path) = match block_markup {
            Some(markup) => match self.convert_blocks(markup) {
                Ok(html) => (html, RenderPath::Blocks),
                Err(e) => {
                    warn!(error = %e, "Block conversion failed, falling back to rendered content");
                    (self.finish_html(rendered), RenderPath::Fallback)
                }
            },
            None => (self.finish_html(rendered), RenderPath::Rendered),
        };

        let html = self.headings.inject_ids(&html);
        let toc = self.headings.toc(&html);
        let reading_time = reading_time_minutes(&html);

        ProcessedContent {
            html,
            toc,
            reading_time,
            path,
        }
    }

    /// Block markup to sanitized, styled HTML
    pub fn convert_blocks(&self, markup: &str) -> Result<String> {
        let blocks = self.parser.parse(markup)?;
        let html = self.renderer.render(&blocks);
        Ok(self.finish_html(&html))
    }

    /// Heading-id injection on its own, for callers that only need anchors
    pub fn inject_heading_ids(&self, html: &str) -> String {
        self.headings.inject_ids(html)
    }

    pub fn table_of_contents(&self, html: &str) -> Vec<TocEntry> {
        self.headings.toc(html)
    }

    fn finish_html(&self, html: &str) -> String {
        self.styler.apply(&self.sanitizer.clean(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> ContentProcessor {
        ContentProcessor::new().unwrap()
    }

    const BLOCKS: &str = "<!-- wp:paragraph -->\n<p>Intro text here.</p>\n<!-- /wp:paragraph -->\n\n\
        <!-- wp:heading -->\n<h2 class=\"wp-block-heading\">First Steps</h2>\n<!-- /wp:heading -->\n\n\
        <!-- wp:heading {\"level\":3} -->\n<h3 class=\"wp-block-heading\">Install</h3>\n<!-- /wp:heading -->";

    #[test]
    fn test_block_path() {
        let out = processor().process(Some(BLOCKS), "<p>rendered</p>");
        assert_eq!(out.path, RenderPath::Blocks);
        assert!(out.html.contains("Intro text here."));
        assert!(!out.html.contains("rendered"));
        assert!(out.html.contains("id=\"first-steps\""));
        assert_eq!(out.toc.len(), 2);
        assert_eq!(out.toc[1].level, 3);
        assert_eq!(out.toc[1].id, "install");
        assert_eq!(out.reading_time, 1);
    }

    #[test]
    fn test_rendered_path_when_blocks_absent() {
        let out = processor().process(None, "<h2>Only Rendered</h2><p>Body</p>");
        assert_eq!(out.path, RenderPath::Rendered);
        assert_eq!(out.toc[0].id, "only-rendered");
    }

    #[test]
    fn test_fallback_when_conversion_fails() {
        let broken = "<!-- wp:paragraph {\"align\":} --><p>x</p><!-- /wp:paragraph -->";
        let out = processor().process(Some(broken), "<h2>Safe</h2><p>Fallback body</p>");
        assert_eq!(out.path, RenderPath::Fallback);
        assert!(out.html.contains("Fallback body"));
        assert_eq!(out.toc[0].id, "safe");
    }

    #[test]
    fn test_fallback_with_empty_rendered_content() {
        let out = processor().process(Some("<!-- wp:paragraph -->"), "");
        assert_eq!(out.path, RenderPath::Fallback);
        assert_eq!(out.html, "");
        assert!(out.toc.is_empty());
        assert_eq!(out.reading_time, 0);
    }

    #[test]
    fn test_output_is_sanitized() {
        let out = processor().process(None, "<p onclick=\"x()\">hi</p><script>bad()</script>");
        assert!(!out.html.contains("onclick"));
        assert!(!out.html.contains("<script"));
    }

    #[test]
    fn test_rendered_fallback_drops_slash_separated_handlers() {
        let out = processor().process(None, "<p>Logo</p><svg/onload=alert(1)><a href=javascript:x()>x</a>");
        assert!(!out.html.contains("onload"));
        assert!(!out.html.contains("javascript:"));
    }
}
