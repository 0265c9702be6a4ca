//! Parser for serialized WordPress block markup.
//!
//! The block editor stores posts as HTML interleaved with comment
//! delimiters:
//!
//! ```text
//! <!-- wp:heading {"level":3} -->
//! <h3 class="wp-block-heading">Setup</h3>
//! <!-- /wp:heading -->
//! <!-- wp:separator /-->
//! ```
//!
//! HTML outside any delimiter is "freeform" (classic editor) content. The
//! parser is strict: a delimiter structure WordPress itself would repair is
//! reported as an error so that the caller can fall back to the
//! server-rendered HTML instead.

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{ContentError, Result};

/// Nesting limit for open blocks
pub const MAX_DEPTH: usize = 64;

const DELIMITER: &str = r"(?s)<!--\s+(/)?wp:([a-z][a-z0-9_-]*(?:/[a-z][a-z0-9_-]*)?)\s+(\{.*?\}\s+)?(/)?-->";

/// A parsed block
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Fully qualified name ("core/paragraph"); `None` for freeform HTML
    pub name: Option<String>,
    pub attrs: Map<String, Value>,
    pub inner_blocks: Vec<Block>,
    /// Saved HTML of this block without its children
    pub inner_html: String,
    /// Saved HTML interleaved with child positions, in document order
    pub inner_content: Vec<Fragment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Html(String),
    /// Index into `inner_blocks`
    Block(usize),
}

impl Block {
    fn new(name: Option<String>, attrs: Map<String, Value>) -> Self {
        Self {
            name,
            attrs,
            inner_blocks: Vec::new(),
            inner_html: String::new(),
            inner_content: Vec::new(),
        }
    }

    fn freeform(html: &str) -> Self {
        let mut block = Self::new(None, Map::new());
        block.push_html(html);
        block
    }

    fn push_html(&mut self, html: &str) {
        self.inner_html.push_str(html);
        match self.inner_content.last_mut() {
            Some(Fragment::Html(last)) => last.push_str(html),
            _ => self.inner_content.push(Fragment::Html(html.to_string())),
        }
    }

    fn push_child(&mut self, child: Block) {
        self.inner_content
            .push(Fragment::Block(self.inner_blocks.len()));
        self.inner_blocks.push(child);
    }

    /// Block name, or "freeform" for classic content
    pub fn name_or_freeform(&self) -> &str {
        self.name.as_deref().unwrap_or("freeform")
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// True for dynamic blocks saved without markup (rendered by PHP on the
    /// WordPress side, e.g. `core/latest-posts`)
    pub fn is_empty(&self) -> bool {
        self.inner_blocks.is_empty() && self.inner_html.trim().is_empty()
    }
}

/// Compiled block delimiter tokenizer
pub struct BlockParser {
    delimiter: Regex,
}

impl BlockParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            delimiter: Regex::new(DELIMITER)?,
        })
    }

    /// Parse a serialized document into its top-level blocks.
    ///
    /// Whitespace-only HTML between top-level blocks is dropped; any other
    /// top-level HTML becomes a freeform block.
    pub fn parse(&self, document: &str) -> Result<Vec<Block>> {
        let mut output: Vec<Block> = Vec::new();
        let mut stack: Vec<Block> = Vec::new();
        let mut offset = 0;

        for caps in self.delimiter.captures_iter(document) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            push_html(&mut stack, &mut output, &document[offset..whole.start()]);
            offset = whole.end();

            let is_closer = caps.get(1).is_some();
            let is_void = caps.get(4).is_some();
            let name = normalize_name(&caps[2]);

            if is_closer {
                let Some(block) = stack.pop() else {
                    return Err(ContentError::UnexpectedCloser { found: name });
                };

                let open_name = block.name_or_freeform().to_string();
                if open_name != name {
                    return Err(ContentError::MismatchedCloser {
                        expected: open_name,
                        found: name,
                    });
                }

                attach(&mut stack, &mut output, block);
                continue;
            }

            let attrs = match caps.get(3) {
                Some(json) => parse_attrs(json.as_str(), &name)?,
                None => Map::new(),
            };
            let block = Block::new(Some(name), attrs);

            if is_void {
                attach(&mut stack, &mut output, block);
            } else {
                if stack.len() >= MAX_DEPTH {
                    return Err(ContentError::TooDeep(MAX_DEPTH));
                }
                stack.push(block);
            }
        }

        push_html(&mut stack, &mut output, &document[offset..]);

        if let Some(open) = stack.last() {
            return Err(ContentError::UnclosedBlock {
                name: open.name_or_freeform().to_string(),
            });
        }

        Ok(output)
    }
}

/// "paragraph" -> "core/paragraph"
fn normalize_name(raw: &str) -> String {
    if raw.contains('/') {
        raw.to_string()
    } else {
        format!("core/{}", raw)
    }
}

fn parse_attrs(json: &str, name: &str) -> Result<Map<String, Value>> {
    serde_json::from_str(json.trim()).map_err(|source| ContentError::InvalidAttributes {
        name: name.to_string(),
        source,
    })
}

fn push_html(stack: &mut [Block], output: &mut Vec<Block>, html: &str) {
    if html.is_empty() {
        return;
    }

    match stack.last_mut() {
        Some(open) => open.push_html(html),
        None if html.trim().is_empty() => {}
        None => output.push(Block::freeform(html)),
    }
}

fn attach(stack: &mut [Block], output: &mut Vec<Block>, block: Block) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(block),
        None => output.push(block),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(doc: &str) -> Result<Vec<Block>> {
        BlockParser::new().unwrap().parse(doc)
    }

    #[test]
    fn test_parse_simple_blocks() {
        let doc = "<!-- wp:paragraph -->\n<p>Hello</p>\n<!-- /wp:paragraph -->\n\n\
                   <!-- wp:heading {\"level\":3} -->\n<h3>Setup</h3>\n<!-- /wp:heading -->";
        let blocks = parse(doc).unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name.as_deref(), Some("core/paragraph"));
        assert_eq!(blocks[0].inner_html, "\n<p>Hello</p>\n");
        assert_eq!(blocks[1].attrs.get("level"), Some(&Value::from(3)));
    }

    #[test]
    fn test_parse_void_block() {
        let blocks = parse("<!-- wp:separator /-->").unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_empty());

        let blocks = parse("<!-- wp:latest-posts {\"postsToShow\":3} /-->").unwrap();
        assert_eq!(blocks[0].name.as_deref(), Some("core/latest-posts"));
        assert_eq!(blocks[0].attrs.get("postsToShow"), Some(&Value::from(3)));
    }

    #[test]
    fn test_parse_nested_blocks_keep_positions() {
        let doc = "<!-- wp:group -->\n<div class=\"wp-block-group\">\
                   <!-- wp:paragraph --><p>One</p><!-- /wp:paragraph -->\
                   <!-- wp:paragraph --><p>Two</p><!-- /wp:paragraph -->\
                   </div>\n<!-- /wp:group -->";
        let blocks = parse(doc).unwrap();

        assert_eq!(blocks.len(), 1);
        let group = &blocks[0];
        assert_eq!(group.inner_blocks.len(), 2);
        assert_eq!(
            group.inner_content,
            vec![
                Fragment::Html("\n<div class=\"wp-block-group\">".to_string()),
                Fragment::Block(0),
                Fragment::Block(1),
                Fragment::Html("</div>\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_namespaced_and_nested_json_attrs() {
        let doc = "<!-- wp:acme/callout {\"style\":{\"color\":{\"text\":\"#fff\"}}} -->\
                   <div>Hi</div><!-- /wp:acme/callout -->";
        let blocks = parse(doc).unwrap();
        assert_eq!(blocks[0].name.as_deref(), Some("acme/callout"));
        assert_eq!(blocks[0].attrs["style"]["color"]["text"], "#fff");
    }

    #[test]
    fn test_parse_freeform_between_blocks() {
        let doc = "<p>Classic intro</p>\n<!-- wp:separator /-->\n\n";
        let blocks = parse(doc).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, None);
        assert_eq!(blocks[0].inner_html, "<p>Classic intro</p>\n");
    }

    #[test]
    fn test_parse_plain_html_is_one_freeform_block() {
        let blocks = parse("<p>No delimiters at all</p>").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name_or_freeform(), "freeform");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse("<!-- wp:image {\"id\":} --><figure></figure><!-- /wp:image -->")
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidAttributes { .. }));
    }

    #[test]
    fn test_parse_rejects_unbalanced_markup() {
        let err = parse("<!-- /wp:paragraph -->").unwrap_err();
        assert!(matches!(err, ContentError::UnexpectedCloser { .. }));

        let err = parse("<!-- wp:paragraph --><p>x</p>").unwrap_err();
        assert!(matches!(err, ContentError::UnclosedBlock { .. }));

        let err = parse("<!-- wp:quote --><!-- wp:paragraph --><p>x</p><!-- /wp:quote -->")
            .unwrap_err();
        assert!(matches!(err, ContentError::MismatchedCloser { .. }));
    }

    #[test]
    fn test_parse_rejects_excessive_nesting() {
        let depth = MAX_DEPTH + 1;
        let doc = format!(
            "{}{}",
            "<!-- wp:group -->".repeat(depth),
            "<!-- /wp:group -->".repeat(depth)
        );
        assert!(matches!(parse(&doc).unwrap_err(), ContentError::TooDeep(_)));
    }

    #[test]
    fn test_ordinary_comments_are_html() {
        let blocks = parse("<!-- just a comment --><p>x</p>").unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].inner_html.contains("just a comment"));
    }
}
