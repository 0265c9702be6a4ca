use folio_core::text::decode_entities;
use regex::Regex;

use crate::error::Result;

/// Hosts allowed as iframe sources
const IFRAME_HOSTS: &[&str] = &[
    "https://www.youtube-nocookie.com/",
    "https://www.youtube.com/",
    "https://player.vimeo.com/",
];

/// Attributes holding a URL the browser may navigate to or load
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "poster",
    "background",
    "xlink:href",
];

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:text/html"];

/// Strips active content from CMS HTML before it is inlined into a page.
///
/// Script and style elements go first. The rest is scanned tag by tag with
/// the browser's attribute rules (quoted values may hold `>`, `/` separates
/// attributes) so that what gets checked is what the browser would see.
pub struct Sanitizer {
    script: Regex,
    style: Regex,
}

impl Sanitizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            script: Regex::new(r"(?is)<script\b.*?</script\s*>")?,
            style: Regex::new(r"(?is)<style\b.*?</style\s*>")?,
        })
    }

    pub fn clean(&self, html: &str) -> String {
        let html = self.script.replace_all(html, "");
        let html = self.style.replace_all(&html, "");
        let html: &str = &html;

        let mut out = String::with_capacity(html.len());
        let mut pos = 0;

        while let Some(offset) = html[pos..].find('<') {
            let start = pos + offset;
            out.push_str(&html[pos..start]);
            let after = &html[start + 1..];

            if after.starts_with("!--") {
                pos = end_of(html, start + 2, "-->");
                continue;
            }
            if after.starts_with(['!', '?'])
                || (after.starts_with('/') && !after[1..].starts_with(|c: char| c.is_ascii_alphabetic()))
            {
                // Bogus comment: the browser skips to the next `>`
                pos = end_of(html, start + 1, ">");
                continue;
            }

            let Some(tag) = Tag::parse(html, start) else {
                out.push('<');
                pos = start + 1;
                continue;
            };
            pos = tag.end;

            // A tag cut off by the end of input is never rendered
            if !tag.terminated {
                break;
            }

            let name = tag.name.to_ascii_lowercase();
            match name.as_str() {
                "script" | "style" => {}
                "iframe" if !tag.closing && !iframe_allowed(&tag) => {
                    let lower = html[pos..].to_ascii_lowercase();
                    if let Some(close) = lower.find("</iframe") {
                        pos = end_of(html, pos + close, ">");
                    }
                }
                _ if tag.closing => out.push_str(&html[start..tag.end]),
                _ => out.push_str(&tag.rebuild(&html[start..tag.end])),
            }
        }

        if pos < html.len() {
            out.push_str(&html[pos..]);
        }
        out
    }
}

/// Byte offset just past the next `needle` at or after `from`, or the end
/// of input when there is none.
fn end_of(html: &str, from: usize, needle: &str) -> usize {
    match html.get(from..).and_then(|rest| rest.find(needle)) {
        Some(found) => from + found + needle.len(),
        None => html.len(),
    }
}

fn iframe_allowed(tag: &Tag) -> bool {
    tag.attribute("src").is_some_and(|src| {
        let src = decode_entities(src);
        let src = src.trim();
        IFRAME_HOSTS.iter().any(|host| src.starts_with(host))
    })
}

fn is_handler(name: &str) -> bool {
    name.len() > 2 && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on"))
}

/// True when a URL attribute value would run script once decoded.
/// Browsers ignore whitespace and control characters inside the scheme.
fn is_blocked_url(value: &str) -> bool {
    let decoded: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES.iter().any(|scheme| decoded.starts_with(scheme))
}

struct Attribute<'a> {
    name: &'a str,
    value: Option<&'a str>,
    raw: &'a str,
}

struct Tag<'a> {
    name: &'a str,
    closing: bool,
    self_closing: bool,
    terminated: bool,
    attributes: Vec<Attribute<'a>>,
    end: usize,
}

impl<'a> Tag<'a> {
    /// Parse the tag opening at `start`. None when the `<` does not open a
    /// tag (not followed by a letter).
    fn parse(html: &'a str, start: usize) -> Option<Self> {
        let bytes = html.as_bytes();
        let len = bytes.len();
        let is_space = |b: u8| b.is_ascii_whitespace();

        let mut i = start + 1;
        let closing = bytes.get(i) == Some(&b'/');
        if closing {
            i += 1;
        }
        if !bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
            return None;
        }

        let name_start = i;
        while i < len && !is_space(bytes[i]) && bytes[i] != b'/' && bytes[i] != b'>' {
            i += 1;
        }
        let name = &html[name_start..i];

        let mut attributes = Vec::new();
        let mut self_closing = false;
        loop {
            while i < len && (is_space(bytes[i]) || bytes[i] == b'/') {
                self_closing = bytes[i] == b'/';
                i += 1;
            }
            if i >= len {
                return Some(Self {
                    name,
                    closing,
                    self_closing,
                    terminated: false,
                    attributes,
                    end: len,
                });
            }
            if bytes[i] == b'>' {
                return Some(Self {
                    name,
                    closing,
                    self_closing,
                    terminated: true,
                    attributes,
                    end: i + 1,
                });
            }

            self_closing = false;
            let attr_start = i;
            // A leading `=` belongs to the name
            i += 1;
            while i < len
                && !is_space(bytes[i])
                && !matches!(bytes[i], b'/' | b'>' | b'=')
            {
                i += 1;
            }
            let attr_name = &html[attr_start..i];

            let mut j = i;
            while j < len && is_space(bytes[j]) {
                j += 1;
            }
            let mut value = None;
            if j < len && bytes[j] == b'=' {
                j += 1;
                while j < len && is_space(bytes[j]) {
                    j += 1;
                }
                match bytes.get(j) {
                    Some(&(quote @ (b'"' | b'\''))) => {
                        let value_start = j + 1;
                        match html[value_start..].find(quote as char) {
                            Some(close) => {
                                value = Some(&html[value_start..value_start + close]);
                                i = value_start + close + 1;
                            }
                            None => {
                                value = Some(&html[value_start..]);
                                i = len;
                            }
                        }
                    }
                    _ => {
                        let value_start = j;
                        while j < len && !is_space(bytes[j]) && bytes[j] != b'>' {
                            j += 1;
                        }
                        value = Some(&html[value_start..j]);
                        i = j;
                    }
                }
            }

            attributes.push(Attribute {
                name: attr_name,
                value,
                raw: &html[attr_start..i],
            });
        }
    }

    fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value)
    }

    fn dropped(attr: &Attribute) -> bool {
        is_handler(attr.name) || attr.name.eq_ignore_ascii_case("srcdoc")
    }

    fn neutralised(attr: &Attribute) -> bool {
        URL_ATTRIBUTES.iter().any(|n| attr.name.eq_ignore_ascii_case(n))
            && attr.value.is_some_and(is_blocked_url)
    }

    /// The tag with unsafe attributes removed. Tags with nothing to remove
    /// come back exactly as written.
    fn rebuild(&self, raw: &str) -> String {
        let changed = self
            .attributes
            .iter()
            .any(|a| Self::dropped(a) || Self::neutralised(a));
        if !changed {
            return raw.to_string();
        }

        let mut out = format!("<{}", self.name);
        for attr in &self.attributes {
            if Self::dropped(attr) {
                continue;
            }
            out.push(' ');
            if Self::neutralised(attr) {
                out.push_str(attr.name);
                out.push_str("=\"#\"");
            } else {
                out.push_str(attr.raw);
            }
        }
        if self.self_closing {
            out.push_str(" /");
        }
        out.push('>');
        out
    }
}
