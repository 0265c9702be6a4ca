//! Utility-class styling for article HTML.

use regex::{Captures, NoExpand, Regex};

use crate::error::Result;

/// Classes merged into each styled element
const TAG_CLASSES: &[(&str, &str)] = &[
    ("p", "mb-6 leading-relaxed"),
    ("h2", "mt-12 mb-4 scroll-mt-24 text-3xl font-bold"),
    ("h3", "mt-8 mb-3 scroll-mt-24 text-2xl font-semibold"),
    ("h4", "mt-6 mb-2 text-xl font-semibold"),
    ("ul", "mb-6 list-disc space-y-2 pl-6"),
    ("ol", "mb-6 list-decimal space-y-2 pl-6"),
    ("blockquote", "my-8 border-l-4 border-primary pl-6 italic"),
    ("pre", "my-6 overflow-x-auto rounded-lg bg-slate-900 p-4 text-sm text-slate-100"),
    ("code", "font-mono"),
    ("a", "text-primary underline underline-offset-2 hover:no-underline"),
    ("img", "h-auto max-w-full rounded-lg"),
    ("figure", "my-8"),
    ("figcaption", "mt-2 text-center text-sm text-slate-500"),
    ("table", "my-6 w-full border-collapse text-left"),
    ("th", "border-b p-2 font-semibold"),
    ("td", "border-b p-2"),
    ("hr", "my-12 border-slate-200"),
];

/// Merge class lists: empty entries dropped, duplicates collapsed to their
/// last occurrence so later lists take precedence in ordering.
///
/// ```
/// use folio_content::class_names;
/// assert_eq!(class_names(["btn", "", "btn-primary btn"]), "btn-primary btn");
/// ```
pub fn class_names<'a, I>(lists: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let all: Vec<&str> = lists
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect();

    let mut kept: Vec<&str> = Vec::with_capacity(all.len());
    for (i, &class) in all.iter().enumerate() {
        if !all[i + 1..].contains(&class) {
            kept.push(class);
        }
    }
    kept.join(" ")
}

pub struct Styler {
    tag: Regex,
    class_attr: Regex,
}

impl Styler {
    pub fn new() -> Result<Self> {
        let names: Vec<&str> = TAG_CLASSES.iter().map(|(tag, _)| *tag).collect();
        Ok(Self {
            tag: Regex::new(&format!(r"(?i)<({})(\s[^>]*)?>", names.join("|")))?,
            class_attr: Regex::new(r#"(?i)\sclass\s*=\s*"([^"]*)""#)?,
        })
    }

    /// Merge the utility classes into every styled opening tag. Classes the
    /// editor already set come last and win.
    pub fn apply(&self, html: &str) -> String {
        self.tag
            .replace_all(html, |caps: &Captures| {
                let name = caps[1].to_ascii_lowercase();
                let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                let Some((_, ours)) = TAG_CLASSES.iter().find(|(tag, _)| *tag == name) else {
                    return caps[0].to_string();
                };

                match self.class_attr.captures(attrs) {
                    Some(existing) => {
                        let merged = class_names([*ours, &existing[1]]);
                        let replacement = format!(r#" class="{}""#, merged);
                        let attrs = self.class_attr.replace(attrs, NoExpand(&replacement));
                        format!("<{}{}>", &caps[1], attrs)
                    }
                    None => format!(r#"<{} class="{}"{}>"#, &caps[1], ours, attrs),
                }
            })
            .into_owned()
    }
}
