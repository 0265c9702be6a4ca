// Full HTML document: head metadata, JSON-LD, site chrome around the page body

use chrono::Datelike;
use folio_core::Site;
use folio_core::text::html_escape;
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;
use serde_json::Value;

use crate::components::{SiteFooter, SiteHeader};
use crate::schema;
use crate::seo::{PageMeta, render_head};

/// Stylesheet written by `folio init` into public/
pub const STYLESHEET: &str = "/styles.css";

/// Reload the page whenever the dev server reports a change
pub const LIVE_RELOAD_SCRIPT: &str = r#"<script>
    // Live reload via Server-Sent Events
    const eventSource = new EventSource('/_reload');
    eventSource.onmessage = () => location.reload();
    eventSource.onerror = () => eventSource.close();
</script>"#;

pub(crate) struct Document<'a> {
    pub meta: &'a PageMeta,
    pub schemas: Vec<Value>,
    pub body: String,
}

pub(crate) fn render_document(site: &Site, doc: Document<'_>, live_reload: bool) -> String {
    let head = render_head(site, doc.meta);
    let json_ld: String = doc.schemas.iter().map(schema::script).collect::<Vec<_>>().join("\n");

    let chrome = view! {
        <a href="#main" class="skip-link">"Skip to content"</a>
        <SiteHeader
            site_name={site.meta.name.clone()}
            nav={site.nav.clone()}
            current={doc.meta.path.clone()}
        />
        <main id="main" inner_html={doc.body}></main>
        <SiteFooter
            site_name={site.meta.name.clone()}
            owner={site.owner.clone()}
            nav={site.nav.clone()}
            year={chrono::Utc::now().year()}
        />
    }
    .to_html();

    let reload = if live_reload { LIVE_RELOAD_SCRIPT } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
{head}<link rel="stylesheet" href="{STYLESHEET}">
{json_ld}
</head>
<body>
{chrome}
{reload}
</body>
</html>
"#,
        lang = html_escape(site.meta.language()),
    )
}
