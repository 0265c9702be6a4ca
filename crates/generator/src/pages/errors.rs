use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::seo::PageMeta;

impl SiteRenderer {
    /// 404 page
    pub fn not_found(&self, path: &str) -> String {
        let requested = path.to_string();
        let body = view! {
            <div class="container page error-page">
                <p class="error-code">"404"</p>
                <h1 class="page-title">"Page not found"</h1>
                <p class="page-lead">
                    "Nothing lives at "<code>{requested}</code>". It may have moved, or the link may be wrong."
                </p>
                <p>
                    <a href="/" class="button button-primary">"Home"</a>
                    " "
                    <a href="/blog" class="button">"Blog"</a>
                </p>
            </div>
        }
        .to_html();

        let meta = PageMeta::new(
            "Page not found",
            "The page you were looking for does not exist.",
            path,
        )
        .noindex();
        self.page(&meta, Vec::new(), &[], body)
    }

    /// Generic error page. Carries no detail about the failure.
    pub fn error(&self, path: &str) -> String {
        let body = view! {
            <div class="container page error-page">
                <p class="error-code">"500"</p>
                <h1 class="page-title">"Something went wrong"</h1>
                <p class="page-lead">"Please try again in a moment."</p>
                <a href="/" class="button button-primary">"Home"</a>
            </div>
        }
        .to_html();

        let meta = PageMeta::new("Something went wrong", "", path).noindex();
        self.page(&meta, Vec::new(), &[], body)
    }
}
