mod about;
mod blog;
mod contact;
mod errors;
mod home;
mod projects;
mod services;

pub use blog::archive_path;
pub use projects::category_path;

use serde_json::Value;

use crate::SiteRenderer;
use crate::document::{Document, render_document};
use crate::schema;
use crate::seo::{Breadcrumb, PageMeta};

impl SiteRenderer {
    /// Wrap a rendered body in the site chrome. Breadcrumb pages also get a
    /// `BreadcrumbList` block.
    fn page(&self, meta: &PageMeta, mut schemas: Vec<Value>, trail: &[Breadcrumb], body: String) -> String {
        if trail.len() > 1 {
            schemas.push(schema::breadcrumbs(self.site(), trail));
        }
        render_document(
            self.site(),
            Document {
                meta,
                schemas,
                body,
            },
            self.live_reload,
        )
    }
}

fn home_crumb() -> Breadcrumb {
    Breadcrumb::new("Home", "/")
}

fn blog_crumb() -> Breadcrumb {
    Breadcrumb::new("Blog", "/blog")
}
