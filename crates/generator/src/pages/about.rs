use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::components::Breadcrumbs;
use crate::markdown::markdown_to_html;
use crate::schema;
use crate::seo::{Breadcrumb, OgType, PageMeta};

use super::home_crumb;

impl SiteRenderer {
    /// `/about`
    pub fn about(&self) -> String {
        let site = self.site();
        let about = &site.about;
        let trail = vec![home_crumb(), Breadcrumb::new(about.headline.clone(), "/about")];

        let body_html = self.content().inject_heading_ids(&markdown_to_html(&about.body));
        let portrait = about.image.clone().map(|src| {
            let alt = format!("Portrait of {}", site.owner.name);
            view! { <img class="about-portrait" src=src alt=alt width="480" height="480"/> }
        });
        let location = site
            .owner
            .location
            .clone()
            .map(|l| view! { <p class="about-location">{l}</p> });

        let body = view! {
            <div class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">{about.headline.clone()}</h1>
                    <p class="page-lead">{format!("{}, {}", site.owner.name, site.owner.job_title)}</p>
                    {location}
                </header>
                <div class="about-layout">
                    {portrait}
                    <div class="prose" inner_html=body_html></div>
                </div>
                <a href="/contact" class="button button-primary">"Work with me"</a>
            </div>
        }
        .to_html();

        let description = site
            .owner
            .bio
            .clone()
            .unwrap_or_else(|| format!("{} is a {}.", site.owner.name, site.owner.job_title));
        let mut meta = PageMeta::new(about.headline.clone(), description, "/about")
            .with_type(OgType::Profile);
        if let Some(image) = &about.image {
            meta = meta.with_image(image.clone(), Some(site.owner.name.clone()));
        }

        let schemas = vec![schema::about_page(site), schema::person(site)];
        self.page(&meta, schemas, &trail, body)
    }
}
