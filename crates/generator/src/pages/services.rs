use folio_core::Service;
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::components::{Breadcrumbs, CardGrid, ServiceCard};
use crate::markdown::markdown_to_html;
use crate::schema;
use crate::seo::{Breadcrumb, PageMeta};

use super::home_crumb;

fn services_crumb() -> Breadcrumb {
    Breadcrumb::new("Services", "/services")
}

impl SiteRenderer {
    /// `/services`
    pub fn services(&self) -> String {
        let site = self.site();
        let trail = vec![home_crumb(), services_crumb()];
        let cards = site
            .services
            .iter()
            .cloned()
            .map(|service| view! { <ServiceCard service=service/> })
            .collect_view();

        let body = view! {
            <div class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">"Services"</h1>
                    <p class="page-lead">{site.meta.description.clone()}</p>
                </header>
                <CardGrid>{cards}</CardGrid>
            </div>
        }
        .to_html();

        let meta = PageMeta::new(
            "Services",
            format!("Services offered by {}: {}", site.owner.name, service_titles(&site.services)),
            "/services",
        );
        let mut schemas = vec![schema::professional_service(site)];
        schemas.extend(site.services.iter().map(|s| schema::service(site, s)));
        self.page(&meta, schemas, &trail, body)
    }

    /// `/services/{slug}`
    pub fn service(&self, service: &Service) -> String {
        let site = self.site();
        let trail = vec![
            home_crumb(),
            services_crumb(),
            Breadcrumb::new(service.title.clone(), service.path()),
        ];
        let body_html = self
            .content()
            .inject_heading_ids(&markdown_to_html(&service.body));
        let features = (!service.features.is_empty()).then(|| {
            let items = service
                .features
                .iter()
                .map(|f| view! { <li>{f.clone()}</li> })
                .collect_view();
            view! {
                <aside class="feature-box">
                    <h2 class="feature-title">"What's included"</h2>
                    <ul class="feature-list">{items}</ul>
                </aside>
            }
        });
        let price = service
            .price_from
            .clone()
            .map(|p| view! { <p class="service-price">{format!("Projects from {p}")}</p> });

        let body = view! {
            <article class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">{service.title.clone()}</h1>
                    <p class="page-lead">{service.summary.clone()}</p>
                    {price}
                </header>
                <div class="service-layout">
                    <div class="prose" inner_html=body_html></div>
                    {features}
                </div>
                <a href="/contact" class="button button-primary">"Start a project"</a>
            </article>
        }
        .to_html();

        let meta = PageMeta::new(service.title.clone(), service.summary.clone(), service.path());
        let schemas = vec![schema::service(site, service)];
        self.page(&meta, schemas, &trail, body)
    }
}

fn service_titles(services: &[Service]) -> String {
    services
        .iter()
        .map(|s| s.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
