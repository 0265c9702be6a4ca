use folio_core::Project;
use folio_core::cms::Post;
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::components::{CardGrid, Hero, PostCard, ProjectCard, Section, ServiceCard};
use crate::markdown::markdown_to_html;
use crate::schema;
use crate::seo::PageMeta;

const FEATURED_PROJECTS: usize = 3;
const LATEST_POSTS: usize = 3;

/// Featured projects, topped up with the most recent others
fn showcase(projects: &[Project]) -> Vec<Project> {
    let mut picked: Vec<Project> = projects.iter().filter(|p| p.featured).cloned().collect();
    if picked.len() < FEATURED_PROJECTS {
        picked.extend(projects.iter().filter(|p| !p.featured).cloned());
    }
    picked.truncate(FEATURED_PROJECTS);
    picked
}

impl SiteRenderer {
    /// `/`: hero, services overview, featured projects, latest posts and a
    /// closing call to action
    pub fn home(&self, posts: &[Post], projects: &[Project]) -> String {
        let site = self.site();
        let intro_html = site
            .home
            .intro
            .as_deref()
            .map(markdown_to_html)
            .unwrap_or_default();

        let services = (!site.services.is_empty()).then(|| {
            let cards = site
                .services
                .iter()
                .cloned()
                .map(|service| view! { <ServiceCard service=service/> })
                .collect_view();
            view! {
                <Section id={"services".to_string()} title={"Services".to_string()}>
                    <CardGrid>{cards}</CardGrid>
                    <a href="/services" class="section-link">"All services →"</a>
                </Section>
            }
        });

        let featured = showcase(projects);
        let work = (!featured.is_empty()).then(|| {
            let cards = featured
                .into_iter()
                .map(|project| view! { <ProjectCard project=project/> })
                .collect_view();
            view! {
                <Section id={"work".to_string()} title={"Selected work".to_string()}>
                    <CardGrid>{cards}</CardGrid>
                    <a href="/projects" class="section-link">"View all projects →"</a>
                </Section>
            }
        });

        let latest = (!posts.is_empty()).then(|| {
            let cards = posts
                .iter()
                .take(LATEST_POSTS)
                .cloned()
                .map(|post| view! { <PostCard post=post/> })
                .collect_view();
            view! {
                <Section id={"latest".to_string()} title={"From the blog".to_string()}>
                    <CardGrid>{cards}</CardGrid>
                    <a href="/blog" class="section-link">"Read the blog →"</a>
                </Section>
            }
        });

        let cta_label = site.home.cta_label.clone();
        let cta_href = site.home.cta_href.clone();
        let body = view! {
            <Hero home={site.home.clone()} intro_html=intro_html/>
            {services}
            {work}
            {latest}
            <section class="cta">
                <div class="container">
                    <h2 class="cta-title">"Have a project in mind?"</h2>
                    <a href=cta_href class="button button-primary">{cta_label}</a>
                </div>
            </section>
        }
        .to_html();

        let meta = PageMeta::home(site.meta.description.clone());
        let schemas = vec![
            schema::professional_service(site),
            schema::person(site),
            schema::website(site),
        ];
        self.page(&meta, schemas, &[], body)
    }
}
