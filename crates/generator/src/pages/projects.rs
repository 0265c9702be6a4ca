use folio_core::{Project, project_categories};
use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::components::{BLUR_PLACEHOLDER, Breadcrumbs, CardGrid, ProjectCard};
use crate::markdown::markdown_to_html;
use crate::schema;
use crate::seo::{Breadcrumb, PageMeta};

use super::home_crumb;

fn projects_crumb() -> Breadcrumb {
    Breadcrumb::new("Projects", "/projects")
}

pub fn category_path(slug: &str) -> String {
    format!("/projects/category/{slug}")
}

impl SiteRenderer {
    /// `/projects` and `/projects/category/{slug}`. Returns `None` for a
    /// category no project belongs to.
    pub fn projects(&self, projects: &[Project], category: Option<&str>) -> Option<String> {
        let site = self.site();
        let categories = project_categories(projects);

        let (label, path) = match category {
            Some(slug) => {
                let (_, label) = categories.iter().find(|(s, _)| s == slug)?;
                (Some(label.clone()), category_path(slug))
            }
            None => (None, "/projects".to_string()),
        };

        let shown: Vec<&Project> = projects
            .iter()
            .filter(|p| category.is_none_or(|slug| p.category_slug() == slug))
            .collect();

        let mut trail = vec![home_crumb(), projects_crumb()];
        if let Some(label) = &label {
            trail.push(Breadcrumb::new(label.clone(), path.clone()));
        }

        let filters = categories
            .iter()
            .map(|(slug, name)| {
                let active = category == Some(slug.as_str());
                let class = if active { "filter active" } else { "filter" };
                let current = active.then_some("page");
                let href = category_path(slug);
                view! { <li><a href=href class=class aria-current=current>{name.clone()}</a></li> }
            })
            .collect_view();
        let all_class = if category.is_none() { "filter active" } else { "filter" };

        let cards = shown
            .iter()
            .map(|p| view! { <ProjectCard project={(*p).clone()}/> })
            .collect_view();

        let heading = match &label {
            Some(label) => format!("{label} projects"),
            None => "Projects".to_string(),
        };

        let body = view! {
            <div class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">{heading.clone()}</h1>
                    <p class="page-lead">"A selection of client work and side projects."</p>
                </header>
                <nav class="filters" aria-label="Project categories">
                    <ul>
                        <li><a href="/projects" class=all_class>"All"</a></li>
                        {filters}
                    </ul>
                </nav>
                <CardGrid>{cards}</CardGrid>
            </div>
        }
        .to_html();

        let description = match &label {
            Some(label) => format!("{label} projects by {}.", site.owner.name),
            None => format!("Portfolio of {}, {}.", site.owner.name, site.owner.job_title),
        };
        let meta = PageMeta::new(heading.clone(), description.clone(), path.clone());
        let schemas = vec![
            schema::collection_page(site, &heading, &description, &path),
            schema::item_list(site, &shown),
        ];
        Some(self.page(&meta, schemas, &trail, body))
    }

    /// `/projects/{slug}`
    pub fn project(&self, project: &Project) -> String {
        let site = self.site();
        let trail = vec![
            home_crumb(),
            projects_crumb(),
            Breadcrumb::new(project.title.clone(), project.path()),
        ];

        let body_html = match (&project.body_html, &project.body) {
            (Some(html), _) => self.content().process(None, html).html,
            (None, Some(markdown)) => self.content().inject_heading_ids(&markdown_to_html(markdown)),
            (None, None) => String::new(),
        };
        let write_up = (!body_html.is_empty())
            .then(|| view! { <div class="prose" inner_html=body_html></div> });

        let image = project.image.clone().map(|src| {
            let style = format!("background-image:url('{BLUR_PLACEHOLDER}');background-size:cover");
            let alt = format!("Screenshot of {}", project.title);
            view! {
                <div class="project-media" style=style>
                    <img src=src alt=alt width="1200" height="750"/>
                </div>
            }
        });
        let live = project
            .url
            .clone()
            .map(|url| view! { <a href=url class="button button-primary" rel="noopener">"Visit site"</a> });
        let repository = project
            .repository
            .clone()
            .map(|url| view! { <a href=url class="button" rel="noopener">"Source code"</a> });
        let year = project.year.map(|y| view! { <span class="project-year">{y.to_string()}</span> });
        let tags = project
            .tags
            .iter()
            .map(|t| view! { <li class="tag">{t.clone()}</li> })
            .collect_view();
        let category_href = category_path(&project.category_slug());

        let body = view! {
            <article class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <p class="project-eyebrow">
                        <a href=category_href>{project.category.clone()}</a>
                        {year}
                    </p>
                    <h1 class="page-title">{project.title.clone()}</h1>
                    <p class="page-lead">{project.summary.clone()}</p>
                    <ul class="tag-list">{tags}</ul>
                </header>
                {image}
                {write_up}
                <div class="project-links">
                    {live}
                    {repository}
                </div>
            </article>
        }
        .to_html();

        let mut meta = PageMeta::new(project.title.clone(), project.summary.clone(), project.path());
        if let Some(image) = &project.image {
            meta = meta.with_image(image.clone(), Some(project.title.clone()));
        }
        let schemas = vec![schema::creative_work(site, project)];
        self.page(&meta, schemas, &trail, body)
    }
}

#[cfg(test)]
mod tests {
    use crate::SiteRenderer;
    use crate::test_support::site;
    use std::sync::Arc;

    #[test]
    fn test_projects_index() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        let projects = renderer.site().projects.clone();
        let html = renderer.projects(&projects, None).unwrap();
        assert!(html.contains("href=\"/projects/bakery-shop\""));
        assert!(html.contains("href=\"/projects/tide-charts\""));
        assert!(html.contains("href=\"/projects/category/web-apps\""));
        assert!(html.contains("\"@type\":\"ItemList\""));
    }

    #[test]
    fn test_projects_category_filter() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        let projects = renderer.site().projects.clone();
        let html = renderer.projects(&projects, Some("e-commerce")).unwrap();
        assert!(html.contains("E-commerce projects"));
        assert!(html.contains("href=\"/projects/bakery-shop\""));
        assert!(!html.contains("href=\"/projects/tide-charts\""));
    }

    #[test]
    fn test_unknown_category_is_none() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        let projects = renderer.site().projects.clone();
        assert!(renderer.projects(&projects, Some("nope")).is_none());
    }

    #[test]
    fn test_project_detail() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        let project = renderer.site().projects[0].clone();
        let html = renderer.project(&project);
        assert!(html.contains("<title>Bakery Shop | Sam Rivera Studio</title>"));
        assert!(html.contains("<strong>six weeks</strong>"));
        assert!(html.contains("data:image/svg+xml;base64"));
        assert!(html.contains("\"@type\":\"CreativeWork\""));
        assert!(html.contains("og:image\" content=\"https://example.dev/images/projects/bakery.jpg\""));
    }

    #[test]
    fn test_cms_project_body_is_sanitized() {
        let renderer = SiteRenderer::new(Arc::new(site())).unwrap();
        let mut project = renderer.site().projects[1].clone();
        project.body_html = Some("<p onclick=\"x()\">Details</p><script>bad()</script>".to_string());
        let html = renderer.project(&project);
        assert!(html.contains("Details"));
        assert!(!html.contains("bad()"));
    }
}
