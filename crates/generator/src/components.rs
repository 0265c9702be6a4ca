// Leptos SSR components shared by the pages

use folio_content::TocEntry;
use folio_core::cms::Post;
use folio_core::contact::{ContactErrors, ContactSubmission};
use folio_core::{HomeContent, NavItem, Owner, Project, Service};
use leptos::prelude::*;

use crate::seo::Breadcrumb;

/// Tiny blurred SVG shown behind project images until they load
pub const BLUR_PLACEHOLDER: &str = "data:image/svg+xml;base64,PHN2ZyB4bWxucz0iaHR0cDovL3d3dy53My5vcmcvMjAwMC9zdmciIHZpZXdCb3g9IjAgMCA4IDUiPjxmaWx0ZXIgaWQ9ImIiPjxmZUdhdXNzaWFuQmx1ciBzdGREZXZpYXRpb249IjEiLz48L2ZpbHRlcj48cmVjdCB3aWR0aD0iOCIgaGVpZ2h0PSI1IiBmaWxsPSIjY2JkNWUxIiBmaWx0ZXI9InVybCgjYikiLz48L3N2Zz4=";

const DISPLAY_DATE: &str = "%B %-d, %Y";
const MACHINE_DATE: &str = "%Y-%m-%d";

/// "/blog/hello" is inside the "/blog" nav entry; "/" only matches itself
fn is_active(href: &str, current: &str) -> bool {
    if href == "/" {
        current == "/"
    } else {
        current == href || current.starts_with(&format!("{}/", href.trim_end_matches('/')))
    }
}

/// Link to page `page` of a listing rooted at `base`
pub fn page_href(base: &str, page: u32) -> String {
    if page <= 1 {
        base.to_string()
    } else {
        format!("{}/page/{}", base.trim_end_matches('/'), page)
    }
}

#[component]
pub fn SiteHeader(site_name: String, nav: Vec<NavItem>, current: String) -> impl IntoView {
    let links = nav
        .into_iter()
        .map(|item| {
            let active = is_active(&item.href, &current);
            let class = if active { "nav-link active" } else { "nav-link" };
            let aria_current = active.then_some("page");
            view! {
                <li>
                    <a href=item.href class=class aria-current=aria_current>
                        {item.label}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <header class="site-header">
            <div class="container header-inner">
                <a href="/" class="brand">{site_name}</a>
                <nav aria-label="Main">
                    <ul class="nav-list">{links}</ul>
                </nav>
            </div>
        </header>
    }
}

#[component]
pub fn SiteFooter(site_name: String, owner: Owner, nav: Vec<NavItem>, year: i32) -> impl IntoView {
    let links = nav
        .into_iter()
        .map(|item| view! { <li><a href=item.href>{item.label}</a></li> })
        .collect_view();
    let profiles = owner
        .same_as
        .into_iter()
        .map(|url| {
            let label = profile_label(&url);
            view! { <li><a href=url rel="me noopener">{label}</a></li> }
        })
        .collect_view();
    let mailto = format!("mailto:{}", owner.email);

    view! {
        <footer class="site-footer">
            <div class="container footer-grid">
                <div>
                    <p class="footer-brand">{site_name.clone()}</p>
                    <p>{owner.job_title}</p>
                    <p><a href=mailto>{owner.email}</a></p>
                </div>
                <nav aria-label="Footer">
                    <ul class="footer-links">{links}</ul>
                </nav>
                <ul class="footer-profiles">{profiles}</ul>
            </div>
            <p class="container copyright">{format!("© {} {}", year, site_name)}</p>
        </footer>
    }
}

/// "https://github.com/sam" -> "GitHub"
fn profile_label(url: &str) -> String {
    let host = url
        .split("://")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or_default()
        .trim_start_matches("www.");

    match host {
        "github.com" => "GitHub".to_string(),
        "linkedin.com" => "LinkedIn".to_string(),
        "x.com" | "twitter.com" => "X".to_string(),
        "dribbble.com" => "Dribbble".to_string(),
        "" => url.to_string(),
        other => other.to_string(),
    }
}

/// Home page hero. `intro_html` is rendered markdown, empty for none.
#[component]
pub fn Hero(home: HomeContent, intro_html: String) -> impl IntoView {
    let intro = (!intro_html.is_empty())
        .then(|| view! { <div class="hero-intro" inner_html=intro_html></div> });

    view! {
        <section class="hero">
            <div class="container">
                <h1 class="hero-headline">{home.headline}</h1>
                <p class="hero-tagline">{home.tagline}</p>
                {intro}
                <a href=home.cta_href class="button button-primary">{home.cta_label}</a>
            </div>
        </section>
    }
}

/// Titled page section
#[component]
pub fn Section(id: String, title: String, children: Children) -> impl IntoView {
    let heading_id = format!("{id}-title");
    let labelled_by = heading_id.clone();
    view! {
        <section id=id class="section" aria-labelledby=labelled_by>
            <div class="container">
                <h2 id=heading_id class="section-title">{title}</h2>
                {children()}
            </div>
        </section>
    }
}

#[component]
pub fn CardGrid(children: Children) -> impl IntoView {
    view! { <div class="card-grid">{children()}</div> }
}

#[component]
pub fn ServiceCard(service: Service) -> impl IntoView {
    let href = service.path();
    let title_href = href.clone();
    let price = service
        .price_from
        .map(|price| view! { <p class="card-price">{format!("From {price}")}</p> });

    view! {
        <article class="card service-card">
            <h3 class="card-title"><a href=title_href>{service.title}</a></h3>
            <p class="card-summary">{service.summary}</p>
            {price}
            <a href=href class="card-link">"Learn more"</a>
        </article>
    }
}

#[component]
pub fn ProjectCard(project: Project) -> impl IntoView {
    let href = project.path();
    let image = project.image.clone().map(|src| {
        let style = format!("background-image:url('{BLUR_PLACEHOLDER}');background-size:cover");
        let alt = format!("Screenshot of {}", project.title);
        view! {
            <div class="card-media" style=style>
                <img src=src alt=alt loading="lazy" decoding="async" width="1200" height="750"/>
            </div>
        }
    });
    let tags = project
        .tags
        .iter()
        .map(|tag| view! { <li class="tag">{tag.clone()}</li> })
        .collect_view();
    let year = project.year.map(|y| view! { <span class="card-year">{y.to_string()}</span> });
    let category_href = format!("/projects/category/{}", project.category_slug());

    view! {
        <article class="card project-card">
            {image}
            <div class="card-body">
                <p class="card-eyebrow">
                    <a href=category_href>
                        {project.category.clone()}
                    </a>
                    {year}
                </p>
                <h3 class="card-title"><a href=href>{project.title.clone()}</a></h3>
                <p class="card-summary">{project.summary.clone()}</p>
                <ul class="tag-list">{tags}</ul>
            </div>
        </article>
    }
}

#[component]
pub fn PostCard(post: Post) -> impl IntoView {
    let href = post.path();
    let title = post.title_text();
    let excerpt = post.excerpt_text();
    let published = post.date.format(DISPLAY_DATE).to_string();
    let machine = post.date.format(MACHINE_DATE).to_string();
    let category = post.category_terms().first().map(|term| {
        let href = format!("/blog/category/{}", term.slug);
        view! { <a href=href class="card-eyebrow">{term.label()}</a> }
    });
    let image = post.featured_image().map(|media| {
        let alt = media.alt_or(&title).to_string();
        let src = media.source_url.clone();
        view! {
            <img class="card-image" src=src alt=alt loading="lazy" decoding="async"/>
        }
    });

    view! {
        <article class="card post-card">
            {image}
            <div class="card-body">
                {category}
                <h3 class="card-title"><a href=href>{title.clone()}</a></h3>
                <time datetime=machine class="card-date">{published}</time>
                <p class="card-summary">{excerpt}</p>
            </div>
        </article>
    }
}

#[component]
pub fn Pagination(base: String, page: u32, total_pages: u32) -> impl IntoView {
    let prev = (page > 1).then(|| {
        let href = page_href(&base, page - 1);
        view! { <a href=href rel="prev" class="pagination-link">"← Newer posts"</a> }
    });
    let next = (page < total_pages).then(|| {
        let href = page_href(&base, page + 1);
        view! { <a href=href rel="next" class="pagination-link">"Older posts →"</a> }
    });
    let status = format!("Page {page} of {}", total_pages.max(1));

    (total_pages > 1).then(|| {
        view! {
            <nav class="pagination" aria-label="Pagination">
                {prev}
                <span class="pagination-status">{status}</span>
                {next}
            </nav>
        }
    })
}

#[component]
pub fn Breadcrumbs(trail: Vec<Breadcrumb>) -> impl IntoView {
    let last = trail.len().saturating_sub(1);
    let items = trail
        .into_iter()
        .enumerate()
        .map(|(i, crumb)| {
            if i == last {
                view! { <li aria-current="page">{crumb.name}</li> }.into_any()
            } else {
                view! { <li><a href=crumb.path>{crumb.name}</a></li> }.into_any()
            }
        })
        .collect_view();

    view! {
        <nav class="breadcrumbs" aria-label="Breadcrumb">
            <ol>{items}</ol>
        </nav>
    }
}

/// Table of contents; renders nothing for fewer than two headings
#[component]
pub fn TocNav(entries: Vec<TocEntry>) -> impl IntoView {
    let show = entries.len() >= 2;
    let items = entries
        .into_iter()
        .map(|entry| {
            let class = format!("toc-item toc-level-{}", entry.level);
            let href = format!("#{}", entry.id);
            view! { <li class=class><a href=href>{entry.text}</a></li> }
        })
        .collect_view();

    show.then(|| {
        view! {
            <nav class="toc" aria-label="Table of contents">
                <p class="toc-title">"On this page"</p>
                <ol>{items}</ol>
            </nav>
        }
    })
}

/// Current state of the contact form: submitted values, field errors and an
/// optional form-level error
#[derive(Debug, Clone, Default)]
pub struct ContactFormState {
    pub values: ContactSubmission,
    pub errors: ContactErrors,
    pub notice: Option<String>,
}

fn field_error(message: Option<String>) -> impl IntoView {
    message.map(|m| view! { <span class="field-error" role="alert">{m}</span> })
}

#[component]
pub fn ContactForm(action: String, state: ContactFormState) -> impl IntoView {
    let ContactFormState {
        values,
        errors,
        notice,
    } = state;
    let notice = notice.map(|n| view! { <p class="form-notice" role="alert">{n}</p> });

    view! {
        <form class="contact-form" method="post" action=action>
            {notice}
            <label class="field">
                <span class="field-label">"Name"</span>
                <input type="text" name="name" value=values.name autocomplete="name" maxlength="100" required=true/>
                {field_error(errors.name)}
            </label>
            <label class="field">
                <span class="field-label">"Email"</span>
                <input type="email" name="email" value=values.email autocomplete="email" required=true/>
                {field_error(errors.email)}
            </label>
            <label class="field">
                <span class="field-label">"Company (optional)"</span>
                <input type="text" name="company" value=values.company autocomplete="organization" maxlength="200"/>
                {field_error(errors.company)}
            </label>
            <label class="field">
                <span class="field-label">"Budget (optional)"</span>
                <input type="text" name="budget" value=values.budget maxlength="200"/>
                {field_error(errors.budget)}
            </label>
            <label class="field">
                <span class="field-label">"Project details"</span>
                <textarea name="message" rows="6" minlength="10" maxlength="5000" required=true>
                    {values.message}
                </textarea>
                {field_error(errors.message)}
            </label>
            <div class="field-trap" aria-hidden="true">
                <label>
                    "Leave this field empty"
                    <input type="text" name="website" value=values.website tabindex="-1" autocomplete="off"/>
                </label>
            </div>
            <button type="submit" class="button button-primary">"Send message"</button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptos::tachys::view::RenderHtml;

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/blog"));
        assert!(is_active("/blog", "/blog/hello"));
        assert!(!is_active("/blog", "/blogroll"));
    }

    #[test]
    fn test_page_href() {
        assert_eq!(page_href("/blog", 1), "/blog");
        assert_eq!(page_href("/blog", 3), "/blog/page/3");
        assert_eq!(page_href("/blog/tag/rust/", 2), "/blog/tag/rust/page/2");
    }

    #[test]
    fn test_profile_label() {
        assert_eq!(profile_label("https://github.com/sam"), "GitHub");
        assert_eq!(profile_label("https://www.linkedin.com/in/sam"), "LinkedIn");
        assert_eq!(profile_label("https://mastodon.social/@sam"), "mastodon.social");
    }

    #[test]
    fn test_pagination_links() {
        let html = view! { <Pagination base={"/blog".to_string()} page=2 total_pages=3/> }.to_html();
        assert!(html.contains("href=\"/blog\""));
        assert!(html.contains("href=\"/blog/page/3\""));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn test_single_page_has_no_pagination() {
        let html = view! { <Pagination base={"/blog".to_string()} page=1 total_pages=1/> }.to_html();
        assert!(!html.contains("pagination"));
    }

    #[test]
    fn test_toc_nav_needs_two_entries() {
        let one = vec![TocEntry {
            level: 2,
            text: "Only".to_string(),
            id: "only".to_string(),
        }];
        let html = view! { <TocNav entries={one.clone()}/> }.to_html();
        assert!(!html.contains("toc"));

        let mut two = one;
        two.push(TocEntry {
            level: 3,
            text: "Nested".to_string(),
            id: "nested".to_string(),
        });
        let html = view! { <TocNav entries=two/> }.to_html();
        assert!(html.contains("href=\"#nested\""));
        assert!(html.contains("toc-level-3"));
    }

    #[test]
    fn test_contact_form_escapes_values() {
        let state = ContactFormState {
            values: ContactSubmission {
                name: "<b>Sam</b>".to_string(),
                ..ContactSubmission::default()
            },
            errors: ContactErrors {
                email: Some("Please enter a valid email address".to_string()),
                ..ContactErrors::default()
            },
            notice: None,
        };
        let html = view! { <ContactForm action={"/contact".to_string()} state=state/> }.to_html();
        assert!(!html.contains("<b>Sam</b>"));
        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains("name=\"website\""));
    }
}
