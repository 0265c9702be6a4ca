use leptos::prelude::*;
use leptos::tachys::view::RenderHtml;

use crate::SiteRenderer;
use crate::components::{Breadcrumbs, ContactForm, ContactFormState};
use crate::markdown::markdown_to_html;
use crate::schema;
use crate::seo::{Breadcrumb, PageMeta};

use super::home_crumb;

impl SiteRenderer {
    /// `/contact` with the form in the given state
    pub fn contact(&self, state: &ContactFormState) -> String {
        let form = view! { <ContactForm action={self.contact_action.clone()} state={state.clone()}/> };
        self.contact_page(form.to_html(), false)
    }

    /// `/contact` after a successful submission
    pub fn contact_success(&self) -> String {
        let notice = view! {
            <div class="form-success" role="status">
                <h2>"Thanks, your message is on its way."</h2>
                <p>"I usually reply within one business day."</p>
                <a href="/" class="section-link">"← Back to the home page"</a>
            </div>
        };
        self.contact_page(notice.to_html(), true)
    }

    fn contact_page(&self, content: String, submitted: bool) -> String {
        let site = self.site();
        let contact = &site.contact;
        let trail = vec![home_crumb(), Breadcrumb::new("Contact", "/contact")];

        let intro_html = contact.intro.as_deref().map(markdown_to_html).unwrap_or_default();
        let intro = (!intro_html.is_empty() && !submitted)
            .then(|| view! { <div class="page-lead" inner_html=intro_html></div> });
        let mailto = format!("mailto:{}", site.owner.email);

        let body = view! {
            <div class="container page">
                <Breadcrumbs trail={trail.clone()}/>
                <header class="page-header">
                    <h1 class="page-title">{contact.headline.clone()}</h1>
                    {intro}
                </header>
                <div class="contact-layout">
                    <div inner_html=content></div>
                    <aside class="contact-aside">
                        <p>"Prefer email?"</p>
                        <a href=mailto>{site.owner.email.clone()}</a>
                    </aside>
                </div>
            </div>
        }
        .to_html();

        let mut meta = PageMeta::new(
            contact.headline.clone(),
            format!("Get in touch with {} about your next project.", site.owner.name),
            "/contact",
        );
        if submitted {
            meta = meta.noindex();
        }
        let schemas = vec![schema::contact_page(site)];
        self.page(&meta, schemas, &trail, body)
    }
}
