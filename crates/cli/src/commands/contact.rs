//! Contact form relay.
//!
//! Valid submissions are forwarded as JSON to the external handler named by
//! `contact.endpoint`. The server never sends email itself.

use std::time::Duration;

use axum::Form;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use folio_core::contact::{ContactErrors, ContactMessage, ContactSubmission};
use folio_generator::ContactFormState;
use tracing::{error, info, warn};

use super::response::{Freshness, html};
use super::serve::AppState;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

pub const NOT_CONFIGURED_NOTICE: &str =
    "The contact form is not configured yet. Please reach out by email instead.";
pub const RELAY_FAILED_NOTICE: &str =
    "Your message could not be sent right now. Please try again in a few minutes.";

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("no contact endpoint configured")]
    NotConfigured,

    #[error("relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("contact endpoint answered {0}")]
    Rejected(u16),
}

#[derive(Clone)]
pub struct ContactRelay {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl ContactRelay {
    pub fn new(endpoint: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(RELAY_TIMEOUT)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// POST the message to the configured endpoint. Any 2xx counts as delivered.
    pub async fn relay(&self, message: &ContactMessage) -> Result<(), RelayError> {
        let endpoint = self.endpoint.as_deref().ok_or(RelayError::NotConfigured)?;

        let response = self.client.post(endpoint).json(message).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}

/// `POST /contact`
pub(super) async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(submission): Form<ContactSubmission>,
) -> Response {
    let data = state.data();
    let renderer = data.renderer();

    if submission.is_spam() {
        info!("Dropped contact submission that filled the honeypot");
        return html(&headers, StatusCode::OK, renderer.contact_success(), Freshness::NoStore);
    }

    let message = match submission.validate() {
        Ok(message) => message,
        Err(errors) => {
            let form = ContactFormState {
                values: submission,
                errors,
                notice: None,
            };
            return html(
                &headers,
                StatusCode::UNPROCESSABLE_ENTITY,
                renderer.contact(&form),
                Freshness::NoStore,
            );
        }
    };

    let (status, notice) = match state.relay().relay(&message).await {
        Ok(()) => {
            info!("Relayed contact submission");
            return html(&headers, StatusCode::OK, renderer.contact_success(), Freshness::NoStore);
        }
        Err(RelayError::NotConfigured) => {
            warn!("Contact submission received but no contact endpoint is configured");
            (StatusCode::SERVICE_UNAVAILABLE, NOT_CONFIGURED_NOTICE)
        }
        Err(e) => {
            error!(error = %e, "Failed to relay contact submission");
            (StatusCode::BAD_GATEWAY, RELAY_FAILED_NOTICE)
        }
    };

    let form = ContactFormState {
        values: submission,
        errors: ContactErrors::default(),
        notice: Some(notice.to_string()),
    };
    html(&headers, status, renderer.contact(&form), Freshness::NoStore)
}
