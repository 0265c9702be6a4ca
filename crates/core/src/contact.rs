//! Contact form submissions.

use serde::{Deserialize, Serialize};

use crate::text::is_valid_email;

const MAX_NAME_CHARS: usize = 100;
const MIN_MESSAGE_CHARS: usize = 10;
const MAX_MESSAGE_CHARS: usize = 5000;
const MAX_SHORT_FIELD_CHARS: usize = 200;

/// Raw form fields as posted by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub message: String,
    /// Honeypot: hidden from humans, bots fill it in
    #[serde(default)]
    pub website: String,
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub budget: Option<String>,
    pub message: Option<String>,
}

impl ContactErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.company.is_none()
            && self.budget.is_none()
            && self.message.is_none()
    }
}

/// A submission that passed validation, trimmed and ready to relay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    pub fn is_spam(&self) -> bool {
        !self.website.trim().is_empty()
    }

    pub fn validate(&self) -> Result<ContactMessage, ContactErrors> {
        let mut errors = ContactErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.name = Some("Please tell me your name.".to_string());
        } else if name.chars().count() > MAX_NAME_CHARS {
            errors.name = Some(format!(
                "Name must be at most {} characters.",
                MAX_NAME_CHARS
            ));
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.email = Some("Please enter your email address.".to_string());
        } else if !is_valid_email(email) {
            errors.email = Some("That email address doesn't look right.".to_string());
        }

        let company = self.company.trim();
        if company.chars().count() > MAX_SHORT_FIELD_CHARS {
            errors.company = Some(format!(
                "Company must be at most {} characters.",
                MAX_SHORT_FIELD_CHARS
            ));
        }

        let budget = self.budget.trim();
        if budget.chars().count() > MAX_SHORT_FIELD_CHARS {
            errors.budget = Some(format!(
                "Budget must be at most {} characters.",
                MAX_SHORT_FIELD_CHARS
            ));
        }

        let message = self.message.trim();
        let message_len = message.chars().count();
        if message_len < MIN_MESSAGE_CHARS {
            errors.message = Some(format!(
                "Please write at least {} characters about your project.",
                MIN_MESSAGE_CHARS
            ));
        } else if message_len > MAX_MESSAGE_CHARS {
            errors.message = Some(format!(
                "Message must be at most {} characters.",
                MAX_MESSAGE_CHARS
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Ok(ContactMessage {
            name: name.to_string(),
            email: email.to_string(),
            company: optional(company),
            budget: optional(budget),
            message: message.to_string(),
        })
    }
}
