use thiserror::Error;

/// WordPress API client errors
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Failed to decode {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl CmsError {
    /// WordPress error code, e.g. "rest_post_invalid_page_number"
    pub fn code(&self) -> Option<&str> {
        match self {
            CmsError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CmsError::Api { status, .. } => Some(*status),
            CmsError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CmsError>;
