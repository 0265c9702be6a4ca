use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid attributes on block '{name}': {source}")]
    InvalidAttributes {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Closing '{found}' has no matching opener")]
    UnexpectedCloser { found: String },

    #[error("Closing '{found}' does not match open block '{expected}'")]
    MismatchedCloser { expected: String, found: String },

    #[error("Block '{name}' is never closed")]
    UnclosedBlock { name: String },

    #[error("Blocks nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;
