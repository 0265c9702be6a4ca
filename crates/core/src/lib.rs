pub mod cms;
pub mod config;
pub mod contact;
pub mod error;
pub mod text;
pub mod types;

pub use config::parse_site_toml;
pub use error::{Error, Result};
pub use types::*;
