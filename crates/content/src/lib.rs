// Blog content pipeline: WordPress block markup to article HTML, heading
// anchors, table of contents and reading time.

pub mod blocks;
pub mod error;
pub mod headings;
pub mod pipeline;
pub mod reading_time;
pub mod render;
pub mod sanitize;
pub mod style;

pub use error::{ContentError, Result};
pub use headings::{TocEntry, heading_slug};
pub use pipeline::{ContentProcessor, ProcessedContent, RenderPath};
pub use reading_time::{reading_time_minutes, word_count};
pub use style::class_names;
