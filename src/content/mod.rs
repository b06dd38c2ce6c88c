//! Content module - post records, front-matter, loading and markdown rendering

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use markdown::{component, MarkdownRenderer, NodeKind, NodeProps};
pub use post::{PostRecord, POST_DIR};
