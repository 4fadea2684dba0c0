//! Content loading and rendering

pub mod document;
pub mod frontmatter;
pub mod index;
pub mod loader;
pub mod markdown;

pub use document::Document;
pub use frontmatter::FrontMatter;
pub use index::DocumentIndex;
pub use loader::DocumentLoader;
pub use markdown::MarkdownRenderer;
