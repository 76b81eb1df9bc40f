//! Content module - layouts, pages, posts and how they are converted

mod converter;
mod convertible;
mod frontmatter;
mod layout;
mod markdown;
mod page;
mod post;

pub use converter::{Converter, ConverterRegistry, IdentityConverter, MARKDOWN_EXTENSIONS};
pub use convertible::{Convertible, Renderer};
pub use frontmatter::{FrontMatter, FrontMatterError, DELIMITER};
pub use layout::Layout;
pub use markdown::MarkdownRenderer;
pub use page::Page;
pub use post::Post;
