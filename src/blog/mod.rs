//! The per-render content pipeline: fetch, filter, resolve authors.

pub mod authors;
pub mod filter;
pub mod preview;
pub mod props;

pub use authors::resolve_authors;
pub use filter::filter_posts;
pub use preview::extract_preview;
pub use props::{get_post_props, get_static_props, IndexProps, PostProps, StaticProps};
