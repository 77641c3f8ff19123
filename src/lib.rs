// src/lib.rs
//! notion-blog library: serves a Notion database of posts as a blog.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `BlogConfig`
//! - **Domain model**: `PostRecord`, `Post`, `Block`, `UserDirectory`
//! - **Content source**: `BlogRepository`, `NotionHttpClient`, `StaticBlogRepository`
//! - **Rendering**: `InlineFragments`, `render_blocks_html`, `Pages`
//! - **Serving**: `router`, `serve`, `export_site`

pub mod api;
pub mod blog;
mod config;
pub mod constants;
mod error;
mod export;
pub mod formatting;
pub mod model;
pub mod pages;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionClientError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{BlogConfig, Command, CommandLineInput};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, BlockVisitor, BlogIndex, Post, PostRecord, UserDirectory, UserRecord,
};

// --- Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, Color, DatabaseId, PageId, PreviewSecret, RenderedPage,
    RichTextItem, Slug, UserId, ValidatedUrl,
};

// --- Content Source ---
pub use crate::api::{BlogRepository, NotionHttpClient, StaticBlogRepository};

// --- Blog Pipeline ---
pub use crate::blog::{
    extract_preview, filter_posts, get_post_props, get_static_props, resolve_authors, IndexProps,
    PostProps, StaticProps,
};

// --- Rendering ---
pub use crate::formatting::{
    render_blocks_html, render_text_block_html, text_block, InlineFragment, InlineFragments,
    TextStyle,
};
pub use crate::pages::Pages;

// --- Serving ---
pub use crate::export::{export_site, ExportReport};
pub use crate::server::{router, serve, AppState, PreviewMode};
