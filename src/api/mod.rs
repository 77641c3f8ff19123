// src/api/mod.rs
//! Notion API interaction: the blog's view of a Notion workspace.
//!
//! Rendering code depends on [`BlogRepository`], never on HTTP details.

pub mod client;
pub mod memory;
pub mod notion_client_adapter;
pub mod parser;
mod responses;
mod simple_pagination;
mod types;

use crate::error::AppError;
use crate::model::{Block, BlogIndex, UserDirectory};
use crate::types::{PageId, UserId};
use std::collections::BTreeSet;

/// Where blog content comes from.
#[async_trait::async_trait]
pub trait BlogRepository: Send + Sync {
    /// Every row of the blog index in table order, previews attached.
    async fn fetch_blog_index(&self) -> Result<BlogIndex, AppError>;

    /// Looks up a batch of users in one logical call.
    ///
    /// Ids the workspace doesn't know are simply absent from the result.
    async fn resolve_users(&self, ids: &BTreeSet<UserId>) -> Result<UserDirectory, AppError>;

    /// The full block tree of a post page.
    async fn retrieve_post_blocks(&self, page: &PageId) -> Result<Vec<Block>, AppError>;
}

pub use client::{ApiResponse, NotionHttpClient};
pub use memory::StaticBlogRepository;
pub use types::{PaginatedResponse, PaginationResult};
