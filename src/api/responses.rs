// src/api/responses.rs
//! Wire types for Notion API responses, borrowed from notion-client.

use super::types::PaginatedResponse;
use crate::error::AppError;

pub use notion_client::objects::{
    block::Block as NotionBlock, error::Error as NotionError, page::Page as NotionPage,
    user::User as NotionUser,
};

/// Database query response using notion-client types
pub type QueryDatabaseResponse = PaginatedResponse<NotionPage>;

/// Block children response using notion-client types
pub type RetrieveBlockChildrenResponse = PaginatedResponse<NotionBlock>;

/// User listing response using notion-client types
pub type ListUsersResponse = PaginatedResponse<NotionUser>;

/// Trait for converting notion-client types to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

impl ToDomain<crate::model::PostRecord> for NotionPage {
    fn to_domain(self) -> Result<crate::model::PostRecord, AppError> {
        super::notion_client_adapter::convert_post_record(self)
    }
}

impl ToDomain<crate::model::Block> for NotionBlock {
    fn to_domain(self) -> Result<crate::model::Block, AppError> {
        super::notion_client_adapter::convert_block(self)
    }
}

impl ToDomain<crate::model::UserRecord> for NotionUser {
    fn to_domain(self) -> Result<crate::model::UserRecord, AppError> {
        super::notion_client_adapter::convert_user(self)
    }
}
