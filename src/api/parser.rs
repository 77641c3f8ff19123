// src/api/parser.rs
//! Parsing of Notion API responses with notion-client's serde types.

use super::client::ApiResponse;
use super::notion_client_adapter::convert_rich_text_array;
use super::responses::{
    ListUsersResponse, NotionError, QueryDatabaseResponse, RetrieveBlockChildrenResponse,
    ToDomain,
};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionClientError, NotionErrorCode};
use crate::model::{Block, UserRecord};
use crate::types::{BlockId, RichTextItem};
use notion_client::objects::rich_text::RichText;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;

/// Parse any Notion API response using notion-client types
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success(&result.data, &result.url)
    } else {
        parse_error(&result.data, result.status, &result.url)
    }
}

fn parse_success<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        NotionClientError::Deserialization {
            source: e,
            body: body_preview(body),
        }
        .into()
    })
}

fn parse_error<T>(body: &str, status: StatusCode, url: &str) -> Result<T, AppError> {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        log::warn!(
            "Notion API error from {}: {} ({})",
            url,
            notion_error.code,
            notion_error.message
        );
        return Err(AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
        });
    }

    Err(AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}: {}", status, url, body_preview(body)),
        status,
    })
}

fn body_preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let cut: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

/// Parses one page of a database query, leaving rows in wire form so the
/// caller can decide what to do with rows that don't convert.
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<QueryDatabaseResponse, AppError> {
    parse_api_response(result)
}

/// Only the parts of a block listing notion-client's types leave out.
#[derive(Deserialize)]
struct RawBlockChildren {
    results: Vec<RawBlock>,
}

#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(default)]
    image: Option<RawImage>,
}

#[derive(Deserialize)]
struct RawImage {
    #[serde(default)]
    caption: Vec<RichText>,
}

fn image_captions(
    body: &str,
    url: &str,
) -> Result<HashMap<BlockId, Vec<RichTextItem>>, AppError> {
    let raw: RawBlockChildren = parse_success(body, url)?;
    let mut captions = HashMap::new();
    for block in raw.results {
        let Some(image) = block.image else { continue };
        if image.caption.is_empty() {
            continue;
        }
        captions.insert(BlockId::parse(&block.id)?, convert_rich_text_array(image.caption)?);
    }
    Ok(captions)
}

pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    let mut captions = if result.status.is_success() {
        image_captions(&result.data, &result.url)?
    } else {
        HashMap::new()
    };

    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    let mut page = response.try_map(ToDomain::to_domain)?;
    for block in &mut page.results {
        if let Block::Image(image) = block {
            if let Some(caption) = captions.remove(&image.common.id) {
                image.caption = caption;
            }
        }
    }
    Ok(page)
}

pub fn parse_users_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<UserRecord>, AppError> {
    let response: ListUsersResponse = parse_api_response(result)?;
    response.try_map(ToDomain::to_domain)
}
