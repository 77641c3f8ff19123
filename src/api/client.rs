// src/api/client.rs
//! HTTP client for the Notion REST API and the blog repository built on it.
//!
//! Requests are issued one after another; a failed request fails the whole
//! operation that issued it.

use super::simple_pagination::fetch_all_pages_simple;
use super::types::PaginatedResponse;
use super::{parser, BlogRepository};
use crate::blog::preview::extract_preview;
use crate::constants::{NOTION_API_BASE_URL, NOTION_VERSION, PREVIEW_BLOCK_SCAN_LIMIT};
use crate::error::AppError;
use crate::model::{Block, BlogIndex, PostRecord, UserDirectory};
use crate::types::{ApiKey, DatabaseId, PageId, UserId};
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
    database_id: DatabaseId,
}

impl NotionHttpClient {
    /// Creates a client that reads the blog index from `database_id`.
    pub fn new(api_key: &ApiKey, database_id: DatabaseId) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self {
            client,
            base_url: NOTION_API_BASE_URL.to_string(),
            database_id,
        })
    }

    /// Points the client at another API root, e.g. a local stub server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to the specified endpoint.
    pub async fn get(&self, endpoint: &str) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        log::debug!("GET {} -> {}", endpoint, response.status());
        Ok(response)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        log::debug!("POST {} -> {}", endpoint, response.status());
        Ok(response)
    }

    /// Queries every row of the blog index, in table order.
    async fn query_index_rows(&self) -> Result<Vec<PostRecord>, AppError> {
        let endpoint = format!("databases/{}/query", self.database_id.to_dashed());
        let result = fetch_all_pages_simple(
            |page_size, cursor| {
                let endpoint = endpoint.clone();
                async move {
                    let mut query = serde_json::json!({ "page_size": page_size });
                    if let Some(cursor) = cursor {
                        query["start_cursor"] = serde_json::json!(cursor);
                    }
                    let response = self.post(&endpoint, &query).await?;
                    let result = extract_response_text(response).await?;
                    parser::parse_pages_pagination(result)
                }
            },
            None,
        )
        .await?;

        let mut records = Vec::with_capacity(result.total_fetched);
        for row in result.items {
            let row_id = row.id.clone();
            match super::responses::ToDomain::to_domain(row) {
                Ok(record) => records.push(record),
                Err(AppError::ValidationError(e)) => {
                    log::warn!("Skipping blog index row {}: {}", row_id, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    /// One page of a block's children.
    async fn children_page(
        &self,
        parent: &str,
        page_size: u32,
        cursor: Option<String>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!(
            "blocks/{}/children?{}",
            parent,
            list_query(page_size, cursor.as_deref())
        );
        let response = self.get(&endpoint).await?;
        let result = extract_response_text(response).await?;
        parser::parse_blocks_pagination(result)
    }

    /// The first blocks of a post page, enough to cut its preview from.
    async fn preview_blocks(&self, page: &PageId) -> Result<Vec<Block>, AppError> {
        let response = self
            .children_page(&page.to_dashed(), PREVIEW_BLOCK_SCAN_LIMIT as u32, None)
            .await?;
        Ok(response.results)
    }

    /// Every child of `parent`, with nested children filled in.
    fn block_tree<'a>(
        &'a self,
        parent: String,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Block>, AppError>> + Send + 'a>> {
        Box::pin(async move {
            let result = fetch_all_pages_simple(
                |page_size, cursor| self.children_page(&parent, page_size, cursor),
                None,
            )
            .await?;

            let mut blocks = result.items;
            for block in blocks.iter_mut() {
                if block.common().has_children {
                    let children = self.block_tree(block.id().to_dashed()).await?;
                    block.set_children(children);
                }
            }
            Ok(blocks)
        })
    }
}

fn list_query(page_size: u32, cursor: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("page_size", &page_size.to_string());
    if let Some(cursor) = cursor {
        query.append_pair("start_cursor", cursor);
    }
    query.finish()
}

#[async_trait::async_trait]
impl BlogRepository for NotionHttpClient {
    async fn fetch_blog_index(&self) -> Result<BlogIndex, AppError> {
        let records = self.query_index_rows().await?;
        log::info!("Fetched {} rows from the blog index", records.len());

        let mut index = BlogIndex::with_capacity(records.len());
        for record in records {
            let preview = extract_preview(&self.preview_blocks(&record.id).await?);
            let record = record.with_preview(preview);
            if let Some(previous) = index.insert(record.slug.clone(), record) {
                log::warn!(
                    "Slug '{}' appears more than once in the blog index; keeping the later row",
                    previous.slug
                );
            }
        }
        Ok(index)
    }

    async fn resolve_users(&self, ids: &BTreeSet<UserId>) -> Result<UserDirectory, AppError> {
        let result = fetch_all_pages_simple(
            |page_size, cursor| async move {
                let endpoint = format!("users?{}", list_query(page_size, cursor.as_deref()));
                let response = self.get(&endpoint).await?;
                let result = extract_response_text(response).await?;
                parser::parse_users_pagination(result)
            },
            None,
        )
        .await?;

        let directory: UserDirectory = result
            .items
            .into_iter()
            .filter(|user| ids.contains(&user.id))
            .collect();
        log::debug!(
            "Resolved {} of {} requested users",
            directory.len(),
            ids.len()
        );
        Ok(directory)
    }

    async fn retrieve_post_blocks(&self, page: &PageId) -> Result<Vec<Block>, AppError> {
        self.block_tree(page.to_dashed()).await
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text along with its status and URL.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
