// src/api/memory.rs
//! An in-memory blog repository, for tests and local demos.

use super::BlogRepository;
use crate::error::AppError;
use crate::model::{Block, BlogIndex, PostRecord, UserDirectory, UserRecord};
use crate::types::{PageId, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Serves a fixed blog index, user list and post bodies.
///
/// Every `resolve_users` call is recorded so callers can check how the
/// author lookup was batched, and index fetches are counted.
#[derive(Debug, Default)]
pub struct StaticBlogRepository {
    index: BlogIndex,
    users: Vec<UserRecord>,
    bodies: HashMap<PageId, Vec<Block>>,
    user_requests: Mutex<Vec<BTreeSet<UserId>>>,
    index_fetches: AtomicUsize,
}

impl StaticBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to the index, after every row added so far.
    pub fn with_post(mut self, record: PostRecord) -> Self {
        self.index.insert(record.slug.clone(), record);
        self
    }

    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_body(mut self, page: PageId, blocks: Vec<Block>) -> Self {
        self.bodies.insert(page, blocks);
        self
    }

    /// How many times `fetch_blog_index` was called.
    pub fn index_fetches(&self) -> usize {
        self.index_fetches.load(Ordering::SeqCst)
    }

    /// The id sets passed to `resolve_users`, oldest first.
    pub fn user_requests(&self) -> Vec<BTreeSet<UserId>> {
        self.user_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl BlogRepository for StaticBlogRepository {
    async fn fetch_blog_index(&self) -> Result<BlogIndex, AppError> {
        self.index_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.index.clone())
    }

    async fn resolve_users(&self, ids: &BTreeSet<UserId>) -> Result<UserDirectory, AppError> {
        if let Ok(mut requests) = self.user_requests.lock() {
            requests.push(ids.clone());
        }
        Ok(self
            .users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn retrieve_post_blocks(&self, page: &PageId) -> Result<Vec<Block>, AppError> {
        Ok(self.bodies.get(page).cloned().unwrap_or_default())
    }
}
