//! Drops drafts outside preview mode and normalizes author lists.

use crate::model::{BlogIndex, Post};
use crate::types::UserId;

/// Posts visible for this render, in table order.
///
/// Outside preview mode unpublished records are removed; in preview mode
/// every record is kept. Each surviving post gets a non-null author list.
pub fn filter_posts(index: BlogIndex, preview: bool) -> Vec<Post<UserId>> {
    let total = index.len();
    let posts: Vec<_> = index
        .into_values()
        .filter(|record| preview || record.published)
        .map(Post::from_record)
        .collect();

    log::debug!(
        "{} of {} posts visible (preview: {})",
        posts.len(),
        total,
        preview
    );
    posts
}
