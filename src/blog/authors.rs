//! Replaces author ids with display names, one user lookup per render.

use crate::api::BlogRepository;
use crate::error::AppError;
use crate::model::{Post, UserDirectory};
use crate::types::UserId;
use std::collections::BTreeSet;

/// Distinct author ids across `posts`.
pub fn collect_author_ids(posts: &[Post<UserId>]) -> BTreeSet<UserId> {
    posts
        .iter()
        .flat_map(|post| post.authors.iter().cloned())
        .collect()
}

/// Resolves every post's authors to names, keeping list order.
///
/// All ids are looked up in a single `resolve_users` call, skipped when no
/// post has authors. An id missing from the result fails the render.
pub async fn resolve_authors(
    repository: &dyn BlogRepository,
    posts: Vec<Post<UserId>>,
) -> Result<Vec<Post<String>>, AppError> {
    let ids = collect_author_ids(&posts);
    let directory = if ids.is_empty() {
        UserDirectory::new()
    } else {
        log::debug!("Resolving {} distinct authors", ids.len());
        repository.resolve_users(&ids).await?
    };

    posts
        .into_iter()
        .map(|post| {
            post.try_map_authors(|slug, id| match directory.get(&id) {
                Some(user) => Ok(user.full_name.clone()),
                None => Err(AppError::UnknownAuthor {
                    id,
                    slug: slug.clone(),
                }),
            })
        })
        .collect()
}
