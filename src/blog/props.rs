//! Static props for each page: everything a render needs, fetched fresh.

use super::{filter_posts, resolve_authors};
use crate::api::BlogRepository;
use crate::error::AppError;
use crate::model::{Block, Post};
use serde::Serialize;

/// Props plus how long the host may serve the rendered page before
/// regenerating it.
#[derive(Debug, Clone, Serialize)]
pub struct StaticProps<P> {
    pub props: P,
    /// Seconds.
    pub revalidate: u64,
}

/// Props of the post list.
#[derive(Debug, Clone, Serialize)]
pub struct IndexProps {
    pub preview: bool,
    pub posts: Vec<Post<String>>,
}

/// Props of a single post page.
#[derive(Debug, Clone, Serialize)]
pub struct PostProps {
    pub preview: bool,
    pub post: Post<String>,
    pub blocks: Vec<Block>,
}

/// Fetch, filter and resolve the post list.
pub async fn get_static_props(
    repository: &dyn BlogRepository,
    preview: bool,
    revalidate: u64,
) -> Result<StaticProps<IndexProps>, AppError> {
    let index = repository.fetch_blog_index().await?;
    let posts = filter_posts(index, preview);
    let posts = resolve_authors(repository, posts).await?;

    Ok(StaticProps {
        props: IndexProps { preview, posts },
        revalidate,
    })
}

/// Same pipeline narrowed to one post, plus its body.
///
/// A slug that isn't in the index, or only belongs to a draft outside
/// preview mode, is `PostNotFound`.
pub async fn get_post_props(
    repository: &dyn BlogRepository,
    slug: &str,
    preview: bool,
    revalidate: u64,
) -> Result<StaticProps<PostProps>, AppError> {
    let mut index = repository.fetch_blog_index().await?;
    index.retain(|key, _| key.as_str() == slug);

    let post = filter_posts(index, preview)
        .into_iter()
        .next()
        .ok_or_else(|| AppError::PostNotFound(slug.to_string()))?;
    let post = resolve_authors(repository, vec![post])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::PostNotFound(slug.to_string()))?;

    let blocks = repository.retrieve_post_blocks(&post.id).await?;
    log::debug!("Post '{}' has {} top-level blocks", slug, blocks.len());

    Ok(StaticProps {
        props: PostProps {
            preview,
            post,
            blocks,
        },
        revalidate,
    })
}
