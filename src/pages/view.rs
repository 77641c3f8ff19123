//! View models: the JSON handed to the templates.

use crate::blog::{IndexProps, PostProps};
use crate::formatting::{render_blocks_html, render_text_block_html};
use crate::model::Post;
use serde::Serialize;

/// Fields shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct Chrome<'a> {
    pub site_title: &'a str,
    pub title_pre: String,
    pub preview: bool,
    /// Slug to return to after leaving preview mode.
    pub preview_exit_slug: Option<String>,
    pub nav_blog: bool,
    pub revalidate: u64,
}

/// One entry of the post list.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub link: String,
    pub title: String,
    pub published: bool,
    /// Author names joined by a single space; empty when there are none.
    pub authors: String,
    pub date: Option<String>,
    /// Pre-rendered, already escaped preview markup.
    pub preview_html: String,
}

impl PostSummary {
    pub fn from_post(post: &Post<String>) -> Self {
        let preview_html = post
            .preview
            .iter()
            .enumerate()
            .map(|(idx, block)| {
                render_text_block_html(block, true, &format!("{}{}", post.slug, idx))
            })
            .collect::<String>();

        Self {
            slug: post.slug.to_string(),
            link: post.slug.blog_link(),
            title: post.title.clone(),
            published: post.published,
            authors: post.authors.join(" "),
            date: post.formatted_date(),
            preview_html: preview_html.trim_end().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexView<'a> {
    #[serde(flatten)]
    pub chrome: Chrome<'a>,
    pub posts: Vec<PostSummary>,
}

impl<'a> IndexView<'a> {
    pub fn new(site_title: &'a str, props: &IndexProps, revalidate: u64) -> Self {
        Self {
            chrome: Chrome {
                site_title,
                title_pre: "Blog".to_string(),
                preview: props.preview,
                preview_exit_slug: None,
                nav_blog: true,
                revalidate,
            },
            posts: props.posts.iter().map(PostSummary::from_post).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView<'a> {
    #[serde(flatten)]
    pub chrome: Chrome<'a>,
    #[serde(flatten)]
    pub summary: PostSummary,
    pub body_html: String,
}

impl<'a> PostView<'a> {
    pub fn new(site_title: &'a str, props: &PostProps, revalidate: u64) -> Self {
        let summary = PostSummary::from_post(&props.post);
        Self {
            chrome: Chrome {
                site_title,
                title_pre: props.post.title.clone(),
                preview: props.preview,
                preview_exit_slug: Some(summary.slug.clone()),
                nav_blog: true,
                revalidate,
            },
            summary,
            body_html: render_blocks_html(&props.blocks),
        }
    }
}

/// A plain status page: not found, server error.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView<'a> {
    #[serde(flatten)]
    pub chrome: Chrome<'a>,
    pub heading: String,
    pub message: String,
}
