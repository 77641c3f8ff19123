//! The page component: renders props into complete HTML documents.
//!
//! Templates are compiled into the binary and registered once; rendering is
//! read-only, so a single [`Pages`] is shared by every request.

mod view;

pub use view::{Chrome, IndexView, PostSummary, PostView, StatusView};

use crate::blog::{IndexProps, PostProps};
use crate::error::AppError;
use crate::types::RenderedPage;
use handlebars::Handlebars;
use serde::Serialize;

const HEADER_PARTIAL: &str = include_str!("../../templates/header.hbs");
const FOOTER_PARTIAL: &str = include_str!("../../templates/footer.hbs");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");
const POST_TEMPLATE: &str = include_str!("../../templates/post.hbs");
const STATUS_TEMPLATE: &str = include_str!("../../templates/status.hbs");

/// Compiled templates plus the site-wide settings they need.
pub struct Pages {
    registry: Handlebars<'static>,
    site_title: String,
    revalidate: u64,
}

impl Pages {
    pub fn new(site_title: impl Into<String>, revalidate: u64) -> Result<Self, AppError> {
        let mut registry = Handlebars::new();

        for (name, source) in [("header", HEADER_PARTIAL), ("footer", FOOTER_PARTIAL)] {
            registry
                .register_partial(name, source)
                .map_err(|e| AppError::TemplateRenderError {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        for (name, source) in [
            ("index", INDEX_TEMPLATE),
            ("post", POST_TEMPLATE),
            ("status", STATUS_TEMPLATE),
        ] {
            registry
                .register_template_string(name, source)
                .map_err(|e| AppError::TemplateRenderError {
                    name: name.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            registry,
            site_title: site_title.into(),
            revalidate,
        })
    }

    /// The post list, with preview banner and static content.
    pub fn render_index(&self, props: &IndexProps) -> Result<RenderedPage, AppError> {
        let view = IndexView::new(&self.site_title, props, self.revalidate);
        self.render("index", &view)
    }

    pub fn render_post(&self, props: &PostProps) -> Result<RenderedPage, AppError> {
        let view = PostView::new(&self.site_title, props, self.revalidate);
        self.render("post", &view)
    }

    pub fn render_not_found(&self, preview: bool) -> Result<RenderedPage, AppError> {
        self.render_status(
            preview,
            "Page not found",
            "There is no post at this address.",
        )
    }

    pub fn render_server_error(&self, preview: bool) -> Result<RenderedPage, AppError> {
        self.render_status(
            preview,
            "Something went wrong",
            "The blog could not be loaded. Please try again shortly.",
        )
    }

    fn render_status(
        &self,
        preview: bool,
        heading: &str,
        message: &str,
    ) -> Result<RenderedPage, AppError> {
        let view = StatusView {
            chrome: Chrome {
                site_title: &self.site_title,
                title_pre: heading.to_string(),
                preview,
                preview_exit_slug: None,
                nav_blog: false,
                revalidate: self.revalidate,
            },
            heading: heading.to_string(),
            message: message.to_string(),
        };
        self.render("status", &view)
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<RenderedPage, AppError> {
        let html = self
            .registry
            .render(name, data)
            .map_err(|e| AppError::TemplateRenderError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        log::debug!("Rendered '{}' template ({} bytes)", name, html.len());
        Ok(RenderedPage::new(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_SITE_TITLE;
    use crate::model::{Block, Post, PostRecord};
    use crate::types::{Annotations, PageId, RichTextItem, Slug};
    use chrono::NaiveDate;

    fn pages() -> Pages {
        Pages::new(DEFAULT_SITE_TITLE, 10).unwrap()
    }

    fn post(slug: &str, published: bool) -> Post<String> {
        let record = PostRecord::new(PageId::new_v4(), Slug::new(slug).unwrap(), "Hello <World>")
            .published(published);
        Post::from_record(record)
            .try_map_authors(|_, id| Ok::<_, ()>(id.to_string()))
            .unwrap()
    }

    fn index(posts: Vec<Post<String>>, preview: bool) -> String {
        pages()
            .render_index(&IndexProps { preview, posts })
            .unwrap()
            .into_string()
    }

    #[test]
    fn test_empty_index() {
        let html = index(vec![], false);
        assert!(html.contains("<title>Blog | My Notion Blog</title>"));
        assert!(html.contains("There are no posts yet"));
        assert_eq!(html.matches("class=\"post-preview\"").count(), 0);
        assert!(!html.contains("Exit Preview"));
    }

    #[test]
    fn test_summary_lines() {
        let mut post = post("hello", true);
        post.authors = vec!["Ada Lovelace".to_string(), "Grace Hopper".to_string()];
        post.date = NaiveDate::from_ymd_opt(2020, 2, 9);
        post.preview = vec![Block::paragraph(vec![
            RichTextItem::plain_text("Hello "),
            RichTextItem::plain_text("world").with_annotations(Annotations::bold()),
        ])];

        let html = index(vec![post], false);
        assert!(html.contains("<a href=\"/blog/hello\">Hello &lt;World&gt;</a>"));
        assert!(html.contains("By: Ada Lovelace Grace Hopper"));
        assert!(html.contains("Posted: February 9, 2020"));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
        assert!(!html.contains("Draft"));
        assert!(!html.contains("There are no posts yet"));
        assert_eq!(html.matches("class=\"post-preview\"").count(), 1);
    }

    #[test]
    fn test_missing_optional_lines() {
        let html = index(vec![post("bare", true)], false);
        assert!(!html.contains("By:"));
        assert!(!html.contains("Posted:"));
        assert!(html.contains("No preview available"));
    }

    #[test]
    fn test_preview_mode_banner_and_draft_badge() {
        let html = index(vec![post("wip", false)], true);
        assert!(html.contains("Viewing in preview mode"));
        assert!(html.contains("href=\"/api/clear-preview\""));
        assert!(html.contains("<span class=\"draft-badge\">Draft</span>"));
    }

    #[test]
    fn test_post_page() {
        let pages = pages();
        let mut props = PostProps {
            preview: true,
            post: post("hello", true),
            blocks: vec![Block::heading(1, vec![RichTextItem::plain_text("Intro")])],
        };

        let html = pages.render_post(&props).unwrap().into_string();
        assert!(html.contains("<title>Hello &lt;World&gt; | My Notion Blog</title>"));
        assert!(html.contains("<article><h1>Intro</h1></article>"));
        assert!(html.contains("href=\"/api/clear-preview?slug=hello\""));

        props.blocks.clear();
        let html = pages.render_post(&props).unwrap().into_string();
        assert!(html.contains("This post has no content"));
    }

    #[test]
    fn test_status_pages() {
        let html = pages().render_not_found(false).unwrap().into_string();
        assert!(html.contains("<title>Page not found | My Notion Blog</title>"));
    }
}
