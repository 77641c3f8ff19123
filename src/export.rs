// src/export.rs
//! Static export: renders every public page and writes it under a directory.
//!
//! This module is the only place where file I/O operations occur.
//! Export never runs in preview mode, so drafts are never written out.

use crate::api::BlogRepository;
use crate::blog::{get_static_props, PostProps};
use crate::error::AppError;
use crate::pages::Pages;
use crate::types::RenderedPage;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One file written by an export.
#[derive(Debug, Clone)]
pub struct WrittenPage {
    pub path: PathBuf,
    pub bytes_written: usize,
}

/// Summary of a finished export.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub written: Vec<WrittenPage>,
    pub total_duration_ms: u64,
}

impl ExportReport {
    pub fn pages_written(&self) -> usize {
        self.written.len()
    }

    pub fn bytes_written(&self) -> usize {
        self.written.iter().map(|page| page.bytes_written).sum()
    }
}

/// Renders the index, each visible post and a 404 page into `out`.
///
/// Posts land at `blog/{slug}/index.html` so the exported tree serves the
/// same URLs as the live server. The index is fetched and its authors
/// resolved once; each post then only needs its own body.
pub async fn export_site(
    repository: &dyn BlogRepository,
    pages: &Pages,
    revalidate: u64,
    out: &Path,
) -> Result<ExportReport, AppError> {
    let start_time = Instant::now();
    let mut report = ExportReport::default();

    create_directory(out)?;

    let index = get_static_props(repository, false, revalidate).await?;
    log::info!("Exporting {} posts to {}", index.props.posts.len(), out.display());

    let page = pages.render_index(&index.props)?;
    report.written.push(write_page(&out.join("index.html"), &page)?);

    for post in &index.props.posts {
        let blocks = repository.retrieve_post_blocks(&post.id).await?;
        let props = PostProps {
            preview: false,
            post: post.clone(),
            blocks,
        };
        let page = pages.render_post(&props)?;
        let path = out
            .join("blog")
            .join(post.slug.as_str())
            .join("index.html");
        report.written.push(write_page(&path, &page)?);
    }

    let page = pages.render_not_found(false)?;
    report.written.push(write_page(&out.join("404.html"), &page)?);

    report.total_duration_ms = start_time.elapsed().as_millis() as u64;
    log::info!(
        "Export complete: {} pages, {} bytes in {}ms",
        report.pages_written(),
        report.bytes_written(),
        report.total_duration_ms
    );
    Ok(report)
}

/// Writes one rendered page, creating parent directories as needed.
fn write_page(path: &Path, page: &RenderedPage) -> Result<WrittenPage, AppError> {
    log::debug!("Writing {} bytes to {}", page.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, page.as_str())?;

    Ok(WrittenPage {
        path: path.to_path_buf(),
        bytes_written: page.len(),
    })
}

fn create_directory(path: &Path) -> Result<(), AppError> {
    if path.exists() {
        if path.is_dir() {
            log::debug!("Directory already exists: {}", path.display());
            return Ok(());
        }
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", path.display()),
        )));
    }

    fs::create_dir_all(path)?;
    log::info!("Created directory: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StaticBlogRepository;
    use crate::model::{Block, PostRecord};
    use crate::types::{PageId, RichTextItem, Slug};

    fn repository() -> StaticBlogRepository {
        let live = PageId::new_v4();
        StaticBlogRepository::new()
            .with_post(PostRecord::new(live.clone(), Slug::new("live").unwrap(), "Live").published(true))
            .with_post(PostRecord::new(
                PageId::new_v4(),
                Slug::new("secret-draft").unwrap(),
                "Draft",
            ))
            .with_body(live, vec![Block::paragraph(vec![RichTextItem::plain_text("Body text")])])
    }

    #[tokio::test]
    async fn test_export_writes_public_pages_only() {
        let dir = tempfile::tempdir().unwrap();
        let pages = Pages::new("Test Blog", 10).unwrap();

        let report = export_site(&repository(), &pages, 10, dir.path())
            .await
            .unwrap();
        assert_eq!(report.pages_written(), 3);

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("/blog/live"));
        assert!(!index.contains("secret-draft"));

        let post = fs::read_to_string(dir.path().join("blog/live/index.html")).unwrap();
        assert!(post.contains("Body text"));
        assert!(!dir.path().join("blog/secret-draft").exists());
        assert!(dir.path().join("404.html").exists());
    }

    #[tokio::test]
    async fn test_export_fetches_the_index_once() {
        let dir = tempfile::tempdir().unwrap();
        let pages = Pages::new("Test Blog", 10).unwrap();
        let repository = repository()
            .with_post(
                PostRecord::new(PageId::new_v4(), Slug::new("second").unwrap(), "Second")
                    .published(true),
            )
            .with_post(
                PostRecord::new(PageId::new_v4(), Slug::new("third").unwrap(), "Third")
                    .published(true),
            );

        let report = export_site(&repository, &pages, 10, dir.path())
            .await
            .unwrap();
        assert_eq!(report.pages_written(), 5);
        assert_eq!(repository.index_fetches(), 1);
        assert!(repository.user_requests().len() <= 1);
        assert!(dir.path().join("blog/third/index.html").exists());
    }

    #[tokio::test]
    async fn test_export_refuses_file_as_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, "x").unwrap();

        let pages = Pages::new("Test Blog", 10).unwrap();
        assert!(matches!(
            export_site(&repository(), &pages, 10, &file).await,
            Err(AppError::Io(_))
        ));
    }
}
