use super::Block;
use crate::types::{PageId, Slug, UserId};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of the blog index, as materialized for a single render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PageId,
    pub slug: Slug,
    pub title: String,
    pub published: bool,
    pub date: Option<NaiveDate>,
    /// `None` when the row has no `Authors` column value at all.
    pub authors: Option<Vec<UserId>>,
    /// Blocks shown as the post's preview; empty when it has none.
    pub preview: Vec<Block>,
}

impl PostRecord {
    pub fn new(id: PageId, slug: Slug, title: impl Into<String>) -> Self {
        Self {
            id,
            slug,
            title: title.into(),
            published: false,
            date: None,
            authors: None,
            preview: Vec::new(),
        }
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_authors(mut self, authors: Vec<UserId>) -> Self {
        self.authors = Some(authors);
        self
    }

    pub fn with_preview(mut self, preview: Vec<Block>) -> Self {
        self.preview = preview;
        self
    }
}

/// Blog index rows keyed by slug, in table order.
pub type BlogIndex = IndexMap<Slug, PostRecord>;

/// A post whose author list is always present.
///
/// `A` is `UserId` after filtering and `String` (display names) once authors
/// have been resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post<A> {
    pub id: PageId,
    pub slug: Slug,
    pub title: String,
    pub published: bool,
    pub date: Option<NaiveDate>,
    pub authors: Vec<A>,
    pub preview: Vec<Block>,
}

impl Post<UserId> {
    /// Normalizes a record; a missing author list becomes empty.
    pub fn from_record(record: PostRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            title: record.title,
            published: record.published,
            date: record.date,
            authors: record.authors.unwrap_or_default(),
            preview: record.preview,
        }
    }
}

impl<A> Post<A> {
    /// Replaces every author, keeping order. Stops at the first failure.
    pub fn try_map_authors<B, E>(
        self,
        mut f: impl FnMut(&Slug, A) -> Result<B, E>,
    ) -> Result<Post<B>, E> {
        let slug = self.slug;
        let authors = self
            .authors
            .into_iter()
            .map(|author| f(&slug, author))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Post {
            id: self.id,
            slug,
            title: self.title,
            published: self.published,
            date: self.date,
            authors,
            preview: self.preview,
        })
    }

    /// `Posted:` line text, e.g. `March 4, 2021`.
    pub fn formatted_date(&self) -> Option<String> {
        self.date.map(|date| date.format("%B %-d, %Y").to_string())
    }
}
