// src/constants.rs
//! Constants that bound what a single render fetches and shows.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results (API maximum).
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Notion API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

/// Base URL of the public Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Blog index columns
// ---------------------------------------------------------------------------

/// Title column of the blog index.
pub const COLUMN_TITLE: &str = "Page";
pub const COLUMN_SLUG: &str = "Slug";
pub const COLUMN_PUBLISHED: &str = "Published";
pub const COLUMN_DATE: &str = "Date";
pub const COLUMN_AUTHORS: &str = "Authors";

// ---------------------------------------------------------------------------
// Previews
// ---------------------------------------------------------------------------

/// How many top-level blocks of a post are scanned for its preview.
///
/// The preview is everything before the first divider inside this window.
pub const PREVIEW_BLOCK_SCAN_LIMIT: usize = 10;

/// Visible characters a short-form block renders before it is cut off.
pub const PREVIEW_SNIPPET_CHAR_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// Serving
// ---------------------------------------------------------------------------

/// Seconds after which the host should regenerate a rendered page.
pub const DEFAULT_REVALIDATE_SECONDS: u64 = 10;

/// Cookie that carries preview mode between requests.
pub const PREVIEW_COOKIE: &str = "__blog_preview";

/// Site name shown in the header and `<title>`.
pub const DEFAULT_SITE_TITLE: &str = "My Notion Blog";
