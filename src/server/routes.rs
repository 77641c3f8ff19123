//! Page handlers: each request runs the full fetch-filter-render pipeline.

use super::{AppState, PreviewMode};
use crate::blog::{get_post_props, get_static_props};
use crate::error::AppError;
use crate::types::RenderedPage;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// `GET /`
pub async fn index(State(state): State<AppState>, PreviewMode(preview): PreviewMode) -> Response {
    let rendered = async {
        let props =
            get_static_props(state.repository.as_ref(), preview, state.revalidate).await?;
        log::debug!("Rendering {} posts", props.props.posts.len());
        state.pages.render_index(&props.props)
    }
    .await;

    respond(&state, preview, rendered)
}

/// `GET /blog/:slug`
pub async fn post(
    State(state): State<AppState>,
    PreviewMode(preview): PreviewMode,
    Path(slug): Path<String>,
) -> Response {
    let rendered = async {
        let props =
            get_post_props(state.repository.as_ref(), &slug, preview, state.revalidate).await?;
        state.pages.render_post(&props.props)
    }
    .await;

    respond(&state, preview, rendered)
}

/// Fallback for every other path.
pub async fn not_found(State(state): State<AppState>, PreviewMode(preview): PreviewMode) -> Response {
    respond(
        &state,
        preview,
        Err(AppError::PostNotFound("unknown path".to_string())),
    )
}

/// `Cache-Control` for a rendered page.
///
/// Preview responses must never be shared by a cache.
pub fn cache_control(preview: bool, revalidate: u64) -> String {
    if preview {
        "private, no-store".to_string()
    } else {
        format!("s-maxage={}, stale-while-revalidate", revalidate)
    }
}

fn respond(state: &AppState, preview: bool, rendered: Result<RenderedPage, AppError>) -> Response {
    let (status, page) = match rendered {
        Ok(page) => (StatusCode::OK, Ok(page)),
        Err(AppError::PostNotFound(slug)) => {
            log::debug!("Not found: {}", slug);
            (StatusCode::NOT_FOUND, state.pages.render_not_found(preview))
        }
        Err(e) => {
            log::error!("Failed to render page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                state.pages.render_server_error(preview),
            )
        }
    };

    let cache = if status == StatusCode::OK {
        cache_control(preview, state.revalidate)
    } else {
        cache_control(true, state.revalidate)
    };

    match page {
        Ok(page) => (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("text/html; charset=utf-8"),
                ),
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_str(&cache)
                        .unwrap_or_else(|_| HeaderValue::from_static("no-store")),
                ),
            ],
            page.into_string(),
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to render error page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}
