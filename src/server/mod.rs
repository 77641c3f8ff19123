// src/server/mod.rs
//! HTTP front-end: page routes, preview endpoints and request logging.

mod preview;
mod routes;

pub use preview::{clear_preview, enter_preview, PreviewKey, PreviewMode};
pub use routes::cache_control;

use crate::api::BlogRepository;
use crate::error::AppError;
use crate::pages::Pages;
use crate::types::PreviewSecret;
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn BlogRepository>,
    pub pages: Arc<Pages>,
    pub preview_secret: Option<PreviewSecret>,
    pub preview_key: PreviewKey,
    pub revalidate: u64,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn BlogRepository>,
        pages: Pages,
        preview_secret: Option<PreviewSecret>,
        revalidate: u64,
    ) -> Self {
        Self {
            repository,
            pages: Arc::new(pages),
            preview_key: PreviewKey::from_secret(preview_secret.as_ref()),
            preview_secret,
            revalidate,
        }
    }
}

/// Builds the blog's router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/blog/:slug", get(routes::post))
        .route("/api/preview", get(enter_preview))
        .route("/api/clear-preview", get(clear_preview))
        .fallback(routes::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} -> {} ({}ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Listens on `bind` until the process is stopped.
pub async fn serve(bind: SocketAddr, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let address = listener.local_addr()?;
    log::info!("Listening on {}", address);
    println!("Serving blog on http://{}", address);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
