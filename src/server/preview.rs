//! Preview mode: a signed cookie set by `/api/preview` and verified on every page.
//!
//! The cookie is signed with a key derived from the preview secret, so only a
//! request that went through `/api/preview` with the right token can carry a
//! valid one. Changing the secret ends every open preview session.

use super::AppState;
use crate::constants::PREVIEW_COOKIE;
use crate::types::{PreviewSecret, Slug};
use axum::{
    extract::{FromRef, FromRequestParts, Query, State},
    http::{header, request, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, CookieJar, Key};
use serde::Deserialize;
use std::convert::Infallible;

/// Signs and verifies preview cookies; `None` when preview is disabled.
#[derive(Clone)]
pub struct PreviewKey(Option<Key>);

impl PreviewKey {
    pub fn from_secret(secret: Option<&PreviewSecret>) -> Self {
        Self(secret.map(|secret| Key::derive_from(secret.as_bytes())))
    }

    /// The preview cookie with its value signed.
    fn sign(&self, cookie: Cookie<'static>) -> Option<Cookie<'static>> {
        let key = self.0.as_ref()?;
        let mut jar = CookieJar::new();
        jar.signed_mut(key).add(cookie);
        jar.get(PREVIEW_COOKIE).cloned()
    }

    /// Whether `cookies` hold a preview cookie this key signed.
    fn verifies<'c>(&self, cookies: impl Iterator<Item = Cookie<'c>>) -> bool {
        let Some(key) = self.0.as_ref() else {
            return false;
        };
        let mut jar = CookieJar::new();
        for cookie in cookies {
            jar.add_original(cookie.into_owned());
        }
        jar.signed(key).get(PREVIEW_COOKIE).is_some()
    }
}

impl FromRef<AppState> for PreviewKey {
    fn from_ref(state: &AppState) -> Self {
        state.preview_key.clone()
    }
}

/// Whether the current request was made in preview mode.
///
/// Read from the preview cookie; a request without a validly signed one is
/// a normal one.
///
/// ```rust,ignore
/// async fn route(PreviewMode(preview): PreviewMode) {
///     println!("preview: {}", preview);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewMode(pub bool);

#[axum::async_trait]
impl<S> FromRequestParts<S> for PreviewMode
where
    PreviewKey: FromRef<S>,
    S: Sync + Send,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut request::Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let cookies = parts
            .headers
            .get_all(header::COOKIE)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse)
            .filter_map(Result::ok);

        Ok(PreviewMode(PreviewKey::from_ref(state).verifies(cookies)))
    }
}

fn enter_cookie() -> Cookie<'static> {
    Cookie::build((PREVIEW_COOKIE, "1"))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax)
        .into()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build((PREVIEW_COOKIE, ""))
        .path("/")
        .http_only(true)
        .max_age(cookie::time::Duration::ZERO)
        .into()
}

/// Where to land after toggling preview mode.
fn landing(slug: Option<&str>) -> String {
    match slug.map(Slug::new) {
        Some(Ok(slug)) => slug.blog_link(),
        Some(Err(e)) => {
            log::debug!("Ignoring preview redirect target: {}", e);
            "/".to_string()
        }
        None => "/".to_string(),
    }
}

fn redirect_with(cookie: Cookie<'static>, to: &str) -> Response {
    (
        [(header::SET_COOKIE, cookie.to_string())],
        Redirect::temporary(to),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct EnterPreviewQuery {
    pub token: Option<String>,
    pub slug: Option<String>,
}

/// `GET /api/preview?token=..&slug=..`
pub async fn enter_preview(
    State(state): State<AppState>,
    Query(query): Query<EnterPreviewQuery>,
) -> Response {
    let Some(token) = query.token.filter(|token| !token.is_empty()) else {
        return (StatusCode::UNAUTHORIZED, "No preview token").into_response();
    };

    let Some(secret) = &state.preview_secret else {
        return (StatusCode::NOT_FOUND, "Preview mode is not enabled").into_response();
    };
    if !secret.matches(&token) {
        log::warn!("Rejected preview request with a wrong token");
        return (StatusCode::NOT_FOUND, "Invalid preview token").into_response();
    }

    match state.preview_key.sign(enter_cookie()) {
        Some(cookie) => {
            log::info!("Entering preview mode");
            redirect_with(cookie, &landing(query.slug.as_deref()))
        }
        None => (StatusCode::NOT_FOUND, "Preview mode is not enabled").into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ClearPreviewQuery {
    pub slug: Option<String>,
}

/// `GET /api/clear-preview?slug=..`
pub async fn clear_preview(Query(query): Query<ClearPreviewQuery>) -> Response {
    log::info!("Leaving preview mode");
    redirect_with(clear_cookie(), &landing(query.slug.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    const SECRET: &str = "a-preview-secret-of-thirty-two-b";

    fn key(secret: &str) -> PreviewKey {
        PreviewKey::from_secret(Some(&PreviewSecret::new(secret).unwrap()))
    }

    async fn extract(key: &PreviewKey, cookie: Option<&str>) -> bool {
        let mut builder = Request::builder().uri("/");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let PreviewMode(enabled) = PreviewMode::from_request_parts(&mut parts, key)
            .await
            .unwrap();
        enabled
    }

    fn signed_pair(key: &PreviewKey) -> String {
        let cookie = key.sign(enter_cookie()).unwrap();
        format!("{}={}", cookie.name(), cookie.value())
    }

    #[tokio::test]
    async fn test_preview_mode_needs_a_signed_cookie() {
        let key = key(SECRET);
        assert!(!extract(&key, None).await);
        assert!(!extract(&key, Some("theme=dark")).await);
        assert!(!extract(&key, Some("__blog_preview=1")).await);
        assert!(!extract(&key, Some("__blog_preview=anything")).await);

        let signed = signed_pair(&key);
        assert!(extract(&key, Some(&format!("theme=dark; {}", signed))).await);
    }

    #[tokio::test]
    async fn test_cookie_from_another_secret_is_rejected() {
        let other = key("another-preview-secret-32-bytes!");
        let signed = signed_pair(&other);
        assert!(!extract(&key(SECRET), Some(&signed)).await);
    }

    #[tokio::test]
    async fn test_disabled_preview_ignores_cookies() {
        let enabled = key(SECRET);
        let disabled = PreviewKey::from_secret(None);
        assert!(disabled.sign(enter_cookie()).is_none());
        assert!(!extract(&disabled, Some(&signed_pair(&enabled))).await);
    }

    #[test]
    fn test_landing() {
        assert_eq!(landing(None), "/");
        assert_eq!(landing(Some("hello-world")), "/blog/hello-world");
        assert_eq!(landing(Some("../etc")), "/");
        assert_eq!(landing(Some("a&b")), "/");
        assert_eq!(landing(Some("")), "/");
    }

    #[test]
    fn test_cookies() {
        let set = key(SECRET).sign(enter_cookie()).unwrap().to_string();
        assert!(set.starts_with("__blog_preview="));
        assert!(!set.starts_with("__blog_preview=1;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Path=/"));

        let cleared = clear_cookie().to_string();
        assert!(cleared.contains("Max-Age=0"));
    }
}
