// tests/site_routes.rs
//! Router tests: pages, preview mode and caching headers over an in-memory blog.

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use notion_blog::{
    router, AppState, Block, PageId, Pages, PostRecord, PreviewSecret, RichTextItem, Slug,
    StaticBlogRepository, UserId, UserRecord,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const SECRET: &str = "a-preview-secret-of-thirty-two-b";

fn ada() -> UserId {
    UserId::parse("ee5f0f84-409a-440f-983a-a5315961c6e4").unwrap()
}

fn blog() -> StaticBlogRepository {
    let hello = PageId::new_v4();
    StaticBlogRepository::new()
        .with_post(
            PostRecord::new(hello.clone(), Slug::new("hello-world").unwrap(), "Hello World")
                .published(true)
                .with_authors(vec![ada()])
                .with_preview(vec![Block::paragraph(vec![RichTextItem::plain_text(
                    "A first post",
                )])]),
        )
        .with_post(PostRecord::new(
            PageId::new_v4(),
            Slug::new("work-in-progress").unwrap(),
            "Work In Progress",
        ))
        .with_user(UserRecord::new(ada(), "Ada Lovelace"))
        .with_body(
            hello,
            vec![
                Block::heading(1, vec![RichTextItem::plain_text("Welcome")]),
                Block::paragraph(vec![RichTextItem::plain_text("Full body")]),
            ],
        )
}

fn server_with(repository: StaticBlogRepository) -> TestServer {
    let state = AppState::new(
        Arc::new(repository),
        Pages::new("Test Blog", 10).unwrap(),
        Some(PreviewSecret::new(SECRET).unwrap()),
        10,
    );
    TestServer::new(router(state)).unwrap()
}

fn server() -> TestServer {
    server_with(blog())
}

/// Enters preview mode the only legitimate way and returns the cookie to send back.
async fn preview_cookie(server: &TestServer) -> HeaderValue {
    let response = server
        .get("/api/preview")
        .add_query_param("token", SECRET)
        .await;
    let set_cookie = response.header(header::SET_COOKIE);
    let pair = set_cookie
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();
    HeaderValue::from_str(&pair).unwrap()
}

#[tokio::test]
async fn index_lists_published_posts() {
    let response = server().get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.header(header::CACHE_CONTROL),
        "s-maxage=10, stale-while-revalidate"
    );
    let html = response.text();
    assert!(html.contains("<a href=\"/blog/hello-world\">Hello World</a>"));
    assert!(html.contains("By: Ada Lovelace"));
    assert!(html.contains("A first post"));
    assert!(!html.contains("Work In Progress"));
    assert!(!html.contains("Viewing in preview mode"));
}

#[tokio::test]
async fn index_in_preview_shows_drafts() {
    let server = server();
    let cookie = preview_cookie(&server).await;
    let response = server.get("/").add_header(header::COOKIE, cookie).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CACHE_CONTROL), "private, no-store");
    let html = response.text();
    assert!(html.contains("Viewing in preview mode"));
    assert!(html.contains("Work In Progress"));
    assert!(html.contains("<span class=\"draft-badge\">Draft</span>"));
    assert!(html.contains("No preview available"));
}

#[tokio::test]
async fn hand_made_preview_cookie_shows_no_drafts() {
    let server = server();

    for forged in ["__blog_preview=1", "__blog_preview=anything"] {
        let response = server
            .get("/")
            .add_header(header::COOKIE, HeaderValue::from_static(forged))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.header(header::CACHE_CONTROL),
            "s-maxage=10, stale-while-revalidate"
        );
        let html = response.text();
        assert!(!html.contains("Work In Progress"));
        assert!(!html.contains("Viewing in preview mode"));

        let response = server
            .get("/blog/work-in-progress")
            .add_header(header::COOKIE, HeaderValue::from_static(forged))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn empty_blog_has_placeholder() {
    let html = server_with(StaticBlogRepository::new()).get("/").await.text();
    assert!(html.contains("There are no posts yet"));
}

#[tokio::test]
async fn post_page_renders_body() {
    let response = server().get("/blog/hello-world").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<title>Hello World | Test Blog</title>"));
    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(html.contains("Full body"));
}

#[tokio::test]
async fn drafts_and_unknown_slugs_are_not_found() {
    let server = server();

    let response = server.get("/blog/work-in-progress").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("Page not found"));

    let response = server
        .get("/blog/work-in-progress")
        .add_header(header::COOKIE, preview_cookie(&server).await)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server.get("/blog/nope").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get("/no/such/page").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_author_is_a_server_error() {
    let repository = StaticBlogRepository::new().with_post(
        PostRecord::new(PageId::new_v4(), Slug::new("orphan").unwrap(), "Orphan")
            .published(true)
            .with_authors(vec![ada()]),
    );
    let response = server_with(repository).get("/").await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("Something went wrong"));
}

#[tokio::test]
async fn entering_preview_checks_the_secret() {
    let server = server();

    let response = server.get("/api/preview").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/preview")
        .add_query_param("token", "wrong-secret")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server
        .get("/api/preview")
        .add_query_param("token", SECRET)
        .add_query_param("slug", "hello-world")
        .await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION), "/blog/hello-world");
    let cookie = response.header(header::SET_COOKIE);
    let cookie = cookie.to_str().unwrap();
    assert!(cookie.starts_with("__blog_preview="));
    assert!(!cookie.starts_with("__blog_preview=1;"));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn preview_is_unavailable_without_a_secret() {
    let state = AppState::new(
        Arc::new(blog()),
        Pages::new("Test Blog", 10).unwrap(),
        None,
        10,
    );
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .get("/api/preview")
        .add_query_param("token", SECRET)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clearing_preview_expires_the_cookie() {
    let response = server()
        .get("/api/clear-preview")
        .add_query_param("slug", "hello-world")
        .await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION), "/blog/hello-world");
    let cookie = response.header(header::SET_COOKIE);
    assert!(cookie.to_str().unwrap().contains("Max-Age=0"));

    let response = server().get("/api/clear-preview").await;
    assert_eq!(response.header(header::LOCATION), "/");
}
