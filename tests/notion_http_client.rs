// tests/notion_http_client.rs
//! Drives `NotionHttpClient` against a local stub of the Notion REST API.

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use notion_blog::{
    get_static_props, AppError, ApiKey, BlogRepository, DatabaseId, NotionErrorCode,
    NotionHttpClient, UserId,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};

const DATABASE: &str = "d9824bdc-8445-4327-be8b-5b47500af6ce";
const TOKEN: &str = "secret_abcdefghijklmnopqrs";
const ADA: &str = "ee5f0f84-409a-440f-983a-a5315961c6e4";
const GRACE: &str = "0c3e9826-b8f7-4f73-927d-2caaf86f1103";

fn rich_text(text: &str, bold: bool) -> Value {
    json!({
        "type": "text",
        "text": { "content": text, "link": null },
        "annotations": {
            "bold": bold, "italic": false, "strikethrough": false,
            "underline": false, "code": false, "color": "default"
        },
        "plain_text": text,
        "href": null
    })
}

fn row(id: &str, title: &str, slug: &str, published: bool, authors: &[&str]) -> Value {
    let people: Vec<Value> = authors
        .iter()
        .map(|id| json!({ "object": "user", "id": id }))
        .collect();
    json!({
        "object": "page",
        "id": id,
        "created_time": "2022-03-01T19:05:00.000Z",
        "last_edited_time": "2022-07-06T20:25:00.000Z",
        "created_by": { "object": "user", "id": ADA },
        "last_edited_by": { "object": "user", "id": ADA },
        "parent": { "type": "database_id", "database_id": DATABASE },
        "archived": false,
        "properties": {
            "Page": { "id": "title", "type": "title", "title": [rich_text(title, false)] },
            "Slug": { "id": "slug", "type": "rich_text", "rich_text": [rich_text(slug, false)] },
            "Published": { "id": "pub", "type": "checkbox", "checkbox": published },
            "Date": {
                "id": "date", "type": "date",
                "date": { "start": "2020-02-09", "end": null, "time_zone": null }
            },
            "Authors": { "id": "auth", "type": "people", "people": people }
        },
        "url": "https://www.notion.so/post"
    })
}

fn block(id: &str, parent: &str, kind: &str, body: Value) -> Value {
    let mut block = json!({
        "object": "block",
        "id": id,
        "parent": { "type": "page_id", "page_id": parent },
        "created_by": { "object": "user", "id": ADA },
        "last_edited_by": { "object": "user", "id": ADA },
        "created_time": "2022-03-01T19:05:00.000Z",
        "last_edited_time": "2022-03-01T19:05:00.000Z",
        "has_children": false,
        "archived": false,
        "type": kind
    });
    block[kind] = body;
    block
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Bearer {}", TOKEN)[..])
        && headers.get("notion-version").is_some()
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "object": "error", "status": 401, "code": "unauthorized",
            "message": "API token is invalid."
        })),
    )
}

async fn query_database(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    // Two result pages so the cursor is followed.
    let page = match body.get("start_cursor").and_then(Value::as_str) {
        None => json!({
            "object": "list",
            "results": [row("59833787-2cf9-4fdf-8782-e53db20768a5", "Hello", "hello", true, &[ADA, GRACE])],
            "next_cursor": "cursor-2",
            "has_more": true
        }),
        Some(_) => json!({
            "object": "list",
            "results": [row("7a774b2c-9d0e-4b4f-8f1c-5c2d6d4f6e11", "Draft", "draft", false, &[GRACE])],
            "next_cursor": null,
            "has_more": false
        }),
    };
    (StatusCode::OK, Json(page))
}

async fn block_children(
    headers: HeaderMap,
    Path(parent): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    assert!(query.contains_key("page_size"));
    let results = vec![
        block(
            "c02fc1d3-db8b-45c5-a222-27595b15aea7",
            &parent,
            "paragraph",
            json!({ "rich_text": [rich_text("Hello ", false), rich_text("world", true)], "color": "default" }),
        ),
        block("acc7eb06-05cd-4603-a384-5e1e4f1f4e72", &parent, "divider", json!({})),
        block(
            "144d5ee3-1f3e-4a5b-9c0e-3a2b1c0d9e8f",
            &parent,
            "paragraph",
            json!({ "rich_text": [rich_text("Below the fold", false)], "color": "default" }),
        ),
    ];
    (
        StatusCode::OK,
        Json(json!({ "object": "list", "results": results, "next_cursor": null, "has_more": false })),
    )
}

async fn list_users(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "object": "list",
            "results": [
                { "object": "user", "id": ADA, "name": "Ada Lovelace" },
                { "object": "user", "id": GRACE, "name": "Grace Hopper" },
                { "object": "user", "id": "6794760a-1f15-45cd-9c65-0dfe42f5135a", "name": "Someone Else" }
            ],
            "next_cursor": null,
            "has_more": false
        })),
    )
}

/// Starts the stub API and returns its base URL.
async fn stub_notion() -> String {
    let app = Router::new()
        .route("/v1/databases/:id/query", post(query_database))
        .route("/v1/blocks/:id/children", get(block_children))
        .route("/v1/users", get(list_users));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1", address)
}

async fn client(token: &str) -> NotionHttpClient {
    NotionHttpClient::new(&ApiKey::new(token).unwrap(), DatabaseId::parse(DATABASE).unwrap())
        .unwrap()
        .with_base_url(stub_notion().await)
}

#[tokio::test]
async fn fetches_every_index_row_with_previews() {
    let client = client(TOKEN).await;
    let index = client.fetch_blog_index().await.unwrap();

    let slugs: Vec<&str> = index.keys().map(|slug| slug.as_str()).collect();
    assert_eq!(slugs, vec!["hello", "draft"]);

    let hello = &index[0];
    assert!(hello.published);
    assert_eq!(hello.authors.as_ref().map(Vec::len), Some(2));
    // Everything before the divider.
    assert_eq!(hello.preview.len(), 1);
    assert_eq!(hello.preview[0].rich_text()[1].plain_text, "world");
}

#[tokio::test]
async fn resolves_only_requested_users() {
    let client = client(TOKEN).await;
    let ids: BTreeSet<UserId> = [UserId::parse(ADA).unwrap()].into_iter().collect();

    let users = client.resolve_users(&ids).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(
        users.get(&UserId::parse(ADA).unwrap()).map(|u| u.full_name.as_str()),
        Some("Ada Lovelace")
    );
}

#[tokio::test]
async fn full_pipeline_over_http() {
    let client = client(TOKEN).await;

    let props = get_static_props(&client, false, 10).await.unwrap();
    assert_eq!(props.props.posts.len(), 1);
    assert_eq!(
        props.props.posts[0].authors,
        vec!["Ada Lovelace".to_string(), "Grace Hopper".to_string()]
    );

    let page = notion_blog::PageId::parse("59833787-2cf9-4fdf-8782-e53db20768a5").unwrap();
    let blocks = client.retrieve_post_blocks(&page).await.unwrap();
    assert_eq!(blocks.len(), 3);
}

#[tokio::test]
async fn notion_errors_are_typed() {
    let client = client("secret_wrongwrongwrongwrong").await;

    match client.fetch_blog_index().await {
        Err(AppError::NotionService { code, status, .. }) => {
            assert_eq!(code, NotionErrorCode::Unauthorized);
            assert_eq!(status.as_u16(), 401);
        }
        other => panic!("expected a Notion service error, got {:?}", other.map(|i| i.len())),
    }
}
