use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use blog_api::models::{CommentWriteRequest, ImageUpload};
use blog_api::repository::AdminPostFilter;
use blog_api::{
    BlogClient, ClientConfig, GateState, GateUi, KeyValueStore, MemoryStore, SESSION_KEY,
    SessionRecord,
};
use serde_json::{Value, json};

const SESSION_ID: &str = "xyz";

async fn spawn_server() -> String {
    let router = Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/single", get(missing_post))
        .route("/api/categories/stats", get(bad_gateway))
        .route("/api/comments", post(write_comment))
        .route("/api/admin/images", post(upload_image))
        .route("/api/admin/posts", get(admin_posts))
        .route("/api/auth/login", post(login))
        .route("/api/auth/session", get(check_session))
        .route("/api/logout", post(logout))
        .route("/api/posts/category", get(slow_category_page));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener must bind");
    let addr = listener.local_addr().expect("local addr must exist");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test server must run");
    });
    format!("http://{addr}")
}

async fn list_posts(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or_default();
    Json(json!({
        "content": [
            { "id": 1, "title": "first", "status": "PUBLISHED", "views": 10 },
            { "id": 2, "title": "second", "status": "PUBLISHED" }
        ],
        "pageNumber": page,
        "pageSize": 2,
        "totalElements": 5,
        "totalPages": 3,
        "first": page == 0,
        "last": page == 2
    }))
}

async fn missing_post() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not Found", "statusCode": 404 })),
    )
        .into_response()
}

async fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "upstream is down").into_response()
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn write_comment(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if content_type(&headers) != "application/json" {
        return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
    }
    if body["content"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Bad Request",
                "statusCode": 400,
                "code": "COMMENT_INVALID",
                "validation": { "content": "content must not be empty" }
            })),
        )
            .into_response();
    }
    Json(json!({ "id": 11, "content": body["content"], "postId": body["postId"] })).into_response()
}

async fn upload_image(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": content_type(&headers),
        "publicId": "posts/cat"
    }))
}

async fn admin_posts() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthorized", "statusCode": 401 })),
    )
        .into_response()
}

async fn login() -> Response {
    (
        [(header::SET_COOKIE, format!("SESSION={SESSION_ID}; Path=/; HttpOnly"))],
        Json(json!({ "userId": 5, "username": "admin", "message": "welcome" })),
    )
        .into_response()
}

async fn check_session(headers: HeaderMap) -> Response {
    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|cookies| cookies.contains(&format!("SESSION={SESSION_ID}")));
    if has_session {
        Json(json!({ "authenticated": true })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn logout() -> Json<Value> {
    Json(json!({ "success": true, "message": "bye" }))
}

async fn slow_category_page() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({}))
}

#[derive(Default)]
struct RecordingUi {
    events: Mutex<Vec<String>>,
}

impl RecordingUi {
    fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }
}

impl GateUi for RecordingUi {
    fn warn(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("warn:{message}"));
    }

    fn redirect(&self, path: &str) {
        self.events.lock().expect("lock").push(format!("redirect:{path}"));
    }
}

async fn client(base_url: &str, storage: Arc<MemoryStore>) -> BlogClient {
    let config = ClientConfig::new(base_url).expect("config must be valid");
    BlogClient::connect(config, storage)
        .await
        .expect("client must connect")
}

#[tokio::test]
async fn fetches_and_maps_a_page() {
    let base_url = spawn_server().await;
    let client = client(&base_url, Arc::new(MemoryStore::new())).await;

    let page = client.posts().page(1, 2).await.expect("page must load");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "first");
    assert_eq!(page.page_number, 1);
    assert_eq!(page.total_elements, 5);
    assert!(!page.is_first);
    assert!(!page.is_last);
}

#[tokio::test]
async fn server_error_shape_is_copied() {
    let base_url = spawn_server().await;
    let client = client(&base_url, Arc::new(MemoryStore::new())).await;

    let err = client.posts().single(99).await.expect_err("post must be missing");
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.message(), "Not Found");
    assert!(err.validation().is_empty());
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_table() {
    let base_url = spawn_server().await;
    let client = client(&base_url, Arc::new(MemoryStore::new())).await;

    let err = client
        .categories()
        .list_with_count()
        .await
        .expect_err("must fail");
    assert_eq!(err.status_code(), 502);
    assert_eq!(err.message(), "upstream unreachable");
}

#[tokio::test]
async fn json_post_carries_json_content_type_and_validation_errors() {
    let base_url = spawn_server().await;
    let client = client(&base_url, Arc::new(MemoryStore::new())).await;

    let mut request = CommentWriteRequest {
        content: "hello".to_string(),
        email: "a@example.com".to_string(),
        password: "pw".to_string(),
        post_id: 7,
        parent_id: None,
    };
    let comment = client
        .comments()
        .write(&request)
        .await
        .expect("comment must be written");
    assert_eq!(comment.id, 11);
    assert_eq!(comment.post_id, 7);

    request.content.clear();
    let err = client
        .comments()
        .write(&request)
        .await
        .expect_err("empty comment must be rejected");
    assert_eq!(err.code(), Some("COMMENT_INVALID"));
    assert_eq!(
        err.notice(),
        "400 - Bad Request\nvalidation: content must not be empty"
    );
}

#[tokio::test]
async fn multipart_upload_lets_transport_set_boundary() {
    let base_url = spawn_server().await;
    let client = client(&base_url, Arc::new(MemoryStore::new())).await;

    let response = client
        .images()
        .upload(&ImageUpload {
            file_name: "cat.png".to_string(),
            mime: Some("image/png".to_string()),
            bytes: Some(vec![0x89, 0x50, 0x4e, 0x47]),
            folder: Some("posts".to_string()),
        })
        .await
        .expect("upload must succeed");

    assert!(response.success);
    assert!(response.message.starts_with("multipart/form-data; boundary="));
    assert!(!response.message.contains("application/json"));
}

#[tokio::test]
async fn login_persists_session_across_restart() {
    let base_url = spawn_server().await;
    let storage = Arc::new(MemoryStore::new());

    let first = client(&base_url, storage.clone()).await;
    let response = first.login("admin", "secret").await.expect("login must succeed");
    assert_eq!(response.user_id, 5);
    assert_eq!(
        first.session().current().await,
        Some(SessionRecord::new(SESSION_ID, 5))
    );

    let restarted = client(&base_url, storage.clone()).await;
    assert_eq!(
        restarted.session().current().await,
        Some(SessionRecord::new(SESSION_ID, 5))
    );

    let ui = Arc::new(RecordingUi::default());
    let gate = restarted.gate(ui.clone());
    assert!(gate.verify().await);
    assert_eq!(gate.state(), GateState::Authenticated);
    assert!(ui.events().is_empty());

    restarted.logout().await.expect("logout must succeed");
    assert!(restarted.session().current().await.is_none());
    assert!(storage.get(SESSION_KEY).await.expect("get must succeed").is_none());
}

#[tokio::test]
async fn stale_session_is_cleared_by_gate() {
    let base_url = spawn_server().await;
    let storage = Arc::new(MemoryStore::new());
    storage
        .set(SESSION_KEY, r#"{"sessionId":"stale","userId":5}"#)
        .await
        .expect("set must succeed");

    let client = client(&base_url, storage.clone()).await;
    assert!(client.session().is_authenticated().await);

    let ui = Arc::new(RecordingUi::default());
    let gate = client.gate(ui.clone());
    assert!(!gate.verify().await);
    assert_eq!(gate.state(), GateState::Unauthenticated);
    assert!(client.session().current().await.is_none());
    assert!(storage.get(SESSION_KEY).await.expect("get must succeed").is_none());
    assert_eq!(
        ui.events(),
        vec![
            "warn:session expired, please log in again".to_string(),
            "redirect:/admin/login".to_string(),
        ]
    );
}

#[tokio::test]
async fn unauthorized_response_drops_session_and_still_fails() {
    let base_url = spawn_server().await;
    let storage = Arc::new(MemoryStore::new());
    let client = client(&base_url, storage.clone()).await;
    client
        .session()
        .save(SessionRecord::new("abc", 1))
        .await
        .expect("save must succeed");

    let err = client
        .posts()
        .admin_page(&AdminPostFilter::default(), 0, 10)
        .await
        .expect_err("must be unauthorized");

    assert_eq!(err.status_code(), 401);
    assert_eq!(err.message(), "Unauthorized");
    assert!(client.session().current().await.is_none());
    assert!(storage.get(SESSION_KEY).await.expect("get must succeed").is_none());
}

#[tokio::test]
async fn timeout_is_reported_like_a_failed_response() {
    let base_url = spawn_server().await;
    let config = ClientConfig::new(&base_url)
        .expect("config must be valid")
        .with_timeout(Duration::from_millis(200))
        .expect("timeout must be valid");
    let client = BlogClient::connect(config, Arc::new(MemoryStore::new()))
        .await
        .expect("client must connect");

    let err = client
        .posts()
        .category_page("slow", 0, 10)
        .await
        .expect_err("request must time out");
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.message(), "internal server error");
}

#[tokio::test]
async fn connection_failure_is_normalized() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener must bind");
    let addr = listener.local_addr().expect("local addr must exist");
    drop(listener);

    let client = client(&format!("http://{addr}"), Arc::new(MemoryStore::new())).await;
    let err = client.posts().page(0, 10).await.expect_err("must fail");
    assert_eq!(err.status_code(), 500);
    assert!(err.validation().is_empty());
}
