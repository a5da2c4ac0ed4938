use super::*;
use axum::{
    body::{self, Body, Bytes},
    extract::Request as ExtractedRequest,
    http::{header, Request, StatusCode},
    response::IntoResponse,
    routing::post,
};
use config::Settings;
use tokio::net::TcpListener;
use tower::ServiceExt;

const LIMIT: usize = 1024;

/// Echoes what the backend saw: method, path, query, and body length.
async fn echo(request: ExtractedRequest) -> impl IntoResponse {
    let method = request.method().clone();
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = body::to_bytes(request.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    format!("{method} {path_and_query} host={host} len={}", body.len())
}

async fn synthesize() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "audio/wav")], Bytes::from_static(b"RIFFwav"))
}

async fn reject() -> impl IntoResponse {
    (StatusCode::UNPROCESSABLE_ENTITY, "text_input is required")
}

async fn spawn_backend() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let router = Router::new()
        .route("/generate-tts", post(synthesize))
        .route("/reject", post(reject))
        .fallback(echo);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

async fn unreachable_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

fn test_app(backend_url: String) -> Router {
    let settings = Settings {
        backend_url,
        ..Settings::default()
    };
    let state = AppState::from_settings(&settings).expect("state");
    build_router(Arc::new(state), LIMIT)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8_lossy(&bytes).into_owned()
}

#[tokio::test]
async fn healthz_answers_locally() {
    let app = test_app(unreachable_backend().await);
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn generate_request_is_forwarded_without_the_prefix() {
    let app = test_app(spawn_backend().await);
    let request = Request::post("/api/generate-tts")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
        .body(Body::from("--x--\r\n"))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("audio/wav")
    );
    assert_eq!(body_text(response).await, "RIFFwav");
}

#[tokio::test]
async fn query_and_method_survive_and_host_is_rewritten() {
    let backend = spawn_backend().await;
    let backend_host = backend.trim_start_matches("http://").to_string();
    let app = test_app(backend);
    let request = Request::get("/api/voices?lang=it&page=2")
        .header(header::HOST, "127.0.0.1:5173")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        format!("GET /voices?lang=it&page=2 host={backend_host} len=0")
    );
}

#[tokio::test]
async fn bare_prefix_maps_to_the_backend_root() {
    let app = test_app(spawn_backend().await);
    let request = Request::get("/api").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.starts_with("GET / "));
}

#[tokio::test]
async fn backend_errors_are_relayed_verbatim() {
    let app = test_app(spawn_backend().await);
    let request = Request::post("/api/reject").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_text(response).await, "text_input is required");
}

#[tokio::test]
async fn unreachable_backend_is_a_bad_gateway() {
    let app = test_app(unreachable_backend().await);
    let request = Request::get("/api/").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn paths_outside_the_prefix_are_not_found() {
    let app = test_app(spawn_backend().await);
    for path in ["/generate-tts", "/apix/generate-tts"] {
        let request = Request::post(path).body(Body::empty()).expect("request");
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let app = test_app(spawn_backend().await);
    let request = Request::post("/api/generate-tts")
        .header(header::CONTENT_LENGTH, LIMIT + 1)
        .body(Body::from(vec![0u8; LIMIT + 1]))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
