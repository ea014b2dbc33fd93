//! Axum router configuration with middleware.
//!
//! Chat routes live under `/api/`. Middleware: CORS, tracing.
//!
//! The built front-end is served from `client/dist/` (configurable via
//! `GUCHAT_WEB_DIR`). API routes take priority; unknown paths fall through
//! to the front-end's `index.html`. If the directory does not exist, only
//! the API is served.

use std::path::Path;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router, including static front-end serving when
/// the web directory exists.
pub fn build_router(state: AppState) -> Router {
    let web_dir =
        std::env::var("GUCHAT_WEB_DIR").unwrap_or_else(|_| "client/dist".to_string());
    let router = build_api_router(state);

    if Path::new(&web_dir).exists() {
        tracing::info!(path = %web_dir, "Static front-end serving enabled");
        serve_static(router, Path::new(&web_dir))
    } else {
        router
    }
}

/// API routes and `/health` with middleware, no static files.
pub fn build_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", post(handlers::chat::send_message))
        .route(
            "/chat/{session_id}",
            get(handlers::chat::get_history).delete(handlers::chat::clear_history),
        )
        .route(
            "/chat/{session_id}/export",
            get(handlers::chat::export_history),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Fall back to files under `web_dir`, then to its `index.html`.
fn serve_static(router: Router, web_dir: &Path) -> Router {
    let serve_dir = ServeDir::new(web_dir).fallback(ServeFile::new(web_dir.join("index.html")));
    router.fallback_service(serve_dir)
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.chat_service.repo().backend().to_string(),
        "provider": state.chat_service.provider().name(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use guchat_types::llm::LlmError;

    use super::*;
    use crate::http::error::GENERATION_FAILED;
    use crate::state::testing::state_with;

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    async fn send_json(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(router, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_round_trip() {
        let state = state_with(vec![Ok("Greetings, mortal.".to_string())]);

        let (status, body) = send_json(
            build_api_router(state.clone()),
            post_chat(r#"{"sessionId":"s1","message":"Hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"], "Greetings, mortal.");
        assert!(body["messageId"].is_string());
        assert!(body["timestamp"].is_string());

        let (status, body) = send_json(build_api_router(state), get("/api/chat/s1")).await;
        assert_eq!(status, StatusCode::OK);
        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["text"], "Hi");
        assert_eq!(history[0]["isUser"], true);
        assert_eq!(history[0]["sessionId"], "s1");
        assert_eq!(history[1]["text"], "Greetings, mortal.");
        assert_eq!(history[1]["isUser"], false);
    }

    #[tokio::test]
    async fn test_generator_failure_keeps_user_message() {
        let state = state_with(vec![Err(LlmError::Provider {
            message: "upstream 503".to_string(),
        })]);

        let (status, body) = send_json(
            build_api_router(state.clone()),
            post_chat(r#"{"sessionId":"s1","message":"Hi"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], GENERATION_FAILED);
        assert_eq!(body["code"], "GENERATION_FAILED");

        let (_, body) = send_json(build_api_router(state), get("/api/chat/s1")).await;
        let history = body["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["isUser"], true);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected() {
        let state = state_with(vec![]);

        for body in [
            r#"{"sessionId":"s1"}"#,
            r#"{"message":"Hi"}"#,
            r#"{"sessionId":"","message":"Hi"}"#,
            "not json",
        ] {
            let (status, json) = send_json(build_api_router(state.clone()), post_chat(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(json["error"], "Session ID and message are required");
        }

        let (_, body) = send_json(build_api_router(state), get("/api/chat/s1")).await;
        assert!(body["history"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_empty_session_succeeds() {
        let state = state_with(vec![]);
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/chat/never-used")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send_json(build_api_router(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_clear_removes_history() {
        let state = state_with(vec![Ok("Speak.".to_string())]);
        send(
            build_api_router(state.clone()),
            post_chat(r#"{"sessionId":"s1","message":"Hi"}"#),
        )
        .await;

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/chat/s1")
            .body(Body::empty())
            .unwrap();
        send(build_api_router(state.clone()), request).await;

        let (_, body) = send_json(build_api_router(state), get("/api/chat/s1")).await;
        assert!(body["history"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export() {
        let state = state_with(vec![Ok("Greetings, mortal.".to_string())]);

        let (status, body) =
            send_json(build_api_router(state.clone()), get("/api/chat/s1/export")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No conversation history to export");

        send(
            build_api_router(state.clone()),
            post_chat(r#"{"sessionId":"s1","message":"Hi"}"#),
        )
        .await;

        let response = build_api_router(state)
            .oneshot(get("/api/chat/s1/export"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"fang-yuan-chat-"));
        assert!(disposition.ends_with(".txt\""));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "You: Hi\n\nFang Yuan: Greetings, mortal."
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send_json(build_api_router(state_with(vec![])), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "memory");
        assert_eq!(body["provider"], "stub");
    }

    #[tokio::test]
    async fn test_static_fallback_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>gu</html>").unwrap();

        let router = serve_static(build_api_router(state_with(vec![])), dir.path());
        let (status, body) = send(router.clone(), get("/some/client/route")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<html>gu</html>");

        // API routes still win.
        let (status, _) = send(router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
