//! HTTP surface: the generation endpoint plus the language listing the UI
//! builds its selector from.

use crate::generate::{GenerateRequest, GenerateResponse, RawGenerateRequest};
use crate::languages::LanguageRegistry;
use crate::openrouter::CompletionGateway;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn CompletionGateway>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/languages", get(languages_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Registry listing, so clients never hardcode the language set.
async fn languages_handler() -> Json<serde_json::Value> {
    let languages: Vec<_> = LanguageRegistry::get()
        .list_all()
        .iter()
        .map(|lang| json!({ "id": lang.code, "label": lang.label }))
        .collect();
    Json(json!(languages))
}

/// POST /api/generate: validate, call the provider, reshape the response.
///
/// Validation failures are the client's problem (400, fixed message, upstream
/// never called); anything that goes wrong past validation is a 500 with a
/// generic message plus detail.
async fn generate_handler(
    State(state): State<AppState>,
    Json(raw): Json<RawGenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, Json<serde_json::Value>)> {
    let request = GenerateRequest::from_raw(raw).map_err(|e| {
        debug!("Rejected generation request: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Prompt and language are required" })),
        )
    })?;

    let response = state.gateway.generate(&request).await.map_err(|e| {
        error!("Code generation failed: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to generate code", "details": e.detail })),
        )
    })?;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openrouter::GenerationFailed;
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Helpers ====================

    struct FakeGateway {
        outcome: Result<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionGateway for FakeGateway {
        async fn generate(
            &self,
            _request: &GenerateRequest,
        ) -> Result<GenerateResponse, GenerationFailed> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(code) => Ok(GenerateResponse { code: code.clone() }),
                Err(detail) => Err(GenerationFailed {
                    detail: detail.clone(),
                }),
            }
        }
    }

    /// Serve the router on an ephemeral port and return its address.
    async fn spawn_app(gateway: Arc<FakeGateway>) -> SocketAddr {
        let app = router(AppState { gateway });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        addr
    }

    fn ok_gateway(code: &str) -> Arc<FakeGateway> {
        Arc::new(FakeGateway {
            outcome: Ok(code.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing_gateway(detail: &str) -> Arc<FakeGateway> {
        Arc::new(FakeGateway {
            outcome: Err(detail.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    // ==================== /api/generate Tests ====================

    #[tokio::test]
    async fn test_generate_success() {
        let gateway = ok_gateway("print('hi')");
        let addr = spawn_app(Arc::clone(&gateway)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/generate", addr))
            .json(&serde_json::json!({ "prompt": "say hi", "language": "python" }))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.expect("json");
        assert_eq!(body, serde_json::json!({ "code": "print('hi')" }));
    }

    #[tokio::test]
    async fn test_generate_missing_fields_is_400() {
        let gateway = ok_gateway("unused");
        let addr = spawn_app(Arc::clone(&gateway)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/generate", addr))
            .json(&serde_json::json!({}))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.expect("json");
        assert_eq!(
            body,
            serde_json::json!({ "error": "Prompt and language are required" })
        );
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_whitespace_prompt_never_calls_gateway() {
        let gateway = ok_gateway("unused");
        let addr = spawn_app(Arc::clone(&gateway)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/generate", addr))
            .json(&serde_json::json!({ "prompt": "   \n ", "language": "python" }))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_unsupported_language_is_400() {
        let gateway = ok_gateway("unused");
        let addr = spawn_app(Arc::clone(&gateway)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/generate", addr))
            .json(&serde_json::json!({ "prompt": "hello", "language": "brainfuck" }))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 400);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generate_gateway_failure_is_500_with_details() {
        let gateway = failing_gateway("provider error (401): bad key");
        let addr = spawn_app(Arc::clone(&gateway)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/generate", addr))
            .json(&serde_json::json!({ "prompt": "hello", "language": "cpp" }))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 500);
        let body: serde_json::Value = response.json().await.expect("json");
        assert_eq!(body["error"], "Failed to generate code");
        assert_eq!(body["details"], "provider error (401): bad key");
    }

    #[tokio::test]
    async fn test_generate_empty_code_is_success() {
        let gateway = ok_gateway("");
        let addr = spawn_app(Arc::clone(&gateway)).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/api/generate", addr))
            .json(&serde_json::json!({ "prompt": "hello", "language": "python" }))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.expect("json");
        assert_eq!(body, serde_json::json!({ "code": "" }));
    }

    // ==================== Listing Tests ====================

    #[tokio::test]
    async fn test_languages_listing_matches_registry() {
        let addr = spawn_app(ok_gateway("unused")).await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/api/languages", addr))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.expect("json");
        assert_eq!(
            body,
            serde_json::json!([
                { "id": "python", "label": "Python" },
                { "id": "javascript", "label": "JavaScript" },
                { "id": "cpp", "label": "C++" }
            ])
        );
    }

    #[tokio::test]
    async fn test_health() {
        let addr = spawn_app(ok_gateway("unused")).await;

        let response = reqwest::Client::new()
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .expect("request");

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.expect("json");
        assert_eq!(body["status"], "ok");
    }
}
