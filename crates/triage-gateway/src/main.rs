//! Helpdesk triage gateway. `POST /analyze` runs the triage pipeline on a free-text ticket.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use triage_core::{TriageConfig, TriagePipeline};

#[derive(Clone)]
struct AppState {
    pipeline: Arc<TriagePipeline>,
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    ticket: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TriageConfig::load().map_err(|e| {
        tracing::error!("failed to load configuration: {}", e);
        e
    })?;

    tracing::info!(
        version = triage_core::version(),
        kb_dir = %config.kb_dir.display(),
        model = %config.llm_model,
        classifier = ?config.classifier,
        dispatch = config.dispatch_url.as_deref().unwrap_or("placeholder"),
        "triage configuration loaded"
    );

    let state = AppState {
        pipeline: Arc::new(TriagePipeline::from_config(&config)),
    };
    let app = router(state, config.static_dir.as_deref());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Ticket triage gateway listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/", get(serve_index))
        .route("/analyze", post(analyze_handler));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    tracing::debug!(target: "triage::gateway", method = %request.method(), path = %request.uri().path(), "request");
    next.run(request).await
}

async fn health() -> &'static str {
    "OK"
}

async fn serve_index() -> Html<&'static str> {
    const INDEX: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/index.html"));
    Html(INDEX)
}

/// Internal detail is logged, never returned.
async fn analyze_handler(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Response {
    match state.pipeline.submit_ticket(&body.ticket).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!(target: "triage::gateway", error = %e, "ticket triage failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tower::ServiceExt;
    use triage_core::{KnowledgeBase, LlmError, TextClassifier};

    struct FixedClassifier(&'static str);

    #[async_trait]
    impl TextClassifier for FixedClassifier {
        async fn classify_label(&self, _: &str, _: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn test_app(kb_dir: &Path, label: &'static str) -> Router {
        let pipeline = TriagePipeline::new(KnowledgeBase::new(kb_dir))
            .with_classifier(Arc::new(FixedClassifier(label)));
        router(
            AppState {
                pipeline: Arc::new(pipeline),
            },
            None,
        )
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn analyze_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_ok() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = test_app(dir.path(), "TBD").oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn index_serves_form() {
        let dir = tempfile::tempdir().unwrap();
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let res = test_app(dir.path(), "TBD").oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/analyze"));
    }

    #[tokio::test]
    async fn analyze_returns_client_fields() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("kb_m365_productivity.txt"),
            "Q: How do I reset my Outlook password?\nA: Go to Settings > Security.\n",
        )
        .unwrap();
        let app = test_app(dir.path(), "M365 & Productivity");

        let res = app
            .oneshot(analyze_request(r#"{"ticket":"How do I reset my Outlook password?"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = body_json(res).await;
        assert_eq!(json["assigned_priority"], "Low");
        assert_eq!(json["assigned_category"], "M365 & Productivity");
        assert_eq!(json["routed_to"], "M365 & Productivity Specialist");
        assert!(json["justification"].as_str().is_some_and(|s| !s.is_empty()));
        assert_eq!(json["answer"], "Go to Settings > Security.");
        assert_eq!(json["answer_source"], "knowledge_base");
    }

    #[tokio::test]
    async fn missing_ticket_field_is_empty_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let res = test_app(dir.path(), "TBD")
            .oneshot(analyze_request("{}"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["assigned_priority"], "Low");
        assert_eq!(json["assigned_category"], "TBD");
        assert_eq!(json["answer"], triage_core::UNAVAILABLE_MARKER);
    }

    #[tokio::test]
    async fn pipeline_failure_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kb_cybersecurity.txt"), [0xff, 0xfe]).unwrap();
        let res = test_app(dir.path(), "Cybersecurity")
            .oneshot(analyze_request(r#"{"ticket":"phishing"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(res).await;
        assert_eq!(json, serde_json::json!({ "error": "Internal Server Error" }));
    }
}
