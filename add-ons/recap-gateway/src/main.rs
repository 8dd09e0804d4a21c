//! Axum-based HTTP gateway for Recap: transcript summarization, upload
//! decoding, and email sharing. Config-driven via AppConfig; the
//! summarization strategy and mail transport are trait objects picked at
//! boot, so handlers never know which implementation is wired in.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use recap_core::{
    build_share_email, decode_upload, sync_env_template, AppConfig, HeuristicSummarizer,
    MailTransport, MailerConfig, RemoteModelSummarizer, SmtpMailer, Summarizer, SummarizerMode,
    UploadedText, MAX_UPLOAD_BYTES,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
    summarizer: Arc<dyn Summarizer>,
    mailer: Arc<dyn MailTransport>,
}

#[tokio::main]
async fn main() {
    // Load .env first; SMTP credentials and the model key stay backend-only.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[recap-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Add missing keys from .env.example to .env (never overwrite existing).
    if let Ok(cwd) = std::env::current_dir() {
        let template = cwd.join(".env.example");
        let live = cwd.join(".env");
        if template.exists() {
            if let (Some(template), Some(live)) = (template.to_str(), live.to_str()) {
                if let Ok(added) = sync_env_template(template, live) {
                    if added > 0 {
                        tracing::info!(
                            "Env sync: added {} new configuration key(s) from .env.example",
                            added
                        );
                    }
                }
            }
        }
    }

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[recap-gateway] config load failed: {e}");
            std::process::exit(1);
        }
    };

    let summarizer: Arc<dyn Summarizer> = match config.strategy_mode() {
        SummarizerMode::Remote => Arc::new(RemoteModelSummarizer::from_env()),
        SummarizerMode::Heuristic => Arc::new(HeuristicSummarizer),
    };
    tracing::info!("Summarization strategy: {}", summarizer.name());

    let mailer: Arc<dyn MailTransport> = match SmtpMailer::new(&MailerConfig::from_env()) {
        Ok(m) => Arc::new(m),
        Err(e) => {
            eprintln!("[recap-gateway] mail transport setup failed: {e}");
            std::process::exit(1);
        }
    };

    let port = config.port;
    let app = build_app(AppState {
        config: Arc::new(config),
        summarizer,
        mailer,
    });

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("recap-gateway listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn build_app(state: AppState) -> Router {
    let frontend_enabled = state.config.frontend_enabled;

    // CORS: the form client may run on a dev server on another local port.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &axum::http::HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            if s == "http://localhost:3000" || s == "http://127.0.0.1:3000" {
                return true;
            }
            let port = s
                .split(':')
                .last()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            (3000..=3099).contains(&port) || (5000..=5099).contains(&port)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/summarize", post(summarize_post))
        .route("/api/share", post(share_post))
        .route("/api/upload", post(upload_post))
        .fallback(route_not_found)
        // The 10MB ceiling itself is checked in upload_post against the file
        // bytes; the body cap only needs to admit the multipart framing.
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state);

    if frontend_enabled {
        let frontend_dir = frontend_root_dir();
        let index_file = frontend_dir.join("index.html");

        // Map `/` -> `frontend/index.html`, `/ui/*` -> `frontend/*`.
        app = app.route_service("/", ServeFile::new(index_file));
        app = app.nest_service("/ui", ServeDir::new(frontend_dir));
    }

    app.layer(cors)
}

fn frontend_root_dir() -> std::path::PathBuf {
    std::env::var("RECAP_FRONTEND_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("frontend"))
}

/// GET /api/health – liveness check.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "message": format!("{} is running", state.config.app_name),
    }))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizeRequest {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    custom_instructions: String,
}

/// POST /api/summarize – validates the transcript, runs the configured
/// summarization strategy, and returns the summary. Trimming happens only
/// in the emptiness check: the summarizer sees the transcript verbatim, so
/// a short transcript round-trips unchanged, padding included.
async fn summarize_post(
    State(state): State<AppState>,
    Json(body): Json<SummarizeRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    if body.transcript.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Transcript is required" })),
        );
    }

    match state
        .summarizer
        .summarize(&body.transcript, &body.custom_instructions)
        .await
    {
        Ok(summary) => {
            tracing::info!(strategy = state.summarizer.name(), "summary generated");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "success": true, "summary": summary })),
            )
        }
        Err(e) => {
            tracing::error!("summarization failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to generate summary",
                    "details": e.to_string(),
                })),
            )
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareRequest {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    recipients: Vec<String>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    sender_name: Option<String>,
}

/// POST /api/share – builds the share email and hands it to the mail
/// transport. Validation failures never reach the transport; a transport
/// failure surfaces its detail, with no retry.
async fn share_post(
    State(state): State<AppState>,
    Json(body): Json<ShareRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    let email = match build_share_email(
        &body.summary,
        &body.recipients,
        body.subject.as_deref(),
        body.sender_name.as_deref(),
    ) {
        Ok(email) => email,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
        }
    };

    match state.mailer.send(&email).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Summary shared successfully",
            })),
        ),
        Err(e) => {
            tracing::error!("share failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Failed to share summary",
                    "details": e.to_string(),
                })),
            )
        }
    }
}

/// POST /api/upload – multipart `file` field, decoded as UTF-8 text. The
/// summarizer is never invoked here; the client pastes the returned content
/// into the transcript field itself.
async fn upload_post(mut multipart: Multipart) -> (StatusCode, Json<serde_json::Value>) {
    let mut uploaded: Option<UploadedText> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let filename = field.file_name().unwrap_or("upload.txt").to_string();
                let bytes = match field.bytes().await {
                    Ok(b) => b,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(serde_json::json!({
                                "error": "Failed to process file",
                                "details": e.to_string(),
                            })),
                        )
                    }
                };
                match decode_upload(&filename, &bytes) {
                    Ok(u) => {
                        uploaded = Some(u);
                        break;
                    }
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(serde_json::json!({ "error": e.to_string() })),
                        )
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": "Failed to process file",
                        "details": e.to_string(),
                    })),
                )
            }
        }
    }

    match uploaded {
        Some(u) => {
            tracing::info!(filename = %u.filename, bytes = u.content.len(), "file decoded");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "success": true,
                    "content": u.content,
                    "filename": u.filename,
                })),
            )
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "No file uploaded" })),
        ),
    }
}

/// Any unmatched route – 404 in the same JSON envelope as the API proper.
async fn route_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Route not found" })),
    )
}
