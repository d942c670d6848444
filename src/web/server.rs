use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use crate::cli::{load_corpus, ServeArgs};
use crate::core::fragment::Fragment;
use crate::corpus::store::CorpusStore;
use crate::matching::engine::{MatchingConfig, MatchingEngine};
use crate::parsing::signs::count_signs;
use crate::utils::validation::{
    validate_annotation, validate_max_signs, ValidationError, MAX_ANNOTATION_BYTES,
};

/// Request bodies may carry JSON escaping on top of the annotation itself
pub const MAX_REQUEST_BODY_BYTES: usize = 4 * MAX_ANNOTATION_BYTES;

/// Maximum number of requests processed at once
pub const MAX_CONCURRENT_REQUESTS: usize = 64;

/// Shared application state
pub struct AppState {
    pub corpus: CorpusStore,
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
}

/// Body of `POST /api/search`
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Raw sign annotation
    pub signs: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub min_signs: Option<usize>,
    #[serde(default)]
    pub max_signs: Option<usize>,
}

fn error_response(status: StatusCode, error_type: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            error_type: error_type.to_string(),
        }),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created, the corpus cannot
/// be loaded, or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let corpus = load_corpus(args.corpus.as_ref())?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args, corpus).await })
}

/// Create the application router with all routes and middleware configured.
pub fn create_router(corpus: CorpusStore) -> Router {
    let state = Arc::new(AppState { corpus });

    Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/search", post(search_handler))
        .route("/api/corpus", get(corpus_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES)),
        )
}

async fn run_server(args: ServeArgs, corpus: CorpusStore) -> anyhow::Result<()> {
    let chapters = corpus.len();
    let app = create_router(corpus);

    let addr = format!("{}:{}", args.address, args.port);
    info!(%addr, chapters, "Starting fragment-matcher web server");
    println!("Starting fragment-matcher web server at http://{addr}");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Score one annotation against the corpus
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Response {
    if let Err(e) = validate_annotation(&request.signs) {
        let status = match e {
            ValidationError::AnnotationTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ValidationError::BinaryContent | ValidationError::TooManySigns { .. } => {
                StatusCode::BAD_REQUEST
            }
        };
        return error_response(status, "invalid_annotation", e.to_string());
    }

    let defaults = MatchingConfig::default();
    let config = MatchingConfig {
        min_signs: request.min_signs.unwrap_or(defaults.min_signs),
        max_signs: request.max_signs.unwrap_or(defaults.max_signs),
        ..defaults
    };
    if let Err(e) = config.validate() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_configuration", e.to_string());
    }
    if let Err(e) = validate_max_signs(config.max_signs) {
        return error_response(StatusCode::BAD_REQUEST, "invalid_configuration", e.to_string());
    }

    let fragment = Fragment::new(
        request.id.unwrap_or_else(|| "query".to_string()),
        request.signs,
    )
    .with_notes(request.notes.unwrap_or_default());

    // Matching is CPU bound and fans out on the rayon pool
    let scored = tokio::task::spawn_blocking(move || {
        MatchingEngine::with_config(&state.corpus, config).score_fragment(&fragment)
    })
    .await;

    match scored {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(e)) => {
            tracing::error!("Matching failed: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "matching_error",
                "Matching failed",
            )
        }
        Err(e) => {
            tracing::error!("Matching task failed: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal error",
            )
        }
    }
}

/// Summary of the loaded corpus
async fn corpus_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let texts: Vec<serde_json::Value> = state
        .corpus
        .texts()
        .into_iter()
        .map(|t| serde_json::json!({ "id": t.id, "name": t.name }))
        .collect();

    let chapters: Vec<serde_json::Value> = state
        .corpus
        .chapters
        .iter()
        .map(|c| {
            serde_json::json!({
                "id": c.id,
                "text_id": c.text_id,
                "name": c.name,
                "stage": c.stage,
                "sign_count": count_signs(&c.signs),
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": chapters.len(),
        "texts": texts,
        "chapters": chapters,
    }))
}
