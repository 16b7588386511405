//! HTTP server for the energy explorer dashboard.
//!
//! Serves the analytics API and the static frontend bundle. The dataset is
//! loaded once before the listener starts and shared read-only.
//!
//! # API Endpoints
//!
//! | Method | Path             | Description                          |
//! |--------|------------------|--------------------------------------|
//! | GET    | `/health`        | Health check with dataset shape      |
//! | GET    | `/api/dataset`   | Overview: shape, source, head, stats |
//! | GET    | `/api/entities`  | Entity names in first-seen order     |
//! | GET    | `/api/features`  | Field glossary                       |
//! | POST   | `/api/report`    | ViewState -> report                  |
//! | POST   | `/api/interact`  | {state, event} -> {state, report}    |
//! | GET    | `/api/logs`      | SSE stream of server activity        |
//! | GET    | `/*`             | Static files                         |

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use super::logs::{log_error, log_info, log_info_indent, LOG_BROADCASTER};
use super::types::{error_response, EntitiesResponse, InteractRequest, ReportResponse};
use crate::config::Settings;
use crate::dataset::Dataset;
use crate::error::{QueryError, ServerError, ServerResult};
use crate::query::{entities, overview, Overview};
use crate::report::{build_report, glossary, FieldInfo, ViewState};

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Load the dataset and serve until the process is stopped.
pub async fn start_server(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Arc::new(Dataset::load(&settings.data_path)?);
    let app = router(dataset, &settings.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    println!("🚀 Energy explorer running on http://localhost:{}", settings.port);
    log_info_indent("GET  /api/dataset   - Dataset overview", 1);
    log_info_indent("GET  /api/entities  - Entity list", 1);
    log_info_indent("GET  /api/features  - Field glossary", 1);
    log_info_indent("POST /api/report    - Report for a view state", 1);
    log_info_indent("POST /api/interact  - Apply an event and report", 1);
    log_info_indent("GET  /api/logs      - SSE log stream", 1);
    log_info_indent(format!("GET  /*            - Static files from {}", settings.static_dir.display()), 1);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router around a loaded dataset.
pub fn router(dataset: Arc<Dataset>, static_dir: impl AsRef<Path>) -> Router {
    // Permissive CORS so the dev frontend can run on another port.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/dataset", get(dataset_overview))
        .route("/api/entities", get(list_entities))
        .route("/api/features", get(list_features))
        .route("/api/report", post(report))
        .route("/api/interact", post(interact))
        .route("/api/logs", get(sse_logs))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors)
        .with_state(dataset)
}

// =============================================================================
// Handlers
// =============================================================================

async fn health(State(dataset): State<Arc<Dataset>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "energy-explorer",
        "version": env!("CARGO_PKG_VERSION"),
        "dataset": {
            "rows": dataset.len(),
            "columns": dataset.column_count()
        }
    }))
}

async fn dataset_overview(State(dataset): State<Arc<Dataset>>) -> Json<Overview> {
    Json(overview(&dataset))
}

async fn list_entities(State(dataset): State<Arc<Dataset>>) -> Json<EntitiesResponse> {
    let entities: Vec<String> = entities(&dataset).into_iter().map(str::to_string).collect();
    Json(EntitiesResponse {
        count: entities.len(),
        entities,
    })
}

async fn list_features() -> Json<Vec<FieldInfo>> {
    Json(glossary())
}

async fn report(State(dataset): State<Arc<Dataset>>, Json(body): Json<Value>) -> ApiResult<ReportResponse> {
    let state: ViewState = parse_body(body).map_err(reject)?;
    render(dataset, state).await.map(Json).map_err(reject)
}

async fn interact(State(dataset): State<Arc<Dataset>>, Json(body): Json<Value>) -> ApiResult<ReportResponse> {
    let request: InteractRequest = parse_body(body).map_err(reject)?;
    let next = request.state.apply(request.event);
    render(dataset, next).await.map(Json).map_err(reject)
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip the missed entries.
    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

// =============================================================================
// Helpers
// =============================================================================

/// Build the report off the async runtime; the map view touches every row.
async fn render(dataset: Arc<Dataset>, state: ViewState) -> ServerResult<ReportResponse> {
    let response = tokio::task::spawn_blocking(move || {
        build_report(&dataset, &state).map(|report| ReportResponse::new(state, report))
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))??;

    log_info(format!(
        "Report '{}' with {} panel(s) [{}]",
        response.report.title,
        response.report.panels.len(),
        response.request_id
    ));
    Ok(response)
}

fn parse_body<T: DeserializeOwned>(body: Value) -> ServerResult<T> {
    serde_json::from_value(body).map_err(|e| ServerError::BadRequest(e.to_string()))
}

fn status_code(err: &ServerError) -> StatusCode {
    match err {
        ServerError::Query(QueryError::UnknownEntity(_)) => StatusCode::NOT_FOUND,
        ServerError::Query(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Dataset(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ServerError) -> ApiError {
    let message = err.to_string();
    log_error(&message);
    (status_code(&err), Json(error_response(&message)))
}
