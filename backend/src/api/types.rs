//! REST API types shared with the dashboard frontend.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::report::{Report, ViewEvent, ViewState};

/// Body of `POST /api/interact`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractRequest {
    /// Previous state; omitted means the default view.
    #[serde(default)]
    pub state: ViewState,
    pub event: ViewEvent,
}

/// Report for a view, tagged with a request id for log correlation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub request_id: String,
    pub state: ViewState,
    pub report: Report,
}

impl ReportResponse {
    pub fn new(state: ViewState, report: Report) -> Self {
        Self {
            request_id: new_request_id(),
            state,
            report,
        }
    }
}

/// Body of `GET /api/entities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitiesResponse {
    pub count: usize,
    pub entities: Vec<String>,
}

pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "requestId": new_request_id(),
        "status": "error",
        "error": error,
    })
}
