//! HTTP client for the report API.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::config::BACKEND_URL;
use crate::types::{
    AppError, AppResult, EntitiesResponse, ErrorBody, InteractRequest, ReportResponse, ViewEvent,
    ViewState,
};

/// Report for `state` as-is.
pub async fn fetch_report(state: &ViewState) -> AppResult<ReportResponse> {
    let url = format!("{}/api/report", BACKEND_URL);
    let request = Request::post(&url)
        .json(state)
        .map_err(|e| AppError::Network(e.to_string()))?;
    decode(send(request).await?).await
}

/// Apply `event` to `state` on the backend and return the next state with its report.
pub async fn interact(state: &ViewState, event: &ViewEvent) -> AppResult<ReportResponse> {
    let url = format!("{}/api/interact", BACKEND_URL);
    let body = InteractRequest { state, event };
    let request = Request::post(&url)
        .json(&body)
        .map_err(|e| AppError::Network(e.to_string()))?;
    decode(send(request).await?).await
}

/// Entity names for the dropdown, in dataset order.
pub async fn fetch_entities() -> AppResult<Vec<String>> {
    let url = format!("{}/api/entities", BACKEND_URL);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| AppError::Network(e.to_string()))?;
    let body: EntitiesResponse = decode(response).await?;
    Ok(body.entities)
}

async fn send(request: Request) -> AppResult<Response> {
    request
        .send()
        .await
        .map_err(|e| AppError::Network(e.to_string()))
}

async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    if !response.ok() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::Server {
            status,
            message: error_message(&text),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// The `error` field of an error body, or the raw text when it is not JSON.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "Unknown error".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
