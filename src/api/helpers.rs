use poem::http::header;
use poem::{IntoResponse, Request, Response, web::Json};
use serde_json::json;

use crate::errors::ApiError;
use crate::types::internal::{ResponseSummary, SummarySlot};

/// Record the outcome of a handler for the request log and pass the result through
///
/// Failures are summarized from the error message; successes by `on_ok`.
pub fn record_outcome<T>(
    req: &Request,
    result: Result<T, ApiError>,
    on_ok: impl FnOnce(&T) -> ResponseSummary,
) -> Result<T, ApiError> {
    if let Some(slot) = req.extensions().get::<SummarySlot>() {
        let summary = match &result {
            Ok(value) => on_ok(value),
            Err(err) => ResponseSummary::failed(err.message()),
        };
        slot.record(summary);
    }
    result
}

/// Rewrite framework errors into the `{success, error}` body every endpoint returns
///
/// Errors raised by handlers already carry that body as JSON and pass through.
/// The rest (unparseable payloads, unknown routes) keep their status code and
/// have their plain-text message wrapped.
pub async fn error_envelope(err: poem::Error) -> Response {
    let response = err.into_response();
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return response;
    }

    let status = response.status();
    let message = match response.into_body().into_string().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => status.canonical_reason().unwrap_or("Request failed").to_string(),
    };

    Json(json!({ "success": false, "error": message }))
        .with_status(status)
        .into_response()
}
