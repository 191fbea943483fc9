use poem::{Endpoint, IntoResponse, Middleware, Request, Response};
use serde_json::Value;
use std::sync::Arc;

use crate::stores::ApiLogStore;
use crate::types::internal::{ApiLogEntry, ResponseSummary, SummarySlot};

const REDACTED: &str = "[REDACTED]";
const SECRET_KEY_MARKERS: &[&str] = &["password", "secret", "token"];

/// Writes one api_logs row per request
///
/// Handlers describe their outcome through the `SummarySlot` placed in the
/// request extensions. Requests no handler summarized (routing errors, body
/// parse failures) are summarized from the status code.
pub struct RequestLogMiddleware {
    api_log_store: Arc<ApiLogStore>,
}

impl RequestLogMiddleware {
    pub fn new(api_log_store: Arc<ApiLogStore>) -> Self {
        Self { api_log_store }
    }
}

impl<E: Endpoint> Middleware<E> for RequestLogMiddleware {
    type Output = RequestLogEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RequestLogEndpoint {
            inner: ep,
            api_log_store: self.api_log_store.clone(),
        }
    }
}

pub struct RequestLogEndpoint<E> {
    inner: E,
    api_log_store: Arc<ApiLogStore>,
}

impl<E: Endpoint> Endpoint for RequestLogEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> poem::Result<Self::Output> {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let body = req.take_body().into_bytes().await?;
        let request_body = redacted_body(&body);
        req.set_body(body);

        let slot = SummarySlot::default();
        req.extensions_mut().insert(slot.clone());

        let response = match self.inner.call(req).await {
            Ok(resp) => resp.into_response(),
            Err(err) => err.into_response(),
        };

        let status = response.status();
        let summary = slot.take().unwrap_or_else(|| {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            if status.is_success() {
                ResponseSummary::ok(reason)
            } else {
                ResponseSummary::failed(reason)
            }
        });

        let entry = ApiLogEntry {
            method,
            path,
            status_code: status.as_u16(),
            request_body,
            summary,
        };

        if let Err(e) = self.api_log_store.write(entry).await {
            tracing::error!("Failed to write request log: {}", e);
        }

        Ok(response)
    }
}

/// Serialized request body with secret-looking fields replaced
fn redacted_body(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(mut value) => {
            redact(&mut value);
            value.to_string()
        }
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                let key = key.to_lowercase();
                if SECRET_KEY_MARKERS.iter().any(|marker| key.contains(marker)) {
                    *field = Value::String(REDACTED.to_string());
                } else {
                    redact(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::helpers::record_outcome;
    use crate::errors::ApiError;
    use crate::test::utils::setup_test_db;
    use poem::{EndpointExt, Route, handler, http::StatusCode, post};
    use serde_json::json;

    #[test]
    fn test_redacts_nested_secrets() {
        let body = json!({
            "email": "ann@example.com",
            "password": "hunter22",
            "config": { "client_secret": "s3cret", "tenant_id": "t1" },
            "items": [{ "accessToken": "abc" }]
        });

        let redacted: Value =
            serde_json::from_str(&redacted_body(body.to_string().as_bytes())).unwrap();

        assert_eq!(redacted["email"], "ann@example.com");
        assert_eq!(redacted["password"], REDACTED);
        assert_eq!(redacted["config"]["client_secret"], REDACTED);
        assert_eq!(redacted["config"]["tenant_id"], "t1");
        assert_eq!(redacted["items"][0]["accessToken"], REDACTED);
    }

    #[test]
    fn test_empty_and_non_json_bodies() {
        assert_eq!(redacted_body(b""), "");
        assert_eq!(redacted_body(b"plain text"), "plain text");
    }

    #[handler]
    fn summarized(req: &Request, body: String) -> poem::Result<String> {
        let result: Result<String, ApiError> = Ok(body);
        record_outcome(req, result, |_| ResponseSummary::ok("Echoed").with_count(1))
            .map_err(|e| poem::Error::from_string(e.to_string(), StatusCode::BAD_REQUEST))
    }

    #[handler]
    fn plain() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_writes_handler_summary() {
        let store = Arc::new(ApiLogStore::new(setup_test_db().await));
        let app = Route::new()
            .at("/echo", post(summarized))
            .with(RequestLogMiddleware::new(store.clone()));

        let resp = app
            .call(
                Request::builder()
                    .method(poem::http::Method::POST)
                    .uri(poem::http::Uri::from_static("/echo"))
                    .body(r#"{"email":"a@b.c","password":"pw"}"#),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let logs = store.recent(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].method, "POST");
        assert_eq!(logs[0].path, "/echo");
        assert_eq!(logs[0].status_code, 200);
        assert_eq!(logs[0].message, "Echoed");
        assert_eq!(logs[0].result_count, Some(1));
        assert!(!logs[0].request_body.contains("\"pw\""));
        assert!(logs[0].request_body.contains(REDACTED));
    }

    #[tokio::test]
    async fn test_unsummarized_requests_use_status() {
        let store = Arc::new(ApiLogStore::new(setup_test_db().await));
        let app = Route::new()
            .at("/plain", poem::get(plain))
            .with(RequestLogMiddleware::new(store.clone()));

        let resp = app
            .call(Request::builder().uri(poem::http::Uri::from_static("/missing")).finish())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let logs = store.recent(10).await.unwrap();
        assert_eq!(logs[0].status_code, 404);
        assert!(!logs[0].success);
        assert_eq!(logs[0].message, "Not Found");
    }
}
