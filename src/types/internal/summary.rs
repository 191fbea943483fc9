use std::sync::{Arc, Mutex};

/// Structured outcome of a request, recorded by handlers for the request log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub success: bool,
    pub message: String,
    pub result_count: Option<i64>,
}

impl ResponseSummary {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            result_count: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            result_count: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.result_count = Some(count as i64);
        self
    }
}

/// Per-request slot placed in request extensions by the request log middleware
#[derive(Debug, Clone, Default)]
pub struct SummarySlot(Arc<Mutex<Option<ResponseSummary>>>);

impl SummarySlot {
    pub fn record(&self, summary: ResponseSummary) {
        if let Ok(mut guard) = self.0.lock() {
            *guard = Some(summary);
        }
    }

    pub fn take(&self) -> Option<ResponseSummary> {
        self.0.lock().ok().and_then(|mut guard| guard.take())
    }
}

/// One inbound request as written to the request log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiLogEntry {
    pub method: String,
    pub path: String,
    pub status_code: u16,
    /// JSON request body with secret fields redacted
    pub request_body: String,
    pub summary: ResponseSummary,
}
