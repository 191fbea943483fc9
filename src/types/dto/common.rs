use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Whether the database answered a ping
    pub database: bool,

    /// Current server time (RFC 3339)
    pub timestamp: String,
}

/// Plain acknowledgement
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub msg: String,
}

impl MessageResponse {
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            msg: msg.into(),
        }
    }
}
