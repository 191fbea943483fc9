use chrono::Utc;
use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;

use crate::types::dto::common::HealthResponse;

/// Liveness plus a database ping
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Tags)]
enum ApiTags {
    Health,
}

#[OpenApi]
impl HealthApi {
    /// Service health
    ///
    /// `status` is `healthy` when the database answers, `degraded` otherwise.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let database = match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Health check database ping failed: {}", e);
                false
            }
        };

        Json(HealthResponse {
            status: if database { "healthy" } else { "degraded" }.to_string(),
            database,
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
