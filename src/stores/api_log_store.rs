use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};

use crate::errors::InternalError;
use crate::types::db::api_log::{self, ActiveModel, Entity as ApiLog};
use crate::types::internal::ApiLogEntry;

/// ApiLogStore appends one row per handled request
pub struct ApiLogStore {
    db: DatabaseConnection,
}

impl ApiLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn write(&self, entry: ApiLogEntry) -> Result<api_log::Model, InternalError> {
        ActiveModel {
            method: Set(entry.method),
            path: Set(entry.path),
            status_code: Set(i32::from(entry.status_code)),
            request_body: Set(entry.request_body),
            success: Set(entry.summary.success),
            message: Set(entry.summary.message),
            result_count: Set(entry.summary.result_count),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("write_api_log", e))
    }

    /// Most recent entries first
    pub async fn recent(&self, limit: u64) -> Result<Vec<api_log::Model>, InternalError> {
        ApiLog::find()
            .order_by_desc(api_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("recent_api_logs", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;
    use crate::types::internal::ResponseSummary;

    #[tokio::test]
    async fn test_write_and_read_back() {
        let db = setup_test_db().await;
        let store = ApiLogStore::new(db);

        store
            .write(ApiLogEntry {
                method: "GET".to_string(),
                path: "/api/users".to_string(),
                status_code: 200,
                request_body: "{}".to_string(),
                summary: ResponseSummary::ok("Users fetched").with_count(3),
            })
            .await
            .unwrap();
        store
            .write(ApiLogEntry {
                method: "POST".to_string(),
                path: "/api/users/login".to_string(),
                status_code: 401,
                request_body: r#"{"email":"a@b.c","password":"[REDACTED]"}"#.to_string(),
                summary: ResponseSummary::failed("Invalid email or password"),
            })
            .await
            .unwrap();

        let logs = store.recent(10).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].path, "/api/users/login");
        assert_eq!(logs[0].status_code, 401);
        assert!(!logs[0].success);
        assert_eq!(logs[0].result_count, None);
        assert_eq!(logs[1].result_count, Some(3));
        assert_eq!(logs[1].message, "Users fetched");
    }
}
