use chrono::Utc;
use migration::SchemaManager;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::{DatabaseError, DirectoryError};
use crate::types::db::directory_config::{self, ActiveModel, Entity as DirectoryConfig};
use crate::types::internal::DirectoryCredentials;

const TABLE_NAME: &str = "directory_configs";

/// DirectoryConfigStore persists directory connection settings and the last sync time
pub struct DirectoryConfigStore {
    db: DatabaseConnection,
}

impl DirectoryConfigStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Whether the settings table exists at all (deployments may run without it)
    pub async fn table_exists(&self) -> Result<bool, InternalError> {
        SchemaManager::new(&self.db)
            .has_table(TABLE_NAME)
            .await
            .map_err(|e| InternalError::database("has_directory_config_table", e))
    }

    /// The authoritative config: the most recently created active row
    pub async fn get_active(&self) -> Result<Option<directory_config::Model>, InternalError> {
        DirectoryConfig::find()
            .filter(directory_config::Column::IsActive.eq(true))
            .order_by_desc(directory_config::Column::CreatedAt)
            .order_by_desc(directory_config::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_active_directory_config", e))
    }

    /// Store new credentials as the only active config
    ///
    /// Previously active rows are kept but deactivated, in one transaction.
    pub async fn save_config(
        &self,
        credentials: DirectoryCredentials,
    ) -> Result<directory_config::Model, InternalError> {
        let now = Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::Database(DatabaseError::TransactionBegin { source: e }))?;

        DirectoryConfig::update_many()
            .col_expr(
                directory_config::Column::IsActive,
                sea_orm::sea_query::Expr::value(false),
            )
            .col_expr(
                directory_config::Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(directory_config::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("deactivate_directory_configs", e))?;

        let config = ActiveModel {
            tenant_id: Set(credentials.tenant_id),
            client_id: Set(credentials.client_id),
            client_secret: Set(credentials.client_secret),
            is_active: Set(true),
            last_synchronization: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InternalError::database("insert_directory_config", e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::Database(DatabaseError::TransactionCommit { source: e }))?;

        tracing::info!(
            "Directory config {} saved for tenant {}",
            config.id,
            config.tenant_id
        );

        Ok(config)
    }

    /// Stamp the active config with the time of the last completed sync
    ///
    /// # Errors
    /// * `DirectoryError::NotConfigured` - No active config row
    pub async fn record_sync(
        &self,
        synchronized_at: &str,
    ) -> Result<directory_config::Model, InternalError> {
        let active = self
            .get_active()
            .await?
            .ok_or(DirectoryError::NotConfigured)?;

        let mut model: ActiveModel = active.into();
        model.last_synchronization = Set(Some(synchronized_at.to_string()));
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("record_directory_sync", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{setup_test_stores, test_credentials};

    #[tokio::test]
    async fn test_table_exists_after_migrations() {
        let (_db, _credential_store, store) = setup_test_stores().await;
        assert!(store.table_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_table_missing_without_migrations() {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        let store = DirectoryConfigStore::new(db);

        assert!(!store.table_exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_get_active_none_when_empty() {
        let (_db, _credential_store, store) = setup_test_stores().await;
        assert!(store.get_active().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_config_replaces_active_row() {
        let (_db, _credential_store, store) = setup_test_stores().await;

        let first = store.save_config(test_credentials()).await.unwrap();
        let second = store
            .save_config(DirectoryCredentials {
                client_id: "client-2".to_string(),
                ..test_credentials()
            })
            .await
            .unwrap();

        let active = store.get_active().await.unwrap().expect("active config");
        assert_eq!(active.id, second.id);
        assert_eq!(active.client_id, "client-2");
        assert_ne!(first.id, second.id);

        let rows = DirectoryConfig::find().all(&store.db).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().filter(|r| r.is_active).count(), 1);
    }

    #[tokio::test]
    async fn test_record_sync_requires_active_config() {
        let (_db, _credential_store, store) = setup_test_stores().await;

        match store.record_sync("2025-03-01 10:00:00").await {
            Err(InternalError::Directory(DirectoryError::NotConfigured)) => {}
            _ => panic!("Expected NotConfigured error"),
        }

        store.save_config(test_credentials()).await.unwrap();
        let updated = store.record_sync("2025-03-01 10:00:00").await.unwrap();
        assert_eq!(
            updated.last_synchronization.as_deref(),
            Some("2025-03-01 10:00:00")
        );
    }
}
