// Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use migration::{MigratorTrait, RosterMigrator};
use roster_backend::AppData;
use roster_backend::config::SecretManager;
use roster_backend::errors::internal::DirectoryError;
use roster_backend::providers::DirectoryConnector;
use roster_backend::types::internal::{
    DirectoryAccessToken, DirectoryCredentials, DirectoryGroup, DirectoryIdentity,
};
use sea_orm::{Database, DatabaseConnection};
use std::sync::{Arc, Mutex};

pub const TEST_JWT_SECRET: &str = "integration-secret-key-at-least-32-chars";
pub const TEST_PASSWORD_PEPPER: &str = "integration-pepper";

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    RosterMigrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// AppData over a fresh database and the given directory
pub async fn setup_app_data(directory: StaticDirectory) -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager = Arc::new(SecretManager::from_values(
        TEST_JWT_SECRET,
        TEST_PASSWORD_PEPPER,
    ));
    Arc::new(AppData::from_parts(db, secret_manager, 60, Arc::new(directory)))
}

pub fn credentials() -> DirectoryCredentials {
    DirectoryCredentials {
        tenant_id: "tenant-it".to_string(),
        client_id: "client-it".to_string(),
        client_secret: "secret-it".to_string(),
    }
}

pub fn directory_user(id: &str, mail: Option<&str>, upn: Option<&str>) -> DirectoryIdentity {
    DirectoryIdentity {
        id: id.to_string(),
        display_name: Some(format!("User {}", id)),
        mail: mail.map(str::to_string),
        user_principal_name: upn.map(str::to_string),
    }
}

/// Directory with a fixed user listing whose contents tests can swap
#[derive(Clone, Default)]
pub struct StaticDirectory {
    users: Arc<Mutex<Vec<DirectoryIdentity>>>,
    reject: bool,
}

impl StaticDirectory {
    pub fn new(users: Vec<DirectoryIdentity>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            reject: false,
        }
    }

    /// A directory that refuses every token request
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    pub fn replace_users(&self, users: Vec<DirectoryIdentity>) {
        *self.users.lock().unwrap() = users;
    }
}

#[async_trait]
impl DirectoryConnector for StaticDirectory {
    async fn mint_access_token(
        &self,
        _credentials: &DirectoryCredentials,
    ) -> Result<DirectoryAccessToken, DirectoryError> {
        if self.reject {
            return Err(DirectoryError::TokenMint("invalid_client".to_string()));
        }
        Ok(DirectoryAccessToken::new("static-token"))
    }

    async fn fetch_users(
        &self,
        _token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryIdentity>, DirectoryError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn fetch_groups(
        &self,
        _token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn fetch_memberships(
        &self,
        _token: &DirectoryAccessToken,
        _external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        Ok(Vec::new())
    }
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Environment variables are process-global, so tests that modify them run serially
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
