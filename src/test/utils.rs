// Test utilities shared across unit tests
// Only compiled when running tests

use async_trait::async_trait;
use migration::{MigratorTrait, RosterMigrator};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::app_data::AppData;
use crate::config::SecretManager;
use crate::errors::internal::DirectoryError;
use crate::providers::DirectoryConnector;
use crate::stores::{CredentialStore, DirectoryConfigStore};
use crate::types::db::user::{self, Role};
use crate::types::internal::{
    Claims, DirectoryAccessToken, DirectoryCredentials, DirectoryGroup, DirectoryIdentity,
    Identity, NewUser,
};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";
pub const TEST_PASSWORD_PEPPER: &str = "test-pepper-for-unit-tests";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    RosterMigrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a test database and stores with standard configuration
///
/// Returns (db, credential_store, directory_config_store)
pub async fn setup_test_stores() -> (
    DatabaseConnection,
    Arc<CredentialStore>,
    Arc<DirectoryConfigStore>,
) {
    let db = setup_test_db().await;

    let credential_store = Arc::new(CredentialStore::new(
        db.clone(),
        TEST_PASSWORD_PEPPER.to_string(),
    ));
    let directory_config_store = Arc::new(DirectoryConfigStore::new(db.clone()));

    (db, credential_store, directory_config_store)
}

/// AppData over a fresh database and a directory with no users
pub async fn setup_test_app_data() -> Arc<AppData> {
    setup_test_app_data_with(FakeDirectory::default()).await
}

/// AppData over a fresh database and the given fake directory
pub async fn setup_test_app_data_with(directory: FakeDirectory) -> Arc<AppData> {
    let db = setup_test_db().await;
    let secret_manager = Arc::new(SecretManager::from_values(
        TEST_JWT_SECRET,
        TEST_PASSWORD_PEPPER,
    ));

    Arc::new(AppData::from_parts(db, secret_manager, 60, Arc::new(directory)))
}

pub fn new_user(name: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: Role::User,
    }
}

pub fn test_credentials() -> DirectoryCredentials {
    DirectoryCredentials {
        tenant_id: "tenant-1".to_string(),
        client_id: "client-1".to_string(),
        client_secret: "secret-1".to_string(),
    }
}

pub fn identity(id: &str, mail: Option<&str>, user_principal_name: Option<&str>) -> DirectoryIdentity {
    DirectoryIdentity {
        id: id.to_string(),
        display_name: Some(format!("Directory {}", id)),
        mail: mail.map(str::to_string),
        user_principal_name: user_principal_name.map(str::to_string),
    }
}

/// Identity for an already loaded user, as access control would build it
pub fn identity_for(user: user::Model) -> Identity {
    let claims = Claims {
        sub: user.id.clone(),
        exp: i64::MAX,
        iat: 0,
    };
    Identity { user, claims }
}

/// In-memory directory
#[derive(Debug, Clone, Default)]
pub struct FakeDirectory {
    users: Vec<DirectoryIdentity>,
    groups: Vec<DirectoryGroup>,
    reject_credentials: bool,
    mints: Arc<AtomicUsize>,
}

impl FakeDirectory {
    pub fn with_users(users: Vec<DirectoryIdentity>) -> Self {
        Self {
            users,
            ..Default::default()
        }
    }

    pub fn with_groups(mut self, groups: Vec<DirectoryGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Token requests seen so far, shared across clones
    pub fn mint_count(&self) -> usize {
        self.mints.load(Ordering::SeqCst)
    }

    /// A directory that refuses every token request
    pub fn rejecting() -> Self {
        Self {
            reject_credentials: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl DirectoryConnector for FakeDirectory {
    async fn mint_access_token(
        &self,
        _credentials: &DirectoryCredentials,
    ) -> Result<DirectoryAccessToken, DirectoryError> {
        self.mints.fetch_add(1, Ordering::SeqCst);
        if self.reject_credentials {
            return Err(DirectoryError::TokenMint("invalid_client".to_string()));
        }
        Ok(DirectoryAccessToken::new("fake-token"))
    }

    async fn fetch_users(
        &self,
        _token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryIdentity>, DirectoryError> {
        Ok(self.users.clone())
    }

    async fn fetch_groups(
        &self,
        _token: &DirectoryAccessToken,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        Ok(self.groups.clone())
    }

    async fn fetch_memberships(
        &self,
        _token: &DirectoryAccessToken,
        external_id: &str,
    ) -> Result<Vec<DirectoryGroup>, DirectoryError> {
        if self.users.iter().any(|u| u.id == external_id) {
            Ok(self.groups.clone())
        } else {
            Err(DirectoryError::upstream(
                "list_user_memberships",
                format!("user {} not found", external_id),
            ))
        }
    }
}
