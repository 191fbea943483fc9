use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::errors::internal::database::violated_unique_constraint;
use crate::errors::internal::{CredentialError, DatabaseError, UserError};
use crate::types::db::user::{self, ActiveModel, Entity as User, Role};
use crate::types::internal::{NewUser, Origin, UserFilter, UserUpdate};

const PLACEHOLDER_PASSWORD_LENGTH: usize = 32;

/// CredentialStore persists user accounts and owns password hashing
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore
    ///
    /// # Arguments
    /// * `db` - The database connection
    /// * `password_pepper` - Secret mixed into every Argon2 hash (from SecretManager)
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| {
            CredentialError::PasswordHashingFailed(format!(
                "Failed to initialize Argon2 with secret: {}",
                e
            ))
            .into()
        })
    }

    /// Hash a plaintext password with Argon2id and the pepper
    pub fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::PasswordHashingFailed(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Check a plaintext password against a stored PHC hash
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<(), InternalError> {
        let parsed_hash =
            PasswordHash::new(password_hash).map_err(|_| CredentialError::InvalidCredentials)?;

        self.argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| CredentialError::InvalidCredentials)?;

        Ok(())
    }

    /// Verify an email/password pair
    ///
    /// # Returns
    /// * `Ok(Model)` - The active user whose password matched
    /// * `Err(CredentialError::AccountNotFound)` - No user with this email
    /// * `Err(CredentialError::AccountInactive)` - User exists but is soft-deleted
    /// * `Err(CredentialError::InvalidCredentials)` - Password mismatch
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self
            .find_by_email(email)
            .await?
            .ok_or_else(|| CredentialError::AccountNotFound {
                email: email.to_string(),
            })?;

        if !user.is_active {
            return Err(CredentialError::AccountInactive.into());
        }

        self.verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Insert a local user with role `user` or, via [`claim_admin`](Self::claim_admin), `admin`
    ///
    /// # Errors
    /// * `UserError::DuplicateEmail` - Email already taken
    /// * `UserError::AdminAlreadyExists` - Role is admin and an admin exists
    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        if new_user.role == Role::Admin {
            return self.claim_admin(new_user).await;
        }

        if self.find_by_email(&new_user.email).await?.is_some() {
            return Err(UserError::DuplicateEmail {
                email: new_user.email,
            }
            .into());
        }

        let password_hash = self.hash_password(&new_user.password)?;
        let model = Self::new_active_model(
            new_user.name,
            new_user.email,
            password_hash,
            Role::User,
            None,
        );

        let email = model_email(&model);
        model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error("create_user", email, e))
    }

    /// Create the admin account if, and only if, no admin exists yet
    ///
    /// The check and insert share a transaction; the partial unique index on
    /// `role` rejects a concurrent second admin.
    pub async fn claim_admin(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let password_hash = self.hash_password(&new_user.password)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InternalError::Database(DatabaseError::TransactionBegin { source: e }))?;

        let existing_admin = User::find()
            .filter(user::Column::Role.eq(Role::Admin))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_admin", e))?;

        if existing_admin.is_some() {
            return Err(UserError::AdminAlreadyExists.into());
        }

        let existing_email = User::find()
            .filter(user::Column::Email.eq(&new_user.email))
            .one(&txn)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))?;

        if existing_email.is_some() {
            return Err(UserError::DuplicateEmail {
                email: new_user.email,
            }
            .into());
        }

        let model = Self::new_active_model(
            new_user.name,
            new_user.email,
            password_hash,
            Role::Admin,
            None,
        );
        let email = model_email(&model);

        let admin = model
            .insert(&txn)
            .await
            .map_err(|e| map_insert_error("claim_admin", email, e))?;

        txn.commit()
            .await
            .map_err(|e| InternalError::Database(DatabaseError::TransactionCommit { source: e }))?;

        tracing::info!("Admin account created: {}", admin.id);

        Ok(admin)
    }

    /// Insert a directory-origin user
    ///
    /// The account gets a random placeholder password; directory users sign in
    /// through the directory assertion flow.
    pub async fn create_directory_user(
        &self,
        name: String,
        email: String,
        external_id: String,
    ) -> Result<user::Model, InternalError> {
        if external_id.is_empty() {
            return Err(UserError::validation("Directory users require an external id").into());
        }

        let placeholder: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(PLACEHOLDER_PASSWORD_LENGTH)
            .map(char::from)
            .collect();
        let password_hash = self.hash_password(&placeholder)?;

        let model =
            Self::new_active_model(name, email, password_hash, Role::User, Some(external_id));
        let email = model_email(&model);

        model
            .insert(&self.db)
            .await
            .map_err(|e| map_insert_error("create_directory_user", email, e))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<user::Model>, InternalError> {
        User::find_by_id(user_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_id", e))
    }

    pub async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(user::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_external_id", e))
    }

    /// Load a user or fail with `UserError::UserIdNotFound`
    pub async fn get_by_id(&self, user_id: &str) -> Result<user::Model, InternalError> {
        self.find_by_id(user_id).await?.ok_or_else(|| {
            UserError::UserIdNotFound {
                user_id: user_id.to_string(),
            }
            .into()
        })
    }

    pub async fn admin_exists(&self) -> Result<bool, InternalError> {
        let admin = User::find()
            .filter(user::Column::Role.eq(Role::Admin))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_admin", e))?;
        Ok(admin.is_some())
    }

    /// List users matching every filter that is set, oldest first
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<user::Model>, InternalError> {
        let mut query = User::find();

        if let Some(origin) = filter.origin {
            query = query.filter(user::Column::IsDirectoryUser.eq(origin == Origin::Directory));
        }

        if let Some(active) = filter.active {
            query = query.filter(user::Column::IsActive.eq(active));
        }

        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search.to_lowercase());
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Name))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Email))).like(pattern)),
            );
        }

        query
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Email)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_users", e))
    }

    pub async fn all_users(&self) -> Result<Vec<user::Model>, InternalError> {
        self.list(&UserFilter::default()).await
    }

    /// Apply a partial update. A new password is hashed before it is stored.
    ///
    /// # Errors
    /// * `UserError::UserIdNotFound` - No such user
    /// * `UserError::DuplicateEmail` - New email belongs to another user
    /// * `UserError::AdminAlreadyExists` - Promotion while another admin exists
    pub async fn update(
        &self,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<user::Model, InternalError> {
        let existing = self.get_by_id(user_id).await?;

        if let Some(email) = update.email.as_ref().filter(|e| **e != existing.email) {
            if self.find_by_email(email).await?.is_some() {
                return Err(UserError::DuplicateEmail {
                    email: email.clone(),
                }
                .into());
            }
        }

        if update.role == Some(Role::Admin) && existing.role != Role::Admin && self.admin_exists().await? {
            return Err(UserError::AdminAlreadyExists.into());
        }

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };

        let email = update.email.clone().unwrap_or_else(|| existing.email.clone());
        let mut model: ActiveModel = existing.into();
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(hash) = password_hash {
            model.password_hash = Set(hash);
        }
        if let Some(role) = update.role {
            model.role = Set(role);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| map_insert_error("update_user", email, e))
    }

    pub async fn set_active(
        &self,
        user_id: &str,
        is_active: bool,
    ) -> Result<user::Model, InternalError> {
        let existing = self.get_by_id(user_id).await?;

        let mut model: ActiveModel = existing.into();
        model.is_active = Set(is_active);
        model.updated_at = Set(Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("set_user_active", e))
    }

    /// Remove the row permanently
    pub async fn delete(&self, user_id: &str) -> Result<(), InternalError> {
        let result = User::delete_by_id(user_id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_user", e))?;

        if result.rows_affected == 0 {
            return Err(UserError::UserIdNotFound {
                user_id: user_id.to_string(),
            }
            .into());
        }

        Ok(())
    }

    fn new_active_model(
        name: String,
        email: String,
        password_hash: String,
        role: Role,
        external_id: Option<String>,
    ) -> ActiveModel {
        let now = Utc::now().timestamp();
        ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role),
            is_active: Set(true),
            is_directory_user: Set(external_id.is_some()),
            external_id: Set(external_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

fn model_email(model: &ActiveModel) -> String {
    match &model.email {
        sea_orm::ActiveValue::Set(email) | sea_orm::ActiveValue::Unchanged(email) => email.clone(),
        sea_orm::ActiveValue::NotSet => String::new(),
    }
}

/// The single-admin partial index as SQLite and Postgres name it
const SINGLE_ADMIN_CONSTRAINTS: &[&str] = &["users.role", "idx_users_single_admin"];

fn map_insert_error(operation: &str, email: String, err: sea_orm::DbErr) -> InternalError {
    match violated_unique_constraint(&err) {
        Some(constraint) if SINGLE_ADMIN_CONSTRAINTS.contains(&constraint.as_str()) => {
            UserError::AdminAlreadyExists.into()
        }
        Some(_) => UserError::DuplicateEmail { email }.into(),
        None => InternalError::database(operation, err),
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Display for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CredentialStore {{ db: <connection>, password_pepper: <redacted> }}"
        )
    }
}
