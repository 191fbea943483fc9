use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::errors::internal::UserError;
use crate::stores::CredentialStore;
use crate::types::db::user::{self, Role};
use crate::types::internal::{Identity, NewUser, UserFilter, UserUpdate};

const REQUIRED_FIELDS_MESSAGE: &str = "name, email, and password are required.";

/// Orchestrates the user account lifecycle
///
/// Role checks happen at the API boundary; this coordinator enforces the
/// account rules that hold regardless of who is calling.
pub struct UserCoordinator {
    credential_store: Arc<CredentialStore>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
        }
    }

    /// One-time admin bootstrap
    ///
    /// # Errors
    /// * `UserError::Validation` - Missing name, email or password
    /// * `UserError::AdminAlreadyExists` - An admin already exists
    pub async fn create_admin(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let new_user = NewUser {
            role: Role::Admin,
            ..validated(new_user)?
        };
        self.credential_store.claim_admin(new_user).await
    }

    pub async fn create_user(&self, new_user: NewUser) -> Result<user::Model, InternalError> {
        let user = self.credential_store.create_user(validated(new_user)?).await?;
        tracing::info!("User {} created with role {}", user.id, user.role);
        Ok(user)
    }

    pub async fn list_users(&self, filter: UserFilter) -> Result<Vec<user::Model>, InternalError> {
        self.credential_store.list(&filter).await
    }

    pub async fn profile(&self, user_id: &str) -> Result<user::Model, InternalError> {
        self.credential_store.get_by_id(user_id).await
    }

    /// Partial update of a user
    ///
    /// The caller may not change their own role or active state.
    pub async fn update_user(
        &self,
        actor: &Identity,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<user::Model, InternalError> {
        for (field, value) in [
            ("name", &update.name),
            ("email", &update.email),
            ("password", &update.password),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(UserError::validation(format!("{} cannot be empty", field)).into());
            }
        }

        if actor.user_id() == user_id && update.touches_privileges() {
            let unchanged = update.role.is_none_or(|role| role == actor.role())
                && update.is_active.is_none_or(|active| active);
            if !unchanged {
                return Err(
                    UserError::validation("You cannot change your own role or status").into(),
                );
            }
        }

        let user = self.credential_store.update(user_id, update).await?;
        tracing::info!("User {} updated by {}", user.id, actor.user_id());
        Ok(user)
    }

    /// Deactivate an active account
    ///
    /// # Errors
    /// * `UserError::UserIdNotFound` - No such user, or already inactive
    pub async fn soft_delete(
        &self,
        actor: &Identity,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        ensure_not_self(actor, user_id)?;

        let user = self.credential_store.get_by_id(user_id).await?;
        if !user.is_active {
            return Err(UserError::UserIdNotFound {
                user_id: user_id.to_string(),
            }
            .into());
        }

        let user = self.credential_store.set_active(user_id, false).await?;
        tracing::info!("User {} deactivated by {}", user.id, actor.user_id());
        Ok(user)
    }

    pub async fn undo_delete(
        &self,
        actor: &Identity,
        user_id: &str,
    ) -> Result<user::Model, InternalError> {
        let user = self.credential_store.set_active(user_id, true).await?;
        tracing::info!("User {} reactivated by {}", user.id, actor.user_id());
        Ok(user)
    }

    pub async fn hard_delete(&self, actor: &Identity, user_id: &str) -> Result<(), InternalError> {
        ensure_not_self(actor, user_id)?;

        self.credential_store.delete(user_id).await?;
        tracing::info!("User {} permanently deleted by {}", user_id, actor.user_id());
        Ok(())
    }
}

fn validated(new_user: NewUser) -> Result<NewUser, InternalError> {
    let name = new_user.name.trim().to_string();
    let email = new_user.email.trim().to_string();

    if name.is_empty() || email.is_empty() || new_user.password.is_empty() {
        return Err(UserError::validation(REQUIRED_FIELDS_MESSAGE).into());
    }

    Ok(NewUser {
        name,
        email,
        ..new_user
    })
}

fn ensure_not_self(actor: &Identity, user_id: &str) -> Result<(), InternalError> {
    if actor.user_id() == user_id {
        return Err(UserError::validation("You cannot delete your own account").into());
    }
    Ok(())
}
