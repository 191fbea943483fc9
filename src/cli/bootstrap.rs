// Creates the first admin account from the command line

use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::UserCoordinator;
use crate::types::db::user::Role;
use crate::types::internal::NewUser;

/// Create the first admin account
///
/// # Errors
/// Fails when the fields are blank, the email is taken or an admin already exists
pub async fn create_admin(
    app_data: Arc<AppData>,
    name: String,
    email: String,
    password: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = UserCoordinator::new(app_data);

    let admin = coordinator
        .create_admin(NewUser {
            name,
            email,
            password,
            role: Role::Admin,
        })
        .await?;

    tracing::info!("Admin account created for {}", admin.email);
    println!("Admin user created: {} ({})", admin.email, admin.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_create_admin_once() {
        let app_data = setup_test_app_data().await;

        create_admin(
            app_data.clone(),
            "Root".to_string(),
            "root@example.com".to_string(),
            "adminpass".to_string(),
        )
        .await
        .unwrap();

        let second = create_admin(
            app_data.clone(),
            "Other".to_string(),
            "other@example.com".to_string(),
            "adminpass".to_string(),
        )
        .await;
        assert!(second.is_err());
        assert!(app_data.credential_store.admin_exists().await.unwrap());
    }
}
