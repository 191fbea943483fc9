mod common;

use common::{StaticDirectory, credentials, directory_user, setup_app_data};
use roster_backend::coordinators::DirectoryCoordinator;
use roster_backend::errors::InternalError;
use roster_backend::errors::internal::DirectoryError;
use roster_backend::types::db::user::Role;
use roster_backend::types::internal::{NewUser, Origin, UserFilter};

fn local_user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "password".to_string(),
        role: Role::User,
    }
}

#[tokio::test]
async fn test_two_unknown_directory_users_are_created() {
    let directory = StaticDirectory::new(vec![
        directory_user("d1", Some("one@corp.example"), None),
        directory_user("d2", None, Some("two@corp.example")),
    ]);
    let app_data = setup_app_data(directory).await;
    let coordinator = DirectoryCoordinator::new(app_data.clone());
    coordinator.save_config(credentials()).await.unwrap();

    let result = coordinator.synchronize().await.unwrap();

    assert_eq!(result.new_users_count, 2);
    let directory_users = app_data
        .credential_store
        .list(&UserFilter {
            origin: Some(Origin::Directory),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(directory_users.len(), 2);
    assert!(directory_users.iter().all(|u| u.is_directory_user));
    assert!(directory_users.iter().all(|u| u.external_id.is_some()));
}

#[tokio::test]
async fn test_email_match_leaves_local_user_unchanged() {
    let directory = StaticDirectory::new(vec![directory_user(
        "d1",
        Some("ann@corp.example"),
        None,
    )]);
    let app_data = setup_app_data(directory).await;
    let existing = app_data
        .credential_store
        .create_user(local_user("Ann", "ann@corp.example"))
        .await
        .unwrap();
    let coordinator = DirectoryCoordinator::new(app_data.clone());
    coordinator.save_config(credentials()).await.unwrap();

    let result = coordinator.synchronize().await.unwrap();

    assert_eq!(result.new_users_count, 0);
    let after = app_data
        .credential_store
        .get_by_id(&existing.id)
        .await
        .unwrap();
    assert_eq!(after, existing);
}

#[tokio::test]
async fn test_second_sync_with_same_snapshot_creates_nothing() {
    let directory = StaticDirectory::new(vec![
        directory_user("d1", Some("one@corp.example"), None),
        directory_user("d2", Some("two@corp.example"), None),
    ]);
    let app_data = setup_app_data(directory).await;
    let coordinator = DirectoryCoordinator::new(app_data);
    coordinator.save_config(credentials()).await.unwrap();

    let first = coordinator.synchronize().await.unwrap();
    let second = coordinator.synchronize().await.unwrap();

    assert_eq!(first.new_users_count, 2);
    assert_eq!(second.new_users_count, 0);
    assert_eq!(second.all_users.len(), 2);
}

#[tokio::test]
async fn test_new_directory_users_picked_up_on_later_sync() {
    let directory = StaticDirectory::new(vec![directory_user("d1", Some("one@corp.example"), None)]);
    let app_data = setup_app_data(directory.clone()).await;
    let coordinator = DirectoryCoordinator::new(app_data);
    coordinator.save_config(credentials()).await.unwrap();

    coordinator.synchronize().await.unwrap();
    directory.replace_users(vec![
        directory_user("d1", Some("one@corp.example"), None),
        directory_user("d3", Some("three@corp.example"), None),
    ]);
    let result = coordinator.synchronize().await.unwrap();

    assert_eq!(result.new_users_count, 1);
    assert_eq!(result.created_users[0].email, "three@corp.example");
}

#[tokio::test]
async fn test_sync_requires_accepted_credentials() {
    let app_data = setup_app_data(StaticDirectory::rejecting()).await;
    let coordinator = DirectoryCoordinator::new(app_data);

    match coordinator.synchronize().await {
        Err(InternalError::Directory(DirectoryError::NotConfigured)) => {}
        _ => panic!("Expected NotConfigured error"),
    }

    coordinator.save_config(credentials()).await.unwrap();
    match coordinator.synchronize().await {
        Err(InternalError::Directory(DirectoryError::CredentialsRejected)) => {}
        _ => panic!("Expected CredentialsRejected error"),
    }
}
