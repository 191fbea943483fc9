use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::DirectoryCoordinator;
use crate::types::internal::DirectoryCredentials;

/// Store new directory credentials as the active config
pub async fn save_directory_config(
    app_data: Arc<AppData>,
    tenant_id: String,
    client_id: String,
    client_secret: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = DirectoryCoordinator::new(app_data);

    let config = coordinator
        .save_config(DirectoryCredentials {
            tenant_id,
            client_id,
            client_secret,
        })
        .await?;

    println!(
        "Directory config {} saved for tenant {}",
        config.id, config.tenant_id
    );
    Ok(())
}
