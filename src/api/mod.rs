// API layer - HTTP endpoints
pub mod access_control;
pub mod auth;
pub mod directory;
pub mod health;
pub mod helpers;
pub mod request_log;
pub mod users;

use std::sync::Arc;

pub use access_control::AccessControl;
pub use auth::AuthApi;
pub use directory::DirectoryApi;
pub use health::HealthApi;
pub use helpers::error_envelope;
pub use request_log::RequestLogMiddleware;
pub use users::UsersApi;

use crate::app_data::AppData;
use crate::coordinators::LoginCoordinator;

/// Every endpoint group, ready for `OpenApiService::new`
pub fn build_apis(app_data: Arc<AppData>) -> (HealthApi, AuthApi, UsersApi, DirectoryApi) {
    let login_coordinator = Arc::new(LoginCoordinator::new(app_data.clone()));
    let access_control = Arc::new(AccessControl::new(login_coordinator.clone()));

    (
        HealthApi::new(app_data.db.clone()),
        AuthApi::new(app_data.clone(), login_coordinator),
        UsersApi::new(app_data.clone(), access_control.clone()),
        DirectoryApi::new(app_data, access_control),
    )
}
