// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and provider operations for specific API
// endpoints. Each is built from Arc<AppData>.

pub mod directory_coordinator;
pub mod login_coordinator;
pub mod user_coordinator;

pub use directory_coordinator::DirectoryCoordinator;
pub use login_coordinator::LoginCoordinator;
pub use user_coordinator::UserCoordinator;
