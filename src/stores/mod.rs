// Stores layer - data access over sea-orm entities
pub mod api_log_store;
pub mod credential_store;
pub mod directory_config_store;

pub use api_log_store::ApiLogStore;
pub use credential_store::CredentialStore;
pub use directory_config_store::DirectoryConfigStore;
