// Database entities - SeaORM models
pub mod api_log;
pub mod directory_config;
pub mod user;
