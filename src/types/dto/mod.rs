// API request/response types
pub mod auth;
pub mod common;
pub mod directory;
pub mod user;
