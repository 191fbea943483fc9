// Providers layer - Work performers and business logic
//
// Providers contain business logic and provide composable operations that
// coordinators can orchestrate.

pub mod directory_adapter;
pub mod directory_connector;
pub mod reconciliation_provider;
pub mod token_provider;

pub use directory_adapter::DirectoryAdapter;
pub use directory_connector::{DirectoryConnector, GraphConnector};
pub use reconciliation_provider::ReconciliationProvider;
pub use token_provider::TokenProvider;
