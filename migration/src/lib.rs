pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_directory_configs;
mod m20250301_000003_create_api_logs;

pub struct RosterMigrator;

#[async_trait::async_trait]
impl MigratorTrait for RosterMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_directory_configs::Migration),
            Box::new(m20250301_000003_create_api_logs::Migration),
        ]
    }
}
