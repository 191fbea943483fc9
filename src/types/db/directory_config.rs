use sea_orm::entity::prelude::*;

/// Connection settings for the external directory.
///
/// The authoritative row is the most recently created one with `is_active = true`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "directory_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub is_active: bool,
    /// Formatted `yyyy-MM-dd HH:mm:ss`
    pub last_synchronization: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
