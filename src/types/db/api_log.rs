use sea_orm::entity::prelude::*;

/// SeaORM entity for api_logs table (one row per inbound request)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "api_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub method: String,
    pub path: String,
    pub status_code: i32,
    pub request_body: String,
    pub success: bool,
    pub message: String,
    pub result_count: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
