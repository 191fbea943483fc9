use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApiLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApiLogs::Method).string().not_null())
                    .col(ColumnDef::new(ApiLogs::Path).string().not_null())
                    .col(ColumnDef::new(ApiLogs::StatusCode).integer().not_null())
                    .col(ColumnDef::new(ApiLogs::RequestBody).text().not_null())
                    .col(ColumnDef::new(ApiLogs::Success).boolean().not_null())
                    .col(ColumnDef::new(ApiLogs::Message).text().not_null())
                    .col(ColumnDef::new(ApiLogs::ResultCount).big_integer().null())
                    .col(ColumnDef::new(ApiLogs::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_api_logs_created_at")
                    .table(ApiLogs::Table)
                    .col(ApiLogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApiLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApiLogs {
    Table,
    Id,
    Method,
    Path,
    StatusCode,
    RequestBody,
    Success,
    Message,
    ResultCount,
    CreatedAt,
}
