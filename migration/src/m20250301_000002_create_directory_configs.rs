use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DirectoryConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DirectoryConfigs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DirectoryConfigs::TenantId).string().not_null())
                    .col(ColumnDef::new(DirectoryConfigs::ClientId).string().not_null())
                    .col(ColumnDef::new(DirectoryConfigs::ClientSecret).string().not_null())
                    .col(
                        ColumnDef::new(DirectoryConfigs::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(DirectoryConfigs::LastSynchronization).string().null())
                    .col(ColumnDef::new(DirectoryConfigs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(DirectoryConfigs::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_directory_configs_active")
                    .table(DirectoryConfigs::Table)
                    .col(DirectoryConfigs::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DirectoryConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DirectoryConfigs {
    Table,
    Id,
    TenantId,
    ClientId,
    ClientSecret,
    IsActive,
    LastSynchronization,
    CreatedAt,
    UpdatedAt,
}
