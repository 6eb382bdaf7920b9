use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct DeveloperTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for DeveloperTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Developer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Developer::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Developer::GithubUsername)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Developer::DisplayName).string().null())
                    .col(
                        ColumnDef::new(Developer::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Developer::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Developer {
    #[sea_orm(iden = "developers")]
    Table,
    Id,
    GithubUsername,
    DisplayName,
    JoinedAt,
}
