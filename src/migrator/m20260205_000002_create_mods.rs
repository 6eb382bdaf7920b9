use sea_orm_migration::prelude::*;

use super::m20260205_000001_create_developers::Developer;

#[derive(DeriveMigrationName)]
pub struct ModTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for ModTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mod::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Mod::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Mod::DeveloperId).integer().not_null())
                    .col(ColumnDef::new(Mod::Name).string().not_null())
                    .col(ColumnDef::new(Mod::Description).string().null())
                    .col(ColumnDef::new(Mod::LongDescription).text().null())
                    .col(ColumnDef::new(Mod::ImageUrl).string().null())
                    .col(ColumnDef::new(Mod::GithubRepoUrl).string().null())
                    .col(
                        ColumnDef::new(Mod::GalleryImageUrls)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Mod::InstallJson).text().null())
                    .col(ColumnDef::new(Mod::Stars).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Mod::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Mod::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Mod::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mods-developer_id")
                            .from(Mod::Table, Mod::DeveloperId)
                            .to(Developer::Table, Developer::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-mods-github_repo_url")
                    .table(Mod::Table)
                    .col(Mod::GithubRepoUrl)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mod::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Mod {
    #[sea_orm(iden = "mods")]
    Table,
    Id,
    DeveloperId,
    Name,
    Description,
    LongDescription,
    ImageUrl,
    GithubRepoUrl,
    GalleryImageUrls,
    InstallJson,
    Stars,
    IsArchived,
    CreatedAt,
    UpdatedAt,
}
