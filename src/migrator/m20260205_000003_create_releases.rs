use sea_orm_migration::prelude::*;

use super::m20260205_000002_create_mods::Mod;

#[derive(DeriveMigrationName)]
pub struct ReleaseTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for ReleaseTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Release::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Release::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Release::ModId).integer().not_null())
                    .col(ColumnDef::new(Release::Version).string().not_null())
                    .col(
                        ColumnDef::new(Release::ReleasedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Release::HtmlUrl).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-releases-mod_id")
                            .from(Release::Table, Release::ModId)
                            .to(Mod::Table, Mod::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A tag identifies a release within its mod.
        manager
            .create_index(
                Index::create()
                    .name("idx-releases-mod_id-version")
                    .table(Release::Table)
                    .col(Release::ModId)
                    .col(Release::Version)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Release::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Release {
    #[sea_orm(iden = "releases")]
    Table,
    Id,
    ModId,
    Version,
    ReleasedAt,
    HtmlUrl,
}
