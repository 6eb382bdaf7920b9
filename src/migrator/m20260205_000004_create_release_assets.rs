use sea_orm_migration::prelude::*;

use super::m20260205_000003_create_releases::Release;

#[derive(DeriveMigrationName)]
pub struct ReleaseAssetTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for ReleaseAssetTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReleaseAsset::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReleaseAsset::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReleaseAsset::ReleaseId).integer().not_null())
                    .col(ColumnDef::new(ReleaseAsset::Name).string().not_null())
                    .col(ColumnDef::new(ReleaseAsset::Size).big_integer().not_null())
                    .col(ColumnDef::new(ReleaseAsset::DownloadUrl).string().not_null())
                    .col(ColumnDef::new(ReleaseAsset::ContentType).string().null())
                    .col(
                        ColumnDef::new(ReleaseAsset::DownloadCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-release_assets-release_id")
                            .from(ReleaseAsset::Table, ReleaseAsset::ReleaseId)
                            .to(Release::Table, Release::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-release_assets-release_id-name")
                    .table(ReleaseAsset::Table)
                    .col(ReleaseAsset::ReleaseId)
                    .col(ReleaseAsset::Name)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReleaseAsset::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ReleaseAsset {
    #[sea_orm(iden = "release_assets")]
    Table,
    Id,
    ReleaseId,
    Name,
    Size,
    DownloadUrl,
    ContentType,
    DownloadCount,
}
