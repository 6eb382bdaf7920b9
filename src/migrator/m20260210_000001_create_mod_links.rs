use sea_orm_migration::prelude::*;

use super::m20260205_000002_create_mods::Mod;

#[derive(DeriveMigrationName)]
pub struct ModLinkTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for ModLinkTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModLink::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModLink::ModId).integer().not_null())
                    .col(ColumnDef::new(ModLink::Label).string().not_null())
                    .col(ColumnDef::new(ModLink::Icon).string().null())
                    .col(ColumnDef::new(ModLink::Url).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mod_links-mod_id")
                            .from(ModLink::Table, ModLink::ModId)
                            .to(Mod::Table, Mod::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModLink::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModLink {
    #[sea_orm(iden = "mod_links")]
    Table,
    Id,
    ModId,
    Label,
    Icon,
    Url,
}
