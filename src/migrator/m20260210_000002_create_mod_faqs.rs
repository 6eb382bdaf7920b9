use sea_orm_migration::prelude::*;

use super::m20260205_000002_create_mods::Mod;

#[derive(DeriveMigrationName)]
pub struct ModFaqTableMigration;

#[async_trait::async_trait]
impl MigrationTrait for ModFaqTableMigration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ModFaq::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModFaq::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ModFaq::ModId).integer().not_null())
                    .col(ColumnDef::new(ModFaq::Question).text().not_null())
                    .col(ColumnDef::new(ModFaq::Answer).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mod_faqs-mod_id")
                            .from(ModFaq::Table, ModFaq::ModId)
                            .to(Mod::Table, Mod::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ModFaq::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ModFaq {
    #[sea_orm(iden = "mod_faqs")]
    Table,
    Id,
    ModId,
    Question,
    Answer,
}
