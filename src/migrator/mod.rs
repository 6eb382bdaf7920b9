use sea_orm_migration::prelude::*;

mod m20260205_000001_create_developers;
mod m20260205_000002_create_mods;
mod m20260205_000003_create_releases;
mod m20260205_000004_create_release_assets;
mod m20260205_000005_create_api_keys;
mod m20260210_000001_create_mod_links;
mod m20260210_000002_create_mod_faqs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260205_000001_create_developers::DeveloperTableMigration),
            Box::new(m20260205_000002_create_mods::ModTableMigration),
            Box::new(m20260205_000003_create_releases::ReleaseTableMigration),
            Box::new(m20260205_000004_create_release_assets::ReleaseAssetTableMigration),
            Box::new(m20260205_000005_create_api_keys::ApiKeyTableMigration),
            Box::new(m20260210_000001_create_mod_links::ModLinkTableMigration),
            Box::new(m20260210_000002_create_mod_faqs::ModFaqTableMigration),
        ]
    }
}
