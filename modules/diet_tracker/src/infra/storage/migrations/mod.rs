use sea_orm_migration::prelude::*;

mod m20230508_000001_create_users;
mod m20230508_000002_create_feeds;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20230508_000001_create_users::Migration),
            Box::new(m20230508_000002_create_feeds::Migration),
        ]
    }
}
