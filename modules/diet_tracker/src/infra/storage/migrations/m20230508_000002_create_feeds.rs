use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feeds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feeds::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feeds::Name).string().not_null())
                    .col(ColumnDef::new(Feeds::Description).text().null())
                    .col(
                        ColumnDef::new(Feeds::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Feeds::IsOnDiet).boolean().null())
                    .col(ColumnDef::new(Feeds::SessionId).uuid().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feeds_session_id")
                    .table(Feeds::Table)
                    .col(Feeds::SessionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feeds::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Feeds {
    Table,
    Id,
    Name,
    Description,
    Date,
    IsOnDiet,
    SessionId,
}
