use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_STATUS: &str = "initial";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tasks::Id).uuid().not_null().primary_key())
                    .col(string(Tasks::Title))
                    .col(string(Tasks::Status).default(DEFAULT_STATUS))
                    .col(text_null(Tasks::Content))
                    .col(timestamp_with_time_zone_null(Tasks::TimeStart))
                    .col(timestamp_with_time_zone_null(Tasks::TimeFinish))
                    .col(boolean(Tasks::Deleted).default(false))
                    .col(timestamp_with_time_zone_null(Tasks::DeletedAt))
                    .col(timestamp_with_time_zone(Tasks::CreatedAt))
                    .col(timestamp_with_time_zone(Tasks::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Title,
    Status,
    Content,
    TimeStart,
    TimeFinish,
    Deleted,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}
