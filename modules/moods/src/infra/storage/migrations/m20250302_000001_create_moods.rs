use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Moods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Moods::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Moods::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Moods::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Moods::Day).date().not_null())
                    .col(ColumnDef::new(Moods::Mood).string_len(16).not_null())
                    .col(ColumnDef::new(Moods::Notes).string_len(500).null())
                    .col(ColumnDef::new(Moods::Symptoms).json().not_null())
                    .col(
                        ColumnDef::new(Moods::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Moods::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // one entry per user per UTC day; the upsert conflicts on this
        manager
            .create_index(
                Index::create()
                    .name("idx_moods_user_day")
                    .table(Moods::Table)
                    .col(Moods::UserId)
                    .col(Moods::Day)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_moods_user_date")
                    .table(Moods::Table)
                    .col(Moods::UserId)
                    .col(Moods::Date)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Moods::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Moods {
    Table,
    Id,
    UserId,
    Date,
    Day,
    Mood,
    Notes,
    Symptoms,
    CreatedAt,
    UpdatedAt,
}
