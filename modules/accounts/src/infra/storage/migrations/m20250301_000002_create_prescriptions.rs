use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Prescriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prescriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prescriptions::UserId).uuid().not_null())
                    .col(ColumnDef::new(Prescriptions::Name).string().not_null())
                    .col(ColumnDef::new(Prescriptions::FileUrl).string().not_null())
                    .col(ColumnDef::new(Prescriptions::StoredPath).string().not_null())
                    .col(
                        ColumnDef::new(Prescriptions::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prescriptions_user_id")
                            .from(Prescriptions::Table, Prescriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_prescriptions_user_id")
                    .table(Prescriptions::Table)
                    .col(Prescriptions::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Prescriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Prescriptions {
    Table,
    Id,
    UserId,
    Name,
    FileUrl,
    StoredPath,
    UploadedAt,
}
