//! Create nomination table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nomination::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Nomination::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Nomination::StudentId).string_len(128).not_null())
                    .col(ColumnDef::new(Nomination::StudentName).string_len(256).not_null())
                    .col(ColumnDef::new(Nomination::RegNo).string_len(64).not_null())
                    .col(ColumnDef::new(Nomination::Email).string_len(256).not_null())
                    .col(ColumnDef::new(Nomination::Mobile).string_len(32).not_null())
                    .col(ColumnDef::new(Nomination::Year).string_len(4).not_null())
                    .col(ColumnDef::new(Nomination::Department).string_len(8).not_null())
                    .col(ColumnDef::new(Nomination::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Nomination::Title).string_len(512).not_null())
                    .col(ColumnDef::new(Nomination::Issuer).string_len(256).not_null())
                    .col(ColumnDef::new(Nomination::DateOfEvent).date().not_null())
                    .col(
                        ColumnDef::new(Nomination::MetaData)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(ColumnDef::new(Nomination::PhotoUrl).string_len(1024))
                    .col(ColumnDef::new(Nomination::ProofDocUrl).string_len(1024))
                    .col(
                        ColumnDef::new(Nomination::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Nomination::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: created_at (admin list, newest first)
        manager
            .create_index(
                Index::create()
                    .name("idx_nomination_created_at")
                    .table(Nomination::Table)
                    .col(Nomination::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (status, created_at) for the public wall
        manager
            .create_index(
                Index::create()
                    .name("idx_nomination_status_created_at")
                    .table(Nomination::Table)
                    .col(Nomination::Status)
                    .col(Nomination::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Index: (category, year) for filtered queries
        manager
            .create_index(
                Index::create()
                    .name("idx_nomination_category_year")
                    .table(Nomination::Table)
                    .col(Nomination::Category)
                    .col(Nomination::Year)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Nomination::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Nomination {
    Table,
    Id,
    StudentId,
    StudentName,
    RegNo,
    Email,
    Mobile,
    Year,
    Department,
    Category,
    Title,
    Issuer,
    DateOfEvent,
    MetaData,
    PhotoUrl,
    ProofDocUrl,
    Status,
    CreatedAt,
}
