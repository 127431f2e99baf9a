// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250101_000002_create_jobs::Jobs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create tags table
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Name).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Tags::Color)
                            .string_len(16)
                            .not_null()
                            .default("#6a11cb"),
                    )
                    .to_owned(),
            )
            .await?;

        // Create job_tags join table
        manager
            .create_table(
                Table::create()
                    .table(JobTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JobTags::JobId).big_integer().not_null())
                    .col(ColumnDef::new(JobTags::TagId).big_integer().not_null())
                    .primary_key(Index::create().col(JobTags::JobId).col(JobTags::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_tags_job")
                            .from(JobTags::Table, JobTags::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_tags_tag")
                            .from(JobTags::Table, JobTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    Color,
}

#[derive(DeriveIden)]
enum JobTags {
    Table,
    JobId,
    TagId,
}
