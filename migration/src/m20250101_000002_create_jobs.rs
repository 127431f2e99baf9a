// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create jobs table
        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Jobs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Jobs::TargetUrl).text().not_null())
                    .col(ColumnDef::new(Jobs::CssSelector).string().not_null())
                    .col(ColumnDef::new(Jobs::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_jobs_owner")
                            .from(Jobs::Table, Jobs::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create job_results table
        manager
            .create_table(
                Table::create()
                    .table(JobResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobResults::JobId).big_integer().not_null())
                    .col(ColumnDef::new(JobResults::ExtractedText).text().not_null())
                    .col(
                        ColumnDef::new(JobResults::ScrapedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_results_job")
                            .from(JobResults::Table, JobResults::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_owner")
                    .table(Jobs::Table)
                    .col(Jobs::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_results_job")
                    .table(JobResults::Table)
                    .col(JobResults::JobId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobResults::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Jobs {
    Table,
    Id,
    TargetUrl,
    CssSelector,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JobResults {
    Table,
    Id,
    JobId,
    ExtractedText,
    ScrapedAt,
}
