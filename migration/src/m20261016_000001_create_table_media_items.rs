//! # Media Items Table Migration
//!
//! One row per image of an ordered collection. A collection is identified by
//! `(parent_type, parent_id)` where `parent_type` is `project`, `service` or
//! `subservice`.
//!
//! `display_order` is the zero-based position inside the collection. Saves
//! replace a collection as a whole, so orders are always contiguous at rest.
//!
//! ## Indexes
//! - `idx_media_items_parent_order`: loads a collection already sorted

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MediaItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MediaItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(MediaItems::ParentType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaItems::ParentId).uuid().not_null())
                    .col(ColumnDef::new(MediaItems::Url).text().not_null())
                    .col(
                        ColumnDef::new(MediaItems::DisplayOrder)
                            .integer()
                            .not_null()
                            .check(Expr::col(MediaItems::DisplayOrder).gte(0)),
                    )
                    .col(
                        ColumnDef::new(MediaItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_media_items_parent_order
                ON media_items (parent_type, parent_id, display_order);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_media_items_parent_order;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(MediaItems::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum MediaItems {
    Table,
    Id,
    ParentType,
    ParentId,
    Url,
    DisplayOrder,
    CreatedAt,
}
