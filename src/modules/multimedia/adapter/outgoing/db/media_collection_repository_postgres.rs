use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Statement, TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::sea_orm_entity::media_items::{self, Column, Entity as MediaItems};
use crate::multimedia::application::{
    domain::entities::{MediaItem, ParentRef},
    ports::outgoing::db::{MediaCollectionRepository, MediaCollectionRepositoryError},
};

// ============================================================================
// Repository Implementation (Production)
// ============================================================================

#[derive(Clone)]
pub struct MediaCollectionRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl MediaCollectionRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    // =====================================================
    // SQL builders
    // =====================================================

    fn delete_collection_stmt(parent_type: &str, parent_id: Uuid) -> Statement {
        Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            DELETE FROM media_items
            WHERE parent_type = $1
              AND parent_id = $2
            "#,
            vec![parent_type.into(), parent_id.into()],
        )
    }

    fn insert_item_stmt(
        id: Uuid,
        parent_type: &str,
        parent_id: Uuid,
        url: &str,
        display_order: i32,
        now: chrono::DateTime<chrono::FixedOffset>,
    ) -> Statement {
        Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            INSERT INTO media_items (
              id,
              parent_type, parent_id,
              url, display_order,
              created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
            vec![
                id.into(),
                parent_type.into(),
                parent_id.into(),
                url.into(),
                display_order.into(),
                now.into(),
            ],
        )
    }

    // =====================================================
    // Mapping helpers
    // =====================================================

    fn map_db_err(e: DbErr) -> MediaCollectionRepositoryError {
        MediaCollectionRepositoryError::DatabaseError(e.to_string())
    }

    fn to_media_item(row: media_items::Model) -> Result<MediaItem, MediaCollectionRepositoryError> {
        let order = u32::try_from(row.display_order).map_err(|_| {
            MediaCollectionRepositoryError::DatabaseError(format!(
                "negative display_order {} on media item {}",
                row.display_order, row.id
            ))
        })?;
        Ok(MediaItem::persisted(row.id, row.url, order))
    }

    fn to_display_order(order: u32) -> Result<i32, MediaCollectionRepositoryError> {
        i32::try_from(order).map_err(|_| {
            MediaCollectionRepositoryError::DatabaseError(format!(
                "display_order {} does not fit the column",
                order
            ))
        })
    }

    // =====================================================
    // Facade hook: lets tests supply a fake DB/txn
    // =====================================================

    async fn replace_with_db<D: CollectionDb>(
        db: &D,
        parent: ParentRef,
        items: Vec<MediaItem>,
    ) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError> {
        let now = Utc::now().fixed_offset();
        let parent_type = parent.target.to_string();

        // Ids and column values are settled before the transaction opens.
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let id = item.id.unwrap_or_else(Uuid::new_v4);
            let display_order = Self::to_display_order(item.order)?;
            rows.push((id, display_order, MediaItem::persisted(id, item.url, item.order)));
        }

        let mut txn = db.begin().await.map_err(Self::map_db_err)?;

        if let Err(e) = txn
            .execute(Self::delete_collection_stmt(&parent_type, parent.id))
            .await
        {
            let _ = txn.rollback().await;
            return Err(Self::map_db_err(e));
        }

        for (id, display_order, item) in &rows {
            if let Err(e) = txn
                .execute(Self::insert_item_stmt(
                    *id,
                    &parent_type,
                    parent.id,
                    &item.url,
                    *display_order,
                    now,
                ))
                .await
            {
                let _ = txn.rollback().await;
                return Err(Self::map_db_err(e));
            }
        }

        txn.commit().await.map_err(Self::map_db_err)?;

        debug!("Stored {} media items for {}", rows.len(), parent);
        Ok(rows.into_iter().map(|(_, _, item)| item).collect())
    }
}

#[async_trait]
impl MediaCollectionRepository for MediaCollectionRepositoryPostgres {
    async fn load(
        &self,
        parent: ParentRef,
    ) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError> {
        let rows = MediaItems::find()
            .filter(Column::ParentType.eq(parent.target.to_string()))
            .filter(Column::ParentId.eq(parent.id))
            .order_by_asc(Column::DisplayOrder)
            .order_by_asc(Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(Self::map_db_err)?;

        rows.into_iter().map(Self::to_media_item).collect()
    }

    async fn replace(
        &self,
        parent: ParentRef,
        items: Vec<MediaItem>,
    ) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError> {
        let db = SeaOrmDb {
            db: self.db.clone(),
        };
        Self::replace_with_db(&db, parent, items).await
    }
}

// ============================================================================
// Minimal DB Facade (so write tests do not rely on MockDatabase txn behavior)
// ============================================================================

#[async_trait]
trait CollectionDb: Send + Sync {
    type Txn: CollectionTxn;
    async fn begin(&self) -> Result<Self::Txn, DbErr>;
}

#[async_trait]
trait CollectionTxn: Send {
    async fn execute(&mut self, stmt: Statement) -> Result<(), DbErr>;
    async fn commit(self) -> Result<(), DbErr>;
    async fn rollback(self) -> Result<(), DbErr>;
}

struct SeaOrmDb {
    db: Arc<DatabaseConnection>,
}

struct SeaOrmTxn {
    txn: sea_orm::DatabaseTransaction,
}

#[async_trait]
impl CollectionDb for SeaOrmDb {
    type Txn = SeaOrmTxn;

    async fn begin(&self) -> Result<Self::Txn, DbErr> {
        let txn = self.db.begin().await?;
        Ok(SeaOrmTxn { txn })
    }
}

#[async_trait]
impl CollectionTxn for SeaOrmTxn {
    async fn execute(&mut self, stmt: Statement) -> Result<(), DbErr> {
        self.txn.execute(stmt).await?;
        Ok(())
    }

    async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}
