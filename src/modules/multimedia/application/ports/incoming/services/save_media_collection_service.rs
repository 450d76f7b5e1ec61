use async_trait::async_trait;
use tracing::debug;

use crate::multimedia::application::{
    domain::{
        collection::MediaCollection, entities::MediaItem, policies::gallery_policy::GalleryPolicy,
    },
    ports::{
        incoming::use_cases::{
            SaveCollectionCommand, SaveCollectionError, SaveMediaCollectionUseCase,
        },
        outgoing::db::MediaCollectionRepository,
    },
};

pub struct SaveMediaCollectionService<R>
where
    R: MediaCollectionRepository,
{
    repository: R,
    policy: GalleryPolicy,
}

impl<R> SaveMediaCollectionService<R>
where
    R: MediaCollectionRepository,
{
    pub fn new(repository: R, policy: GalleryPolicy) -> Self {
        Self { repository, policy }
    }
}

#[async_trait]
impl<R> SaveMediaCollectionUseCase for SaveMediaCollectionService<R>
where
    R: MediaCollectionRepository,
{
    async fn execute(
        &self,
        command: SaveCollectionCommand,
    ) -> Result<Vec<MediaItem>, SaveCollectionError> {
        self.policy.check_items(&command.items)?;

        // Array position is authoritative; stale client orders are rewritten.
        let normalized =
            MediaCollection::from_positions(self.policy.max_items, command.items).snapshot();
        debug!(
            "Saving {} items for {}",
            normalized.len(),
            command.parent
        );

        let saved = self.repository.replace(command.parent, normalized).await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    use crate::multimedia::application::{
        domain::entities::{ParentRef, ParentTarget},
        ports::outgoing::db::MediaCollectionRepositoryError,
    };

    /// Assigns ids to new items and records what it was asked to store.
    #[derive(Clone, Default)]
    struct MockRepo {
        fail_with: Option<MediaCollectionRepositoryError>,
        captured: Arc<Mutex<Option<(ParentRef, Vec<MediaItem>)>>>,
    }

    #[async_trait]
    impl MediaCollectionRepository for MockRepo {
        async fn load(
            &self,
            _parent: ParentRef,
        ) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError> {
            unimplemented!("not needed for these tests")
        }

        async fn replace(
            &self,
            parent: ParentRef,
            items: Vec<MediaItem>,
        ) -> Result<Vec<MediaItem>, MediaCollectionRepositoryError> {
            *self.captured.lock().unwrap() = Some((parent, items.clone()));
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(items
                .into_iter()
                .map(|i| MediaItem::persisted(i.id.unwrap_or_else(Uuid::new_v4), i.url, i.order))
                .collect())
        }
    }

    fn command(items: Vec<MediaItem>) -> SaveCollectionCommand {
        SaveCollectionCommand {
            parent: ParentRef::new(ParentTarget::Project, Uuid::new_v4()),
            items,
        }
    }

    fn unsaved(url: &str, order: u32) -> MediaItem {
        MediaItem {
            id: None,
            url: url.to_string(),
            order,
        }
    }

    #[tokio::test]
    async fn test_save_renumbers_by_array_position() {
        let repo = MockRepo::default();
        let service = SaveMediaCollectionService::new(repo.clone(), GalleryPolicy::default());
        let kept_id = Uuid::new_v4();

        let saved = service
            .execute(command(vec![
                unsaved("https://cdn.test/b", 4),
                MediaItem::persisted(kept_id, "https://cdn.test/a", 1),
                unsaved("https://cdn.test/c", 9),
            ]))
            .await
            .unwrap();

        let (_, stored) = repo.captured.lock().unwrap().clone().unwrap();
        let urls: Vec<&str> = stored.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://cdn.test/b", "https://cdn.test/a", "https://cdn.test/c"]
        );
        assert_eq!(
            stored.iter().map(|i| i.order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(saved[1].id, Some(kept_id));
        assert!(saved.iter().all(|i| i.id.is_some()));
    }

    #[tokio::test]
    async fn test_save_keeps_dragged_order_despite_stale_orders() {
        let repo = MockRepo::default();
        let service = SaveMediaCollectionService::new(repo.clone(), GalleryPolicy::default());
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        // B was dragged in front of A but both still carry their old orders.
        service
            .execute(command(vec![
                MediaItem::persisted(b, "https://cdn.test/B", 1),
                MediaItem::persisted(a, "https://cdn.test/A", 0),
            ]))
            .await
            .unwrap();

        let (_, stored) = repo.captured.lock().unwrap().clone().unwrap();
        let urls: Vec<&str> = stored.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, vec!["https://cdn.test/B", "https://cdn.test/A"]);
        assert_eq!(stored[0].id, Some(b));
        assert_eq!(stored[0].order, 0);
        assert_eq!(stored[1].order, 1);
    }

    #[tokio::test]
    async fn test_save_rejects_over_capacity_without_touching_repository() {
        let repo = MockRepo::default();
        let service = SaveMediaCollectionService::new(
            repo.clone(),
            GalleryPolicy::default().with_max_items(1),
        );

        let err = service
            .execute(command(vec![
                unsaved("https://cdn.test/a", 0),
                unsaved("https://cdn.test/b", 1),
            ]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SaveCollectionError::CapacityExceeded {
                max_items: 1,
                actual: 2
            }
        );
        assert!(repo.captured.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_rejects_relative_url() {
        let service = SaveMediaCollectionService::new(MockRepo::default(), GalleryPolicy::default());

        let err = service
            .execute(command(vec![unsaved("/uploads/a.png", 0)]))
            .await
            .unwrap_err();

        assert!(matches!(err, SaveCollectionError::InvalidCollection(_)));
    }

    #[tokio::test]
    async fn test_save_empty_collection_clears_parent() {
        let repo = MockRepo::default();
        let service = SaveMediaCollectionService::new(repo.clone(), GalleryPolicy::default());

        let saved = service.execute(command(vec![])).await.unwrap();

        assert!(saved.is_empty());
        assert!(repo.captured.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_save_maps_repository_error() {
        let repo = MockRepo {
            fail_with: Some(MediaCollectionRepositoryError::DatabaseError("down".into())),
            ..MockRepo::default()
        };
        let service = SaveMediaCollectionService::new(repo, GalleryPolicy::default());

        let err = service
            .execute(command(vec![unsaved("https://cdn.test/a", 0)]))
            .await
            .unwrap_err();

        assert!(matches!(err, SaveCollectionError::RepositoryError(_)));
    }
}
