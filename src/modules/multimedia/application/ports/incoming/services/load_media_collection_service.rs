use async_trait::async_trait;

use crate::multimedia::application::{
    domain::{collection::MediaCollection, entities::ParentRef, policies::gallery_policy::GalleryPolicy},
    ports::{
        incoming::use_cases::{CollectionView, LoadCollectionError, LoadMediaCollectionUseCase},
        outgoing::db::MediaCollectionRepository,
    },
};

pub struct LoadMediaCollectionService<R>
where
    R: MediaCollectionRepository,
{
    repository: R,
    policy: GalleryPolicy,
}

impl<R> LoadMediaCollectionService<R>
where
    R: MediaCollectionRepository,
{
    pub fn new(repository: R, policy: GalleryPolicy) -> Self {
        Self { repository, policy }
    }
}

#[async_trait]
impl<R> LoadMediaCollectionUseCase for LoadMediaCollectionService<R>
where
    R: MediaCollectionRepository,
{
    async fn execute(&self, parent: ParentRef) -> Result<CollectionView, LoadCollectionError> {
        let stored = self.repository.load(parent).await?;
        let collection = MediaCollection::hydrate(self.policy.max_items, stored);

        Ok(CollectionView {
            parent,
            items: collection.snapshot(),
            max_items: collection.capacity(),
            remaining: collection.remaining_capacity(),
        })
    }
}
