use std::sync::Arc;

use async_trait::async_trait;

use crate::multimedia::application::{
    domain::{collection::MediaCollection, policies::gallery_policy::GalleryPolicy},
    gallery::GallerySession,
    orchestrator::UploadOrchestrator,
    ports::{
        incoming::use_cases::{
            UploadBatchCommand, UploadBatchError, UploadBatchResult, UploadMediaBatchUseCase,
        },
        outgoing::{cloud_storage::ObjectStore, CollectionObserver},
    },
};

/// Runs one upload batch against the collection a client holds and hands
/// back the renumbered result. Nothing is persisted here.
pub struct UploadMediaBatchService<S>
where
    S: ObjectStore + Clone,
{
    store: S,
    policy: GalleryPolicy,
    observer: Arc<dyn CollectionObserver>,
}

impl<S> UploadMediaBatchService<S>
where
    S: ObjectStore + Clone,
{
    pub fn new(store: S, policy: GalleryPolicy, observer: Arc<dyn CollectionObserver>) -> Self {
        Self {
            store,
            policy,
            observer,
        }
    }
}

#[async_trait]
impl<S> UploadMediaBatchUseCase for UploadMediaBatchService<S>
where
    S: ObjectStore + Clone,
{
    async fn execute(
        &self,
        command: UploadBatchCommand,
    ) -> Result<UploadBatchResult, UploadBatchError> {
        self.policy.check_items(&command.items)?;

        let orchestrator = UploadOrchestrator::new(self.store.clone(), self.policy.clone());
        // The client's array order is authoritative, not its `order` fields.
        let collection = MediaCollection::from_positions(self.policy.max_items, command.items);
        let session = GallerySession::new(
            command.parent,
            collection,
            orchestrator,
            self.observer.clone(),
        );

        let report = session.submit_batch(command.files).await?;

        Ok(UploadBatchResult {
            items: session.items(),
            report,
            affordance: session.upload_affordance(),
        })
    }
}
