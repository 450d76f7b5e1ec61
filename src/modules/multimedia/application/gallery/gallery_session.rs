use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{info, warn};

use crate::multimedia::application::{
    domain::{
        batch::{BatchState, BatchTransitionError},
        collection::{MediaCollection, OrderError},
        entities::{MediaItem, MediaKey, ParentRef, UploadCandidate},
    },
    gallery::{
        lightbox::{Lightbox, ViewerKey},
        order_manager::OrderManager,
    },
    orchestrator::{BatchError, BatchReport, UploadOrchestrator},
    ports::outgoing::{cloud_storage::ObjectStore, CollectionObserver},
};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GalleryError {
    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("An upload batch is already in flight")]
    BatchInFlight,

    #[error("Items cannot be removed while an upload batch is in flight")]
    RemovalLocked,

    #[error("No item with key {0} in the collection")]
    UnknownItem(MediaKey),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Transition(#[from] BatchTransitionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadDisabledReason {
    AtCapacity,
    BatchInFlight,
}

impl UploadDisabledReason {
    pub fn message(&self) -> &'static str {
        match self {
            UploadDisabledReason::AtCapacity => "Maximum number of images reached",
            UploadDisabledReason::BatchInFlight => "An upload is already in progress",
        }
    }
}

/// Whether the upload trigger is usable right now, and why not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadAffordance {
    pub enabled: bool,
    pub remaining: usize,
    pub max_items: usize,
    pub disabled_reason: Option<UploadDisabledReason>,
}

struct SessionState {
    manager: OrderManager,
    batch: BatchState,
    lightbox: Lightbox,
}

/// Edit session over one parent's collection: uploads, drag reorder,
/// removal and the viewer all go through here.
///
/// State sits behind a mutex that is released before any await, so each
/// mutation is atomic from the outside.
pub struct GallerySession<S>
where
    S: ObjectStore,
{
    parent: ParentRef,
    orchestrator: UploadOrchestrator<S>,
    observer: Arc<dyn CollectionObserver>,
    state: Mutex<SessionState>,
}

impl<S> GallerySession<S>
where
    S: ObjectStore,
{
    pub fn new(
        parent: ParentRef,
        collection: MediaCollection,
        orchestrator: UploadOrchestrator<S>,
        observer: Arc<dyn CollectionObserver>,
    ) -> Self {
        let manager = OrderManager::new(collection, observer.clone());
        Self {
            parent,
            orchestrator,
            observer,
            state: Mutex::new(SessionState {
                manager,
                batch: BatchState::Idle,
                lightbox: Lightbox::default(),
            }),
        }
    }

    /// Opens a session over stored items, sorted and renumbered.
    pub fn hydrate(
        parent: ParentRef,
        items: Vec<MediaItem>,
        orchestrator: UploadOrchestrator<S>,
        observer: Arc<dyn CollectionObserver>,
    ) -> Self {
        let collection = MediaCollection::hydrate(orchestrator.policy().max_items, items);
        Self::new(parent, collection, orchestrator, observer)
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.lock().manager.snapshot()
    }

    pub fn batch_state(&self) -> BatchState {
        self.lock().batch
    }

    pub fn is_busy(&self) -> bool {
        self.lock().batch.is_busy()
    }

    pub fn upload_affordance(&self) -> UploadAffordance {
        let state = self.lock();
        let collection = state.manager.collection();
        let disabled_reason = if state.batch.is_busy() {
            Some(UploadDisabledReason::BatchInFlight)
        } else if collection.is_full() {
            Some(UploadDisabledReason::AtCapacity)
        } else {
            None
        };

        UploadAffordance {
            enabled: disabled_reason.is_none(),
            remaining: collection.remaining_capacity(),
            max_items: collection.capacity(),
            disabled_reason,
        }
    }

    /// Runs one upload batch against the collection and appends what made
    /// it, in offered order.
    pub async fn submit_batch(
        &self,
        files: Vec<UploadCandidate>,
    ) -> Result<BatchReport, GalleryError> {
        let prepared = {
            let mut state = self.lock();
            if state.batch.is_busy() {
                return Err(GalleryError::BatchInFlight);
            }
            state.batch.begin_validation()?;

            let remaining = state.manager.collection().remaining_capacity();
            match self.orchestrator.prepare(&self.parent, remaining, files) {
                Ok(prepared) => {
                    state.batch.begin_upload(prepared.in_flight())?;
                    prepared
                }
                Err(e) => {
                    state.batch.finish()?;
                    info!("Batch for {} refused: {}", self.parent, e);
                    return Err(e.into());
                }
            }
        };

        let guard = BusyGuard::arm(self);
        let outcome = self.orchestrator.upload(prepared).await;

        let report = {
            let mut state = self.lock();
            let state = &mut *state;
            state.batch.begin_aggregation()?;

            let mut report = outcome.report;
            let appended = state.manager.append(outcome.items);
            if appended.dropped > 0 {
                warn!(
                    "{} uploaded items for {} did not fit the collection",
                    appended.dropped, self.parent
                );
                report.dropped_over_capacity += appended.dropped;
                report.accepted = appended.appended;
            }

            state.lightbox.reconcile(state.manager.collection());
            state.batch.finish()?;
            report
        };
        drop(guard);

        info!(
            "Batch for {} done: {}/{} accepted",
            self.parent, report.accepted, report.requested
        );
        Ok(report)
    }

    pub fn remove(&self, key: &MediaKey) -> Result<MediaItem, GalleryError> {
        let mut state = self.lock();
        let state = &mut *state;
        if state.batch.is_busy() {
            return Err(GalleryError::RemovalLocked);
        }

        let index = state.manager.collection().index_of(key).ok_or_else(|| {
            warn!("Remove of unknown item {} ignored", key);
            GalleryError::UnknownItem(key.clone())
        })?;

        let removed = state.manager.remove(index)?;
        state.lightbox.reconcile(state.manager.collection());
        Ok(removed)
    }

    /// Drag-and-drop: moves `source` to where `target` currently sits.
    /// Returns `false` when either key no longer resolves or nothing moved.
    pub fn drop_item(&self, source: &MediaKey, target: &MediaKey) -> Result<bool, GalleryError> {
        let mut state = self.lock();
        let state = &mut *state;
        let collection = state.manager.collection();

        let (Some(from), Some(to)) = (collection.index_of(source), collection.index_of(target))
        else {
            warn!("Drop of {} onto {} could not be resolved", source, target);
            return Ok(false);
        };

        let moved = state.manager.reorder(from, to)?;
        if moved {
            state.lightbox.reconcile(state.manager.collection());
        }
        Ok(moved)
    }

    pub fn open_viewer(&self, index: usize) -> Result<(), GalleryError> {
        let mut state = self.lock();
        let state = &mut *state;
        state.lightbox.open(state.manager.collection(), index)?;
        Ok(())
    }

    pub fn close_viewer(&self) {
        self.lock().lightbox.close();
    }

    pub fn viewer_index(&self) -> Option<usize> {
        self.lock().lightbox.current_index()
    }

    pub fn viewer_next(&self) -> Option<usize> {
        let mut state = self.lock();
        let state = &mut *state;
        state.lightbox.next(state.manager.collection())
    }

    pub fn viewer_previous(&self) -> Option<usize> {
        let mut state = self.lock();
        let state = &mut *state;
        state.lightbox.previous(state.manager.collection())
    }

    pub fn viewer_key(&self, key: ViewerKey) -> Option<usize> {
        let mut state = self.lock();
        let state = &mut *state;
        state.lightbox.handle_key(key, state.manager.collection())
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panic inside a critical section never leaves the collection
        // half renumbered, so the poisoned state is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reports busy for the lifetime of an upload and puts the session back to
/// `Idle` if the batch future is dropped mid-flight.
struct BusyGuard<'a, S>
where
    S: ObjectStore,
{
    session: &'a GallerySession<S>,
}

impl<'a, S> BusyGuard<'a, S>
where
    S: ObjectStore,
{
    fn arm(session: &'a GallerySession<S>) -> Self {
        session.observer.on_busy_changed(true);
        Self { session }
    }
}

impl<S> Drop for BusyGuard<'_, S>
where
    S: ObjectStore,
{
    fn drop(&mut self) {
        {
            let mut state = self.session.lock();
            if state.batch.is_busy() {
                warn!(
                    "Batch for {} abandoned in state {}",
                    self.session.parent, state.batch
                );
                state.batch.reset();
            }
        }
        self.session.observer.on_busy_changed(false);
    }
}
