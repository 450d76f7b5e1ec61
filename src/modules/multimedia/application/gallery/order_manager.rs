use std::sync::Arc;

use tracing::{debug, warn};

use crate::multimedia::application::{
    domain::{
        collection::{AppendOutcome, MediaCollection, OrderError},
        entities::MediaItem,
    },
    ports::outgoing::CollectionObserver,
};

/// Single writer of a collection's order. Every effective mutation is
/// followed by exactly one `on_change` with the renumbered items.
pub struct OrderManager {
    collection: MediaCollection,
    observer: Arc<dyn CollectionObserver>,
}

impl OrderManager {
    pub fn new(collection: MediaCollection, observer: Arc<dyn CollectionObserver>) -> Self {
        Self {
            collection,
            observer,
        }
    }

    pub fn collection(&self) -> &MediaCollection {
        &self.collection
    }

    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.collection.snapshot()
    }

    pub fn append(&mut self, items: Vec<MediaItem>) -> AppendOutcome {
        let outcome = self.collection.append(items);
        if outcome.appended > 0 {
            self.publish("append");
        }
        outcome
    }

    pub fn remove(&mut self, index: usize) -> Result<MediaItem, OrderError> {
        let removed = self.collection.remove(index).inspect_err(|e| {
            warn!("Remove ignored: {}", e);
        })?;
        self.publish("remove");
        Ok(removed)
    }

    /// `Ok(false)` when nothing moved.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, OrderError> {
        let moved = self.collection.reorder(from, to).inspect_err(|e| {
            warn!("Reorder {} -> {} ignored: {}", from, to, e);
        })?;
        if moved {
            self.publish("reorder");
        }
        Ok(moved)
    }

    fn publish(&self, cause: &str) {
        let items = self.collection.snapshot();
        debug!("Collection changed by {}: {} items", cause, items.len());
        self.observer.on_change(&items);
    }
}
