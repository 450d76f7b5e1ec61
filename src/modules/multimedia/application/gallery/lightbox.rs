use serde::{Deserialize, Serialize};

use crate::multimedia::application::domain::{
    collection::{MediaCollection, OrderError},
    entities::MediaKey,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewerKey {
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Viewing {
    index: usize,
    key: MediaKey,
}

/// Modal viewer over the current order of a collection.
///
/// Navigation clamps at both ends. The viewed item is tracked by key, so
/// after a mutation [`reconcile`](Self::reconcile) follows it to its new
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    viewing: Option<Viewing>,
}

impl Lightbox {
    pub fn is_open(&self) -> bool {
        self.viewing.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.viewing.as_ref().map(|v| v.index)
    }

    pub fn current_key(&self) -> Option<&MediaKey> {
        self.viewing.as_ref().map(|v| &v.key)
    }

    pub fn open(&mut self, collection: &MediaCollection, index: usize) -> Result<(), OrderError> {
        let entry = collection.get(index).ok_or(OrderError::IndexOutOfRange {
            index,
            len: collection.len(),
        })?;
        self.viewing = Some(Viewing {
            index,
            key: entry.key().clone(),
        });
        Ok(())
    }

    pub fn close(&mut self) {
        self.viewing = None;
    }

    pub fn next(&mut self, collection: &MediaCollection) -> Option<usize> {
        let index = self.current_index()?;
        let last = collection.len().checked_sub(1)?;
        self.show(collection, (index + 1).min(last))
    }

    pub fn previous(&mut self, collection: &MediaCollection) -> Option<usize> {
        let index = self.current_index()?;
        self.show(collection, index.saturating_sub(1))
    }

    /// Applies a key press; returns the viewed index afterwards.
    pub fn handle_key(&mut self, key: ViewerKey, collection: &MediaCollection) -> Option<usize> {
        match key {
            ViewerKey::ArrowLeft => self.previous(collection),
            ViewerKey::ArrowRight => self.next(collection),
            ViewerKey::Escape => {
                self.close();
                None
            }
        }
    }

    /// Re-resolves the viewed item after the collection changed. If it is
    /// gone the viewer stays on the nearest remaining position, and closes
    /// once the collection is empty.
    pub fn reconcile(&mut self, collection: &MediaCollection) {
        let Some(viewing) = self.viewing.as_ref() else {
            return;
        };

        if let Some(index) = collection.index_of(&viewing.key) {
            self.viewing = Some(Viewing {
                index,
                key: viewing.key.clone(),
            });
            return;
        }

        match collection.len().checked_sub(1) {
            Some(last) => {
                let index = viewing.index.min(last);
                self.show(collection, index);
            }
            None => self.close(),
        }
    }

    fn show(&mut self, collection: &MediaCollection, index: usize) -> Option<usize> {
        match collection.get(index) {
            Some(entry) => {
                self.viewing = Some(Viewing {
                    index,
                    key: entry.key().clone(),
                });
                Some(index)
            }
            None => {
                self.close();
                None
            }
        }
    }
}
