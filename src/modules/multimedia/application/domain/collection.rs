use crate::multimedia::application::domain::entities::{MediaItem, MediaKey};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Index {index} is out of range for a collection of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result of an append: how many items made it in and how many were cut off
/// by the capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOutcome {
    pub appended: usize,
    pub dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    key: MediaKey,
    item: MediaItem,
}

impl MediaEntry {
    pub fn key(&self) -> &MediaKey {
        &self.key
    }

    pub fn item(&self) -> &MediaItem {
        &self.item
    }
}

/// Capacity-bounded ordered sequence of media items for one parent.
///
/// At rest the collection always satisfies:
/// - `order` values are exactly `0..len`, one per item, equal to the position;
/// - `len <= capacity`.
///
/// Every mutation renumbers before returning.
#[derive(Debug, Clone)]
pub struct MediaCollection {
    entries: Vec<MediaEntry>,
    capacity: usize,
    next_mount_seq: u64,
}

impl MediaCollection {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            next_mount_seq: 0,
        }
    }

    /// Builds a collection from stored items whose array position may not
    /// match their `order`.
    ///
    /// Items are sorted ascending by `order`; ties keep their original
    /// relative position. Anything past the capacity is discarded.
    pub fn hydrate(capacity: usize, mut items: Vec<MediaItem>) -> Self {
        // sort_by_key is stable
        items.sort_by_key(|item| item.order);

        if items.len() > capacity {
            tracing::warn!(
                "Hydrated collection holds {} items, truncating to capacity {}",
                items.len(),
                capacity
            );
            items.truncate(capacity);
        }

        let mut collection = Self::new(capacity);
        for item in items {
            collection.mount(item);
        }
        collection.renumber();
        collection
    }

    /// Builds a collection from a client-held array. Array position is the
    /// order; any `order` the client sent is overwritten.
    pub fn from_positions(capacity: usize, mut items: Vec<MediaItem>) -> Self {
        items.truncate(capacity);

        let mut collection = Self::new(capacity);
        for item in items {
            collection.mount(item);
        }
        collection.renumber();
        collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.entries.len())
    }

    pub fn is_full(&self) -> bool {
        self.remaining_capacity() == 0
    }

    pub fn entries(&self) -> &[MediaEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&MediaEntry> {
        self.entries.get(index)
    }

    /// Current position of the item identified by `key`.
    pub fn index_of(&self, key: &MediaKey) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.key == key)
    }

    pub fn snapshot(&self) -> Vec<MediaItem> {
        self.entries.iter().map(|entry| entry.item.clone()).collect()
    }

    /// Appends `new_items` after the existing items, keeping their relative
    /// order, then renumbers. Items beyond the remaining capacity are dropped.
    pub fn append(&mut self, new_items: Vec<MediaItem>) -> AppendOutcome {
        let remaining = self.remaining_capacity();
        let offered = new_items.len();
        let appended = offered.min(remaining);

        for item in new_items.into_iter().take(appended) {
            self.mount(item);
        }
        self.renumber();

        AppendOutcome {
            appended,
            dropped: offered - appended,
        }
    }

    /// Removes the item at `index`; later items shift down by one.
    ///
    /// An out-of-range index leaves the collection untouched.
    pub fn remove(&mut self, index: usize) -> Result<MediaItem, OrderError> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        self.renumber();
        Ok(removed.item)
    }

    /// Moves the item at `from` to `to` (remove then insert).
    ///
    /// Returns `Ok(false)` when `from == to`. Out-of-range indices leave the
    /// collection untouched.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<bool, OrderError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(false);
        }

        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        self.renumber();
        Ok(true)
    }

    /// True when every item's `order` equals its position.
    pub fn is_contiguous(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(index, entry)| entry.item.order as usize == index)
    }

    fn check_index(&self, index: usize) -> Result<(), OrderError> {
        if index >= self.entries.len() {
            return Err(OrderError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }

    fn mount(&mut self, item: MediaItem) {
        let key = match item.id {
            Some(id) => MediaKey::Persisted { id },
            None => {
                let seq = self.next_mount_seq;
                MediaKey::Mounted {
                    seq,
                    url: item.url.clone(),
                }
            }
        };
        self.next_mount_seq += 1;
        self.entries.push(MediaEntry { key, item });
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.item.order = index as u32;
        }
    }
}
