use crate::multimedia::application::domain::entities::MediaItem;

/// Port towards the parent form that owns the collection's persistence.
///
/// Called synchronously from inside the session, so implementations must not
/// block.
pub trait CollectionObserver: Send + Sync {
    /// Receives the fully renumbered collection after every mutation.
    fn on_change(&self, items: &[MediaItem]);

    /// Busy while an upload batch is in flight.
    fn on_busy_changed(&self, _busy: bool) {}
}
