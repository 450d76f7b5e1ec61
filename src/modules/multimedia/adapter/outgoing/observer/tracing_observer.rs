use tracing::{debug, info};

use crate::multimedia::application::{
    domain::entities::{MediaItem, ParentRef},
    ports::outgoing::CollectionObserver,
};

/// Observer for server-side sessions: the HTTP response carries the final
/// collection, so changes are only logged.
pub struct TracingCollectionObserver {
    scope: String,
}

impl TracingCollectionObserver {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn for_parent(parent: &ParentRef) -> Self {
        Self::new(parent.to_string())
    }
}

impl Default for TracingCollectionObserver {
    fn default() -> Self {
        Self::new("gallery")
    }
}

impl CollectionObserver for TracingCollectionObserver {
    fn on_change(&self, items: &[MediaItem]) {
        let orders: Vec<u32> = items.iter().map(|i| i.order).collect();
        debug!(
            "[{}] collection changed: {} items, orders {:?}",
            self.scope,
            items.len(),
            orders
        );
    }

    fn on_busy_changed(&self, busy: bool) {
        info!("[{}] upload busy = {}", self.scope, busy);
    }
}
