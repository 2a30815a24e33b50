//! In-memory watch registry

use std::sync::Arc;

use parking_lot::RwLock;

use super::model::Watch;

/// Append-only registry of watches.
///
/// Registration appends; the sweeper iterates a snapshot. Watches are never
/// removed: a fired watch stays in the store but is inert for further
/// notification. Ids are dense insertion indices, so snapshot order equals
/// insertion order.
#[derive(Default)]
pub struct WatchStore {
    watches: RwLock<Vec<Arc<Watch>>>,
}

impl WatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a watch and return its assigned id.
    pub fn insert(&self, watch: Watch) -> Arc<Watch> {
        let mut watches = self.watches.write();
        let watch = Arc::new(watch.with_id(watches.len() as u64));
        watches.push(Arc::clone(&watch));
        watch
    }

    /// Stable, insertion-ordered view for one sweep.
    ///
    /// A watch inserted while a sweep iterates an earlier snapshot is picked
    /// up by the next snapshot.
    pub fn snapshot(&self) -> Vec<Arc<Watch>> {
        self.watches.read().clone()
    }

    pub fn get(&self, id: u64) -> Option<Arc<Watch>> {
        self.watches.read().get(id as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.watches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.read().is_empty()
    }
}
