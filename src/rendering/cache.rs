use crate::rendering::raster::MarkerImage;
use lru::LruCache;
use once_cell::sync::OnceCell;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Slot = Arc<OnceCell<Arc<MarkerImage>>>;

/// In-memory image cache using LRU eviction
///
/// Each key owns a slot that is filled at most once. Concurrent lookups of
/// the same key share the slot, so only one of them composites and the others
/// wait for its result. A failed composite empties the slot again.
#[derive(Debug)]
pub struct MarkerCache<K: Hash + Eq> {
    entries: Mutex<LruCache<K, Slot>>,
}

/// Where a cached image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLookup {
    Hit,
    Miss,
}

impl<K: Hash + Eq + Clone> MarkerCache<K> {
    /// Create a cache holding at most `capacity` images
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, key: &K) -> Slot {
        let mut entries = self.lock();
        if let Some(slot) = entries.get(key) {
            return Arc::clone(slot);
        }
        let slot = Slot::default();
        entries.put(key.clone(), Arc::clone(&slot));
        slot
    }

    /// Returns the image for `key`, running `render` when there is none yet
    pub fn get_or_render<F>(
        &self,
        key: &K,
        render: F,
    ) -> crate::Result<(Arc<MarkerImage>, CacheLookup)>
    where
        F: FnOnce() -> crate::Result<MarkerImage>,
    {
        let slot = self.slot(key);
        let mut rendered = false;
        let result = slot.get_or_try_init(|| {
            rendered = true;
            render().map(Arc::new)
        });

        match result {
            Ok(image) => {
                let lookup = if rendered {
                    CacheLookup::Miss
                } else {
                    CacheLookup::Hit
                };
                Ok((Arc::clone(image), lookup))
            }
            Err(err) => {
                let mut entries = self.lock();
                if entries
                    .peek(key)
                    .map_or(false, |current| Arc::ptr_eq(current, &slot))
                {
                    entries.pop(key);
                }
                Err(err)
            }
        }
    }

    /// Get an image from the cache without rendering
    pub fn get(&self, key: &K) -> Option<Arc<MarkerImage>> {
        self.lock().get(key).and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&self, key: &K) -> Option<Arc<MarkerImage>> {
        self.lock().pop(key).and_then(|slot| slot.get().cloned())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Get the current number of cached images. Slots still being rendered
    /// are not counted.
    pub fn len(&self) -> usize {
        self.lock()
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}
