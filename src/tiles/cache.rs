use lru::LruCache;
use std::num::NonZeroUsize;

/// In-memory tile cache keyed by tile URL, using LRU eviction.
///
/// Keying by URL rather than `TileCoord` keeps tiles of different base
/// layers apart.
pub struct TileCache<T> {
    cache: LruCache<String, T>,
}

impl<T> TileCache<T> {
    /// Create a new tile cache with the given capacity (at least one entry)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Get a tile from the cache, marking it recently used
    pub fn get(&mut self, url: &str) -> Option<&T> {
        self.cache.get(url)
    }

    /// Insert a tile, returning the evicted entry if the cache was full
    pub fn put(&mut self, url: String, tile: T) -> Option<(String, T)> {
        self.cache.push(url, tile).filter(|(evicted, _)| !self.cache.contains(evicted))
    }

    /// Check if a tile is in the cache
    pub fn contains(&self, url: &str) -> bool {
        self.cache.contains(url)
    }

    /// Get the current number of cached tiles
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Clear all tiles from the cache
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
