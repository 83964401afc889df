//! Per-directory listing cache.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tokio::sync::broadcast;
use tracing::debug;

use dirdoc_core::{DirdocError, Result};

use crate::listing::DirectoryListing;
use crate::reader::read_directory;

/// Capacity of the notification channel.
const EVENT_CHANNEL_SIZE: usize = 100;

/// Notification sent to views of a cached directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// The rendered content of `path` is outdated.
    ContentChanged { path: PathBuf },
    /// The cache entry for `path` was dropped.
    Evicted { path: PathBuf },
}

/// One cached listing per directory path.
#[derive(Debug)]
pub struct DirectoryCache {
    listings: HashMap<PathBuf, DirectoryListing>,
    events_tx: broadcast::Sender<CacheEvent>,
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        Self {
            listings: HashMap::new(),
            events_tx,
        }
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events_tx.subscribe()
    }

    /// Return the listing for `path`, re-reading the directory if it is not
    /// cached or is stale.
    ///
    /// On refresh, marks are carried over by entry location. If the
    /// directory cannot be listed the error is returned and the cache is
    /// left as it was.
    pub async fn read(&mut self, path: &Path) -> Result<&DirectoryListing> {
        let fresh = self.listings.get(path).is_some_and(|l| !l.is_stale());
        if !fresh {
            let entries = read_directory(path).await?;
            let mut listing = DirectoryListing::new(path, entries);
            if let Some(previous) = self.listings.get(path) {
                listing.remap_marks(previous);
            }
            debug!(
                path = %path.display(),
                entries = listing.len(),
                marked = listing.marked().len(),
                "Refreshed listing"
            );
            self.listings.insert(path.to_path_buf(), listing);
        }
        self.get(path)
    }

    /// The cached listing for `path`, without any I/O.
    pub fn get(&self, path: &Path) -> Result<&DirectoryListing> {
        self.listings.get(path).ok_or_else(|| DirdocError::CacheMiss {
            path: path.to_path_buf(),
        })
    }

    pub(crate) fn get_mut(&mut self, path: &Path) -> Result<&mut DirectoryListing> {
        self.listings.get_mut(path).ok_or_else(|| DirdocError::CacheMiss {
            path: path.to_path_buf(),
        })
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.listings.contains_key(path)
    }

    /// Paths with a cache entry.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.listings.keys().map(PathBuf::as_path)
    }

    /// Flag `path` for re-reading and notify its views.
    ///
    /// Uncached paths are left alone, but the notification is still sent.
    pub fn invalidate(&mut self, path: &Path, clear_marks: bool) {
        if let Some(listing) = self.listings.get_mut(path) {
            listing.mark_stale();
            if clear_marks {
                listing.clear_marks();
            }
        }
        debug!(path = %path.display(), clear_marks, "Invalidated listing");
        self.notify(path);
    }

    /// Drop the cache entry for `path`.
    pub fn evict(&mut self, path: &Path) -> bool {
        let evicted = self.listings.remove(path).is_some();
        if evicted {
            debug!(path = %path.display(), "Evicted listing");
            let _ = self.events_tx.send(CacheEvent::Evicted {
                path: path.to_path_buf(),
            });
        }
        evicted
    }

    pub(crate) fn notify(&self, path: &Path) {
        // No subscribers is fine.
        let _ = self.events_tx.send(CacheEvent::ContentChanged {
            path: path.to_path_buf(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fresh_listing_is_served_from_cache() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), "").unwrap();

        let mut cache = DirectoryCache::new();
        assert_eq!(cache.read(temp.path()).await.unwrap().len(), 1);

        fs::write(temp.path().join("b"), "").unwrap();
        assert_eq!(cache.read(temp.path()).await.unwrap().len(), 1);

        cache.invalidate(temp.path(), false);
        assert_eq!(cache.read(temp.path()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_read_keeps_previous_listing() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("d");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a"), "").unwrap();

        let mut cache = DirectoryCache::new();
        cache.read(&dir).await.unwrap();
        cache.invalidate(&dir, false);
        fs::remove_dir_all(&dir).unwrap();

        assert!(cache.read(&dir).await.is_err());
        assert_eq!(cache.get(&dir).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_notifies_even_when_uncached() {
        let mut cache = DirectoryCache::new();
        let mut events = cache.subscribe();

        cache.invalidate(Path::new("/nowhere"), true);
        assert_eq!(
            events.recv().await.unwrap(),
            CacheEvent::ContentChanged {
                path: PathBuf::from("/nowhere")
            }
        );
        assert!(!cache.contains(Path::new("/nowhere")));
    }

    #[tokio::test]
    async fn test_evict() {
        let temp = TempDir::new().unwrap();
        let mut cache = DirectoryCache::new();
        cache.read(temp.path()).await.unwrap();

        assert!(cache.evict(temp.path()));
        assert!(!cache.evict(temp.path()));
        assert!(matches!(
            cache.get(temp.path()),
            Err(DirdocError::CacheMiss { .. })
        ));
    }
}
