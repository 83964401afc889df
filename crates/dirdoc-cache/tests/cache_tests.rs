use dirdoc_cache::{CacheEvent, DirectoryCache, LineSelection, MarkMode};
use dirdoc_core::{DirdocError, FileEntry};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn populate(dir: &Path, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), name).unwrap();
    }
}

fn marked_names(cache: &DirectoryCache, dir: &Path) -> Vec<String> {
    cache
        .get(dir)
        .unwrap()
        .marked_entries()
        .map(|e| e.name().to_string())
        .collect()
}

#[tokio::test]
async fn test_marks_follow_entries_across_refresh() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();
    populate(dir, &["A", "C"]);

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();
    cache
        .update_marks(dir, LineSelection::lines(1, 2), MarkMode::On)
        .unwrap();
    assert_eq!(marked_names(&cache, dir), ["A", "C"]);

    fs::remove_file(dir.join("A")).unwrap();
    populate(dir, &["B"]);
    cache.invalidate(dir, false);
    let listing = cache.read(dir).await.unwrap();

    let names: Vec<&str> = listing.entries().iter().map(FileEntry::name).collect();
    assert_eq!(names, ["B", "C"]);
    assert_eq!(listing.marked(), &[1]);
    assert_eq!(marked_names(&cache, dir), ["C"]);
}

#[tokio::test]
async fn test_invalidate_with_clear_drops_marks() {
    let temp = TempDir::new().unwrap();
    populate(temp.path(), &["a", "b"]);

    let mut cache = DirectoryCache::new();
    cache.read(temp.path()).await.unwrap();
    cache
        .update_marks(temp.path(), LineSelection::at(0), MarkMode::ToggleAll)
        .unwrap();
    cache.invalidate(temp.path(), true);

    assert!(cache.read(temp.path()).await.unwrap().marked().is_empty());
}

#[tokio::test]
async fn test_toggle_twice_restores_marks() {
    let temp = TempDir::new().unwrap();
    populate(temp.path(), &["a", "b", "c", "d"]);
    let dir = temp.path();

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();
    cache.update_marks(dir, LineSelection::at(4), MarkMode::On).unwrap();
    assert_eq!(cache.get(dir).unwrap().marked(), &[3]);

    let range = LineSelection::lines(1, 3);
    cache.update_marks(dir, range, MarkMode::Toggle).unwrap();
    assert_eq!(cache.get(dir).unwrap().marked(), &[0, 1, 2, 3]);

    cache.update_marks(dir, range, MarkMode::Toggle).unwrap();
    assert_eq!(cache.get(dir).unwrap().marked(), &[3]);
}

#[tokio::test]
async fn test_partially_marked_range_toggles_on() {
    let temp = TempDir::new().unwrap();
    populate(temp.path(), &["a", "b", "c"]);
    let dir = temp.path();

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();
    cache.update_marks(dir, LineSelection::at(2), MarkMode::On).unwrap();

    cache
        .update_marks(dir, LineSelection::lines(1, 2), MarkMode::Toggle)
        .unwrap();
    assert_eq!(cache.get(dir).unwrap().marked(), &[0, 1]);
}

#[tokio::test]
async fn test_toggle_all() {
    let temp = TempDir::new().unwrap();
    populate(temp.path(), &["a", "b", "c"]);
    let dir = temp.path();

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();

    // None marked: marks all.
    cache.update_marks(dir, LineSelection::at(2), MarkMode::ToggleAll).unwrap();
    assert_eq!(cache.get(dir).unwrap().marked(), &[0, 1, 2]);

    // All marked: unmarks all.
    cache.update_marks(dir, LineSelection::at(2), MarkMode::ToggleAll).unwrap();
    assert!(cache.get(dir).unwrap().marked().is_empty());

    // Mixed: marks all.
    cache.update_marks(dir, LineSelection::at(2), MarkMode::On).unwrap();
    cache.update_marks(dir, LineSelection::at(2), MarkMode::ToggleAll).unwrap();
    assert_eq!(cache.get(dir).unwrap().marked(), &[0, 1, 2]);
}

#[tokio::test]
async fn test_header_line_widens_and_cursor_advance() {
    let temp = TempDir::new().unwrap();
    populate(temp.path(), &["a", "b", "c"]);
    let dir = temp.path();

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();

    let outcome = cache.update_marks(dir, LineSelection::at(0), MarkMode::On).unwrap();
    assert!(outcome.changed);
    assert!(!outcome.advance_cursor);
    assert_eq!(cache.get(dir).unwrap().marked(), &[0, 1, 2]);

    let outcome = cache.update_marks(dir, LineSelection::at(1), MarkMode::Off).unwrap();
    assert!(outcome.advance_cursor);
    assert_eq!(cache.get(dir).unwrap().marked(), &[1, 2]);

    let outcome = cache.update_marks(dir, LineSelection::at(3), MarkMode::Off).unwrap();
    assert!(!outcome.advance_cursor);
    assert_eq!(cache.get(dir).unwrap().marked(), &[1]);
}

#[tokio::test]
async fn test_empty_range_is_noop() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();
    let mut events = cache.subscribe();

    let outcome = cache.update_marks(dir, LineSelection::at(0), MarkMode::Toggle).unwrap();
    assert!(!outcome.changed);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_marking_notifies_views() {
    let temp = TempDir::new().unwrap();
    populate(temp.path(), &["a"]);
    let dir = temp.path();

    let mut cache = DirectoryCache::new();
    cache.read(dir).await.unwrap();
    let mut events = cache.subscribe();

    cache.update_marks(dir, LineSelection::at(1), MarkMode::On).unwrap();
    assert_eq!(
        events.recv().await.unwrap(),
        CacheEvent::ContentChanged {
            path: dir.to_path_buf()
        }
    );
    assert!(!cache.get(dir).unwrap().is_stale());
}

#[test]
fn test_marking_uncached_directory_is_cache_miss() {
    let mut cache = DirectoryCache::new();
    let err = cache
        .update_marks(Path::new("/nowhere"), LineSelection::at(1), MarkMode::On)
        .unwrap_err();
    assert!(matches!(err, DirdocError::CacheMiss { .. }));
    assert!(err.is_recoverable());
}
