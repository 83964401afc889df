//! Deterministic ordering of directory entries.

use std::cmp::Ordering;

use crate::FileEntry;

/// Directories first, then ordinal comparison of the full path.
pub fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.location.as_os_str().cmp(b.location.as_os_str()))
}

/// Sort entries in display order.
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(compare_entries);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FileEntry {
        FileEntry::new(path, false, false)
    }

    fn dir(path: &str) -> FileEntry {
        FileEntry::new(path, true, false)
    }

    #[test]
    fn test_directories_before_files() {
        let mut entries = vec![file("/d/a.txt"), dir("/d/zeta"), file("/d/B.txt"), dir("/d/Alpha")];
        sort_entries(&mut entries);

        let names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["Alpha", "zeta", "B.txt", "a.txt"]);
    }

    #[test]
    fn test_ordinal_comparison() {
        assert_eq!(compare_entries(&file("/d/B"), &file("/d/a")), Ordering::Less);
        assert_eq!(compare_entries(&file("/d/a"), &file("/d/a")), Ordering::Equal);
        assert_eq!(compare_entries(&dir("/d/z"), &file("/d/a")), Ordering::Less);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut entries = vec![file("/d/c"), dir("/d/b"), file("/d/a"), dir("/d/a-dir")];
        sort_entries(&mut entries);
        let once = entries.clone();
        sort_entries(&mut entries);
        assert_eq!(once, entries);
    }
}
