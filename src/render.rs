//! Text rendering of directory documents.
//!
//! Line 0 of a document is the header naming the directory; line `n` shows
//! entry `n - 1`. Hidden entries may be left out of the output but keep
//! their line numbers, so ranges typed by the user always map to the
//! same entries.

use std::path::Path;

use chrono::{DateTime, Local};
use dirdoc_cache::DirectoryListing;
use dirdoc_core::FileEntry;

/// Rendering switches.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub show_hidden: bool,
}

/// One displayed line with its document line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

/// Header line: the directory with the home directory shortened to `~`.
pub fn header(location: &Path, home: Option<&Path>) -> String {
    let relative = home.and_then(|home| location.strip_prefix(home).ok());
    let mut text = match relative {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => location.display().to_string(),
    };
    if !text.ends_with('/') {
        text.push('/');
    }
    text.push(':');
    text
}

/// Render one entry as `<mark><link> <size> <modified> <name>`.
pub fn entry_line(entry: &FileEntry, marked: bool) -> String {
    let mark = if marked { '*' } else { ' ' };
    let link = match (entry.is_symlink, entry.is_resolved_symlink()) {
        (true, true) => 'L',
        (true, false) => 'l',
        (false, _) => ' ',
    };
    let (size, modified) = match entry.stats {
        Some(stats) => (
            humansize::format_size(stats.size, humansize::BINARY),
            DateTime::<Local>::from(stats.modified)
                .format("%m-%d %H:%M")
                .to_string(),
        ),
        None => ("?".to_string(), "?".to_string()),
    };
    format!(
        "{mark}{link} {size:>9} {modified:<11} {}",
        entry.list_name()
    )
}

/// Render the whole document.
pub fn render(listing: &DirectoryListing, options: RenderOptions) -> Vec<Line> {
    let home = dirs::home_dir();
    let mut lines = vec![Line {
        number: 0,
        text: header(listing.location(), home.as_deref()),
    }];
    lines.extend(
        listing
            .entries()
            .iter()
            .enumerate()
            .filter(|(_, entry)| options.show_hidden || !entry.name().starts_with('.'))
            .map(|(i, entry)| Line {
                number: i + 1,
                text: entry_line(entry, listing.is_marked(i)),
            }),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirdoc_core::{EntryKind, FileStats};
    use std::path::PathBuf;
    use std::time::SystemTime;

    fn stats(size: u64, kind: EntryKind) -> Option<FileStats> {
        Some(FileStats {
            size,
            modified: SystemTime::now(),
            kind,
        })
    }

    #[test]
    fn test_header_tildifies_home() {
        let home = PathBuf::from("/home/ada");
        assert_eq!(header(Path::new("/home/ada/src"), Some(&home)), "~/src/:");
        assert_eq!(header(Path::new("/home/ada"), Some(&home)), "~/:");
        assert_eq!(header(Path::new("/etc"), Some(&home)), "/etc/:");
        assert_eq!(header(Path::new("/"), None), "/:");
    }

    #[test]
    fn test_entry_without_stats() {
        let entry = FileEntry::new("/tmp/broken", false, true);
        assert_eq!(entry_line(&entry, false), " l         ? ?           broken");
    }

    #[test]
    fn test_marked_directory() {
        let entry = FileEntry::new("/tmp/src", true, false).with_stats(stats(4096, EntryKind::Directory));
        let line = entry_line(&entry, true);
        assert!(line.starts_with("*      4 KiB "));
        assert!(line.ends_with(" src/"));
    }

    #[test]
    fn test_resolved_link() {
        let entry = FileEntry::new("/tmp/latest", false, true).with_stats(stats(10, EntryKind::File));
        let line = entry_line(&entry, false);
        assert!(line.starts_with(" L      10 B "));
    }

    #[test]
    fn test_hidden_entries_keep_line_numbers() {
        let listing = DirectoryListing::new(
            "/tmp/x",
            vec![
                FileEntry::new("/tmp/x/.env", false, false),
                FileEntry::new("/tmp/x/main.rs", false, false),
            ],
        );
        let shown = render(&listing, RenderOptions { show_hidden: false });
        let numbers: Vec<usize> = shown.iter().map(|line| line.number).collect();
        assert_eq!(numbers, [0, 2]);

        let all = render(&listing, RenderOptions { show_hidden: true });
        assert_eq!(all.len(), 3);
    }
}
