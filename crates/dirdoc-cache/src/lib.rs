//! Directory cache and selection engine for dirdoc.
//!
//! A directory is rendered as a document: a header line followed by one
//! line per entry. This crate keeps one cached [`DirectoryListing`] per
//! directory, re-reads it when it goes stale, and carries the set of
//! marked entries across refreshes by path identity.
//!
//! # Change notifications
//!
//! Views subscribe to [`CacheEvent`]s to learn when a rendered directory is
//! outdated:
//!
//! ```rust,no_run
//! use dirdoc_cache::{CacheEvent, DirectoryCache};
//!
//! # async fn demo() -> dirdoc_core::Result<()> {
//! let mut cache = DirectoryCache::new();
//! let mut events = cache.subscribe();
//!
//! cache.read("/tmp".as_ref()).await?;
//! cache.invalidate("/tmp".as_ref(), false);
//!
//! if let Ok(CacheEvent::ContentChanged { path }) = events.recv().await {
//!     println!("re-render {}", path.display());
//! }
//! # Ok(())
//! # }
//! ```

mod cache;
mod listing;
mod reader;
mod selection;

pub use cache::{CacheEvent, DirectoryCache};
pub use listing::DirectoryListing;
pub use reader::read_directory;
pub use selection::{LineSelection, MarkMode, MarkOutcome, NameFilter, SelectionContext};
