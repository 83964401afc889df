//! Batch sessions, pending paste and the action controller for dirdoc.
//!
//! The [`Controller`] is the one object a host talks to. It owns the
//! directory cache, at most one [`BatchSession`] and at most one
//! [`PendingOperation`], and turns every user action into filesystem
//! operations plus an [`ActionReport`] of messages to show.
//!
//! Hosts provide the document layer: they render listings, show the batch
//! name list for editing and report saves and closes back through
//! [`Controller::batch_will_save`], [`Controller::batch_saved`] and
//! [`Controller::document_closed`].

mod batch;
mod clipboard;
mod controller;
mod message;
mod workspace;

pub use batch::{BatchEngine, BatchMode, BatchPhase, BatchSession, SaveReason};
pub use clipboard::{ClipboardEngine, ClipboardMode, ConflictPrompt, PasteReport, PendingOperation};
pub use controller::{Controller, EditStart, SingleEdit};
pub use message::{ActionReport, Message, MessageLevel};
pub use workspace::{BatchWorkspace, EDITABLE_FILE_NAME, ORIGINAL_FILE_NAME};

// Re-export the types hosts need alongside the controller.
pub use dirdoc_cache::{CacheEvent, DirectoryListing, LineSelection, MarkMode, NameFilter};
pub use dirdoc_ops::{Conflict, ConflictResolution};
