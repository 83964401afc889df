//! The interactive shell: one directory document, one command per line.

use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail, eyre};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use dirdoc_core::DirdocError;
use dirdoc_engine::{
    BatchMode, CacheEvent, ClipboardMode, Controller, EditStart, LineSelection, MarkMode, NameFilter,
};

use crate::editor::run_batch;
use crate::prompt::{TerminalPrompt, ask, confirm, print_report};
use crate::render::{RenderOptions, render};

/// Document lines `N` or `N-M`, as displayed by `ls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |value: &str| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid line number '{value}'"))
        };
        let (start, end) = match s.split_once('-') {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => {
                let line = parse(s)?;
                (line, line)
            }
        };
        if start > end {
            return Err(format!("range {s} ends before it starts"));
        }
        Ok(Self { start, end })
    }
}

/// Lines to act on; without a range only the header is selected, which
/// means "the marked entries" for actions and "everything" for marking.
fn selection(range: Option<LineRange>) -> LineSelection {
    range.map_or(LineSelection::at(0), |range| {
        LineSelection::lines(range.start, range.end)
    })
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Debug, Subcommand)]
enum ShellCommand {
    /// Show the current directory
    Ls,
    /// Enter a directory, given as a path or a line number
    Cd { target: String },
    /// Enter the parent directory
    Up,
    /// Re-read the current directory
    Refresh {
        /// Also clear all marks
        #[arg(long)]
        clear: bool,
    },
    /// Mark entries: on, off, toggle or toggle-all
    Mark {
        mode: MarkMode,
        range: Option<LineRange>,
    },
    /// Create an empty file
    Touch { name: String },
    /// Create a directory
    Mkdir { name: String },
    /// Create files and folders by editing a list
    CreateMany,
    /// Rename entries
    Rename { range: Option<LineRange> },
    /// Copy entries within the current directory
    Copy { range: Option<LineRange> },
    /// Create symbolic links to entries
    Link { range: Option<LineRange> },
    /// Delete entries
    Rm {
        range: Option<LineRange>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Cut entries for a later paste
    Cut { range: Option<LineRange> },
    /// Copy entries for a later paste
    Yank { range: Option<LineRange> },
    /// Remember entries as symlink targets for a later paste
    Target { range: Option<LineRange> },
    /// Paste into the current directory
    Paste,
    /// Leave the shell
    #[command(visible_alias = "exit", alias = "q")]
    Quit,
}

enum Flow {
    Continue,
    Quit,
}

/// Lexically resolve `.` and `..`.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Expand a leading `~` and resolve `target` against `base`.
fn expand(target: &str, base: &Path) -> PathBuf {
    let home = dirs::home_dir();
    let path = match (target, home) {
        ("~", Some(home)) => home,
        (target, Some(home)) if target.starts_with("~/") => home.join(&target[2..]),
        (target, _) => base.join(target),
    };
    normalize(&path)
}

pub struct Shell {
    controller: Controller,
    current: PathBuf,
}

impl Shell {
    /// Open the shell on `path`.
    pub async fn open(mut controller: Controller, path: &Path, resolve_links: bool) -> Result<Self> {
        let path = normalize(&std::env::current_dir()?.join(path));
        let current = controller
            .open_directory(&path, resolve_links)
            .await?
            .location()
            .to_path_buf();
        Ok(Self {
            controller,
            current,
        })
    }

    /// Read and run commands until `quit` or end of input.
    pub async fn run(mut self) -> Result<()> {
        let mut events = self.controller.subscribe();
        self.show();

        while let Some(line) = ask("dirdoc> ")? {
            let Some(words) = shlex::split(&line) else {
                eprintln!("error: unbalanced quotes");
                continue;
            };
            if words.is_empty() {
                continue;
            }
            let command = match ShellLine::try_parse_from(words) {
                Ok(line) => line.command,
                Err(e) => {
                    // Help and usage errors are printed by clap.
                    let _ = e.print();
                    continue;
                }
            };

            match self.execute(command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => eprintln!("error: {e}"),
            }

            if self.current_changed(&mut events) {
                self.reload().await;
            }
        }
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> Result<Flow> {
        let dir = self.current.clone();
        match command {
            ShellCommand::Ls => self.show(),
            ShellCommand::Cd { target } => self.change_directory(&target).await?,
            ShellCommand::Up => {
                if let Some(parent) = dir.parent() {
                    self.enter(parent.to_path_buf()).await?;
                }
            }
            ShellCommand::Refresh { clear } => {
                self.controller.refresh(&dir, clear).await?;
            }
            ShellCommand::Mark { mode, range } => {
                let outcome = self.controller.mark(&dir, selection(range), mode)?;
                debug!(changed = outcome.changed, "Marks updated");
            }
            ShellCommand::Touch { name } => {
                print_report(&self.controller.create(&dir, &name, false).await?);
            }
            ShellCommand::Mkdir { name } => {
                print_report(&self.controller.create(&dir, &name, true).await?);
            }
            ShellCommand::CreateMany => self.edit(BatchMode::Create, None).await?,
            ShellCommand::Rename { range } => self.edit(BatchMode::Rename, range).await?,
            ShellCommand::Copy { range } => self.edit(BatchMode::Copy, range).await?,
            ShellCommand::Link { range } => self.edit(BatchMode::Symlink, range).await?,
            ShellCommand::Rm { range, yes } => self.delete(range, yes).await?,
            ShellCommand::Cut { range } => self.set_pending(range, ClipboardMode::Move)?,
            ShellCommand::Yank { range } => self.set_pending(range, ClipboardMode::Copy)?,
            ShellCommand::Target { range } => self.set_pending(range, ClipboardMode::Symlink)?,
            ShellCommand::Paste => {
                print_report(&self.controller.paste(&dir, &mut TerminalPrompt).await?);
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn show(&self) {
        let options = RenderOptions {
            show_hidden: self.controller.config().show_hidden,
        };
        match self.controller.listing(&self.current) {
            Ok(listing) => {
                for line in render(listing, options) {
                    println!("{:>4} {}", line.number, line.text);
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
    }

    /// Re-read the current directory if it is stale and show it.
    async fn reload(&mut self) {
        let current = self.current.clone();
        match self.controller.open_directory(&current, false).await {
            Ok(_) => self.show(),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    /// Whether a notification for the current directory arrived.
    fn current_changed(&self, events: &mut broadcast::Receiver<CacheEvent>) -> bool {
        let mut changed = false;
        loop {
            match events.try_recv() {
                Ok(CacheEvent::ContentChanged { path }) => changed |= path == self.current,
                Ok(CacheEvent::Evicted { .. }) => {}
                Err(TryRecvError::Lagged(_)) => changed = true,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        changed
    }

    async fn change_directory(&mut self, target: &str) -> Result<()> {
        let path = match target.parse::<usize>() {
            Ok(line) => {
                let listing = self.controller.listing(&self.current)?;
                let entry = line
                    .checked_sub(1)
                    .and_then(|index| listing.entry(index))
                    .ok_or_else(|| eyre!("No entry at line {line}"))?;
                if !entry.is_dir {
                    bail!("{} is not a directory", entry.name());
                }
                entry.path().to_path_buf()
            }
            Err(_) => expand(target, &self.current),
        };
        self.enter(path).await
    }

    /// Switch the view to `path`, closing the previous one.
    async fn enter(&mut self, path: PathBuf) -> Result<()> {
        let location = self
            .controller
            .open_directory(&path, false)
            .await?
            .location()
            .to_path_buf();
        let previous = std::mem::replace(&mut self.current, location);
        if previous != self.current {
            self.controller
                .views_closed(&[previous], &[self.current.clone()]);
        }
        self.show();
        Ok(())
    }

    async fn edit(&mut self, mode: BatchMode, range: Option<LineRange>) -> Result<()> {
        let dir = self.current.clone();
        match self.controller.begin_edit(&dir, selection(range), mode)? {
            EditStart::Single(edit) => {
                let Some(name) = ask(&format!("{mode} {} to: ", edit.initial_name()))? else {
                    return Ok(());
                };
                if name.is_empty() {
                    return Ok(());
                }
                print_report(&self.controller.commit_edit(&edit, &name).await?);
            }
            EditStart::Batch {
                document,
                instructions,
                ..
            } => run_batch(&mut self.controller, &document, instructions).await?,
        }
        Ok(())
    }

    async fn delete(&mut self, range: Option<LineRange>, yes: bool) -> Result<()> {
        let dir = self.current.clone();
        let selection = selection(range);
        let context = self.controller.context(&dir, selection, NameFilter::All)?;
        if context.is_empty() {
            return Err(DirdocError::NoSelection.into());
        }

        let use_trash = self.controller.config().use_trash;
        if !yes {
            let verb = if use_trash { "Move to trash" } else { "Permanently delete" };
            for entry in &context.selected {
                println!("  {}", entry.list_name());
            }
            if !confirm(&format!("{verb} {} entries?", context.selected.len()))? {
                return Ok(());
            }
        }
        print_report(&self.controller.delete(&dir, selection, use_trash).await?);
        Ok(())
    }

    fn set_pending(&mut self, range: Option<LineRange>, mode: ClipboardMode) -> Result<()> {
        let dir = self.current.clone();
        print_report(&self.controller.set_pending(&dir, selection(range), mode)?);
        Ok(())
    }
}
