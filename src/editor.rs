//! Editing batch name lists in an external editor.

use std::path::Path;
use std::process::Command;

use color_eyre::eyre::{Context, Result, eyre};
use tracing::debug;

use dirdoc_engine::{Controller, SaveReason};

use crate::prompt::print_report;

const FALLBACK_EDITOR: &str = "vi";

/// The user's editor command line: `$VISUAL`, then `$EDITOR`, then `vi`.
fn editor_command() -> Vec<String> {
    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .find_map(|value| shlex::split(value.trim()).filter(|words| !words.is_empty()))
        .unwrap_or_else(|| vec![FALLBACK_EDITOR.to_string()])
}

/// Open `document` in the editor. Returns whether the editor exited
/// successfully.
fn edit(document: &Path) -> Result<bool> {
    let command = editor_command();
    let (program, args) = command
        .split_first()
        .ok_or_else(|| eyre!("No editor configured"))?;
    debug!(editor = %program, document = %document.display(), "Launching editor");

    let status = Command::new(program)
        .args(args)
        .arg(document)
        .status()
        .with_context(|| format!("Could not launch editor {program}"))?;
    Ok(status.success())
}

/// Drive one batch session to its end.
///
/// A successful editor exit is a manual save; a failed exit closes the
/// document and cancels the batch. Validation errors are printed and the
/// editor is reopened with the document as the user left it.
/// The document is closed once the batch has run.
pub async fn run_batch(controller: &mut Controller, document: &Path, instructions: &str) -> Result<()> {
    println!("{instructions}");

    loop {
        if !edit(document)? {
            controller.document_closed(document);
            println!("Batch cancelled.");
            return Ok(());
        }

        let text = std::fs::read_to_string(document)
            .with_context(|| format!("Could not read {}", document.display()))?;
        match controller
            .batch_will_save(document, SaveReason::Manual, &text)
            .await
        {
            Ok(Some(report)) => {
                print_report(&report);
                break;
            }
            Ok(None) => break,
            Err(e) if e.is_recoverable() => eprintln!("error: {e}"),
            Err(e) => {
                controller.document_closed(document);
                return Err(e.into());
            }
        }
    }

    if !controller.batch_saved(document) {
        println!("Batch cancelled.");
    }
    controller.document_closed(document);
    Ok(())
}
