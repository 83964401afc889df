//! Terminal prompts.

use std::io::{self, BufRead, Write};

use dirdoc_engine::{ActionReport, Conflict, ConflictPrompt, ConflictResolution, MessageLevel};

/// Print `prompt` and read one line from stdin. `None` on end of input.
pub fn ask(prompt: &str) -> io::Result<Option<String>> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}

/// Ask a yes/no question; anything but `y`/`yes` is no.
pub fn confirm(question: &str) -> io::Result<bool> {
    let answer = ask(&format!("{question} [y/N] "))?;
    Ok(matches!(
        answer.as_deref().map(str::trim),
        Some("y" | "Y" | "yes")
    ))
}

/// Print the messages of an action.
pub fn print_report(report: &ActionReport) {
    for message in &report.messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.text),
            MessageLevel::Error => eprintln!("error: {}", message.text),
        }
    }
}

fn key(choice: ConflictResolution) -> &'static str {
    match choice {
        ConflictResolution::Overwrite => "o",
        ConflictResolution::OverwriteMerge => "m",
        ConflictResolution::Skip => "s",
    }
}

fn label(choice: ConflictResolution) -> &'static str {
    match choice {
        ConflictResolution::Overwrite => "[o]verwrite",
        ConflictResolution::OverwriteMerge => "[m]erge",
        ConflictResolution::Skip => "[s]kip",
    }
}

/// Asks on the terminal how to resolve paste conflicts.
pub struct TerminalPrompt;

impl ConflictPrompt for TerminalPrompt {
    fn resolve(
        &mut self,
        conflicts: &[Conflict],
        choices: &[ConflictResolution],
    ) -> Option<ConflictResolution> {
        println!("The following entries already exist:");
        for conflict in conflicts {
            println!("  {}", conflict.destination.display());
        }
        let labels: Vec<&str> = choices.iter().copied().map(label).collect();

        // A failed read counts as dismissing the prompt.
        let answer = ask(&format!("{}? ", labels.join(" / "))).ok()??;
        let answer = answer.trim();
        choices.iter().copied().find(|&choice| key(choice) == answer)
    }
}
