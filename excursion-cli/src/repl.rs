//! Input loops: an interactive line editor, or lines from a script or pipe.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::{error::ReadlineError, DefaultEditor};

use crate::commands::{Flow, Session};

/// `~/.excursion/history`, when a home directory exists.
fn history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".excursion").join("history"))
}

/// Prompted session on a terminal. Ctrl-C clears the line; Ctrl-D leaves.
pub fn run_interactive(session: &mut Session, prompt: &str) -> Result<()> {
    let mut editor = DefaultEditor::new().context("failed to start line editor")?;
    let history = history_path();
    if let Some(path) = &history {
        if editor.load_history(path).is_err() {
            tracing::debug!(path = %path.display(), "no readable history");
        }
    }

    loop {
        match editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = editor.add_history_entry(line.as_str());
                }
                let mut out = io::stdout().lock();
                if session.run_line(&line, &mut out)? == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("failed to read input"),
        }
    }

    if let Some(path) = &history {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = editor.save_history(path) {
            tracing::debug!(path = %path.display(), error = %err, "history not saved");
        }
    }
    Ok(())
}

/// Run every line of `input` until it ends or a line says `exit`. With
/// `echo`, each line is written after the prompt before its output.
pub fn run_lines(
    session: &mut Session,
    input: impl BufRead,
    prompt: &str,
    echo: bool,
    out: &mut dyn Write,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read input line")?;
        if echo {
            writeln!(out, "{prompt}{line}")?;
        }
        if session.run_line(&line, out)? == Flow::Exit {
            break;
        }
    }
    out.flush()?;
    Ok(())
}
