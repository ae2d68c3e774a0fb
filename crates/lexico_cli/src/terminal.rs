//! Terminal collaborators: messages, prompts and the pager.
//!
//! # Invariants
//! - Paging falls back to plain stdout when stdout is not a terminal or the
//!   pager cannot be started.

use dialoguer::Input;
use log::warn;
use std::io::{self, IsTerminal, Write};
use std::process::{Command, Stdio};

const DEFAULT_PAGER: &str = "less -FRX";

/// User-facing I/O used by commands.
pub trait Terminal {
    /// Prints one message line.
    fn say(&mut self, message: &str);
    /// Blocks until the user enters a non-empty line.
    fn prompt(&mut self, message: &str) -> io::Result<String>;
    /// Shows long output through a pager.
    fn show_paged(&mut self, text: &str);
}

/// Terminal backed by the process stdio.
#[derive(Debug, Default)]
pub struct ConsoleTerminal;

impl Terminal for ConsoleTerminal {
    fn say(&mut self, message: &str) {
        println!("{message}");
    }

    fn prompt(&mut self, message: &str) -> io::Result<String> {
        Input::<String>::new()
            .with_prompt(message)
            .interact_text()
            .map_err(|err| io::Error::other(err.to_string()))
    }

    fn show_paged(&mut self, text: &str) {
        if !io::stdout().is_terminal() {
            print!("{text}");
            return;
        }
        if let Err(err) = run_pager(text) {
            warn!("event=pager module=cli status=error error={err}");
            print!("{text}");
        }
    }
}

fn run_pager(text: &str) -> io::Result<()> {
    let pager = std::env::var("PAGER")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAGER.to_string());
    let mut parts = pager.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty pager command"))?;

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        // The pager may exit before reading everything (user pressed `q`).
        match stdin.write_all(text.as_bytes()) {
            Err(err) if err.kind() != io::ErrorKind::BrokenPipe => return Err(err),
            _ => {}
        }
    }
    child.wait()?;
    Ok(())
}
