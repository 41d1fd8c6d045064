//! Interactive session: reads line commands on the main thread, queues them to
//! the backend worker, and renders state changes on a separate thread.

pub mod events;
pub mod orchestration;

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    thread,
};

use anyhow::{anyhow, Context, Result};
use client_core::{LookupState, PincodeDirectory};
use crossbeam_channel::{bounded, Receiver};

use crate::{
    backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread},
    render::render_state,
};
use events::UiEvent;
use orchestration::dispatch_backend_command;

pub const HELP: &str = "\
Commands:
  lookup <pincode>   look up a 6-digit pincode
  filter [text]      show post offices whose name contains text (empty resets)
  show               print the current view again
  help               show this help
  quit               leave the session";

#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Backend(BackendCommand),
    Help,
    Quit,
}

/// `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim_end().is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (trimmed, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "lookup" | "l" => {
            let input = rest.trim_end();
            if input.is_empty() {
                return Err("usage: lookup <pincode>".to_string());
            }
            SessionCommand::Backend(BackendCommand::Lookup {
                input: input.to_string(),
            })
        }
        "filter" | "f" => SessionCommand::Backend(BackendCommand::SetFilter {
            text: rest.to_string(),
        }),
        "show" => SessionCommand::Backend(BackendCommand::Show),
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

pub fn run(directory: Arc<dyn PincodeDirectory>) -> Result<()> {
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    let backend = spawn_backend_thread(directory, cmd_rx, ui_tx);
    let renderer = thread::spawn(move || render_loop(ui_rx));

    println!("{HELP}");
    let mut status = String::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read session input")?;
        match parse_command(&line) {
            Ok(None) => {}
            Ok(Some(SessionCommand::Help)) => println!("{HELP}"),
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(SessionCommand::Backend(cmd))) => {
                dispatch_backend_command(&cmd_tx, cmd, &mut status);
                if !status.is_empty() {
                    eprintln!("{status}");
                    status.clear();
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }

    drop(cmd_tx);
    backend
        .join()
        .map_err(|_| anyhow!("backend worker panicked"))?;
    renderer
        .join()
        .map_err(|_| anyhow!("render thread panicked"))?;
    Ok(())
}

fn render_loop(ui_rx: Receiver<UiEvent>) {
    let mut last_rendered: Option<String> = None;
    while let Ok(event) = ui_rx.recv() {
        match event {
            UiEvent::Info(message) => tracing::info!("{message}"),
            UiEvent::Error(message) => eprintln!("{message}"),
            UiEvent::State(state) => {
                if let Some(text) = next_frame(&state, last_rendered.as_deref()) {
                    print_frame(&text);
                    last_rendered = Some(text);
                }
            }
            UiEvent::Redraw(state) => match render_state(&state) {
                Some(text) => {
                    print_frame(&text);
                    last_rendered = Some(text);
                }
                None => println!("Nothing to show yet; try 'lookup <pincode>'"),
            },
        }
    }
}

fn print_frame(text: &str) {
    println!("{text}");
    let _ = io::stdout().flush();
}

/// Text to print for `state`, skipping frames identical to the previous one.
fn next_frame(state: &LookupState, last_rendered: Option<&str>) -> Option<String> {
    let text = render_state(state)?;
    if last_rendered == Some(text.as_str()) {
        return None;
    }
    Some(text)
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
