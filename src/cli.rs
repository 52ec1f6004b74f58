//! Command-line interface and REPL

use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::command::{CommandOutput, SurfaceCommand};

const PROMPT: &str = "daw> ";

/// Run the REPL on its own thread, forwarding parsed commands to `tx`.
///
/// The channel closes when the operator quits, which ends the session.
pub fn spawn_repl(tx: mpsc::Sender<SurfaceCommand>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_repl(tx) {
            warn!("REPL stopped: {}", e);
        }
    })
}

fn run_repl(tx: mpsc::Sender<SurfaceCommand>) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!(
        "{} {}",
        "Interactive mode.".bold().cyan(),
        "Type 'help' for commands, 'exit' to quit.".dimmed()
    );

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    "exit" | "quit" => break,
                    "help" | "?" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                match line.parse::<SurfaceCommand>() {
                    Ok(cmd) => {
                        debug!(?cmd, "REPL command");
                        if tx.blocking_send(cmd).is_err() {
                            // Session already gone
                            break;
                        }
                    }
                    Err(e) => println!("{} {}", "✗".red(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

pub fn print_help() {
    println!("\n{}", "Commands:".bold());
    let rows = [
        ("record | play | pause | stop", "transport pulses"),
        ("metronome on|off", "toggle the click"),
        ("repeat on|off", "toggle loop playback"),
        ("bank next|prev|<n>", "page the visible tracks"),
        ("count", "announce the track count"),
        ("track <id> volume|pan <0..1>", "move a fader or pan knob"),
        ("track <id> mute|solo|recarm on|off", "toggle a track button"),
        ("track <id> monitor off|on|auto", "set input monitoring"),
        ("status", "print the mirrored state"),
        ("exit", "leave"),
    ];
    for (usage, what) in rows {
        println!("  {:<38} {}", usage.yellow(), what.dimmed());
    }
    println!();
}

/// Print what a command produced
pub fn print_output(output: &CommandOutput) {
    match output {
        CommandOutput::Sent => println!("{}", "✓ sent".green()),
        CommandOutput::Snapshot(snapshot) => match serde_json::to_string_pretty(snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("{} {}", "✗".red(), e),
        },
    }
}
