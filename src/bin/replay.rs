//! Replay a recorded landmark trace through the gesture calculator.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Result};
use clap::Parser;
use colored::*;

use rusty_hands::config::AppConfig;
use rusty_hands::debounce::GestureEvent;
use rusty_hands::replay;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay a landmark trace", long_about = None)]
struct ReplayArgs {
    /// JSON trace of `{ t_ms, landmarks }` frames
    trace: PathBuf,

    /// Configuration file (read only)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Fail unless the final display equals this text
    #[arg(long)]
    expect: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rusty_hands=warn".into()),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("{} {err:#}", "error:".red());
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = ReplayArgs::parse();
    let config = AppConfig::read(&args.config)?;
    let frames = replay::load_trace(&args.trace)?;
    println!("Replaying {} frames from {}", frames.len(), args.trace.display());

    let outcome = replay::run_trace(&frames, config.session());
    for (t_ms, event) in &outcome.events {
        let label = match event {
            GestureEvent::Confirmed(g) => g.as_str().to_string(),
            GestureEvent::HoldConfirmed(action) => format!("hold {action:?}").to_lowercase(),
        };
        println!("{:>7} ms  {}", t_ms, label);
    }

    let snap = &outcome.snapshot;
    println!("display: {}", snap.display_text.bold());
    for entry in &snap.history {
        println!("history: {entry}");
    }

    if let Some(expected) = args.expect {
        if snap.display_text != expected {
            bail!("expected display {:?}, got {:?}", expected, snap.display_text);
        }
        println!("{}", "expectation met".green());
    }
    Ok(())
}
