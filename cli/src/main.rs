//! Team Draw CLI - terminal presenter for an animated group draw.
//!
//! ```text
//! main() -> init_tracing() -> DrawEngine + DrawScheduler(TerminalPresenter)
//!                                   |
//!                                   v
//!     start() ... join() | Ctrl-C -> stop()   (or stdin commands)
//!                                   |
//!                                   v
//!                            group tables on stdout
//! ```
//!
//! Environment:
//! - `DRAW_SEED`: fixed seed for a reproducible draw (default: clock-derived)
//! - `DRAW_FAST`: any value skips the spin animation
//! - `DRAW_INTERACTIVE`: any value drives the draw from stdin commands
//!   (step, pause/resume, reset) instead of running it automatically
//! - `RUST_LOG`: tracing filter (default `info`), logs go to stderr

mod controls;
mod render;

use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use controls::{apply, Command, HELP};
use render::{render_groups, TerminalPresenter};
use team_draw_core::{DrawConfig, DrawEngine, DrawScheduler, SchedulerConfig};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn draw_seed() -> Result<u64> {
    match env::var("DRAW_SEED") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("DRAW_SEED must be an unsigned integer, got {raw:?}")),
        Err(_) => {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            Ok(nanos as u64)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let seed = draw_seed()?;
    let mut scheduler_config = if env::var_os("DRAW_FAST").is_some() {
        SchedulerConfig::instant()
    } else {
        SchedulerConfig::default()
    };
    scheduler_config.spin_seed = seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15;

    let engine = DrawEngine::new(DrawConfig::with_seed(seed)).context("invalid draw configuration")?;
    tracing::info!(seed, draw_id = %engine.draw_id(), "Draw prepared");

    let mut scheduler = DrawScheduler::new(engine, Arc::new(TerminalPresenter::new()), scheduler_config)
        .context("invalid scheduler configuration")?;

    if env::var_os("DRAW_INTERACTIVE").is_some() {
        run_interactive(&mut scheduler).await?;
    } else {
        run_automatic(&mut scheduler).await?;
    }

    println!();
    scheduler.with_engine(|engine| print!("{}", render_groups(engine)));
    Ok(())
}

async fn run_automatic(scheduler: &mut DrawScheduler) -> Result<()> {
    scheduler.start();
    tokio::select! {
        _ = scheduler.join() => {}
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            scheduler.stop();
            tracing::warn!("Draw interrupted");
        }
    }
    Ok(())
}

async fn run_interactive(scheduler: &mut DrawScheduler) -> Result<()> {
    eprintln!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                None
            }
        };
        let Some(line) = line else { break };

        match Command::parse(&line) {
            Some(Command::Quit) => break,
            Some(Command::Table) => {
                scheduler.with_engine(|engine| print!("{}", render_groups(engine)));
            }
            Some(command) => {
                if let Some(control) = apply(scheduler, command) {
                    tracing::debug!(?command, ?control, "Command applied");
                    if !control.is_applied() {
                        eprintln!("{control:?}");
                    }
                }
            }
            None => eprintln!("unknown command {:?}; {HELP}", line.trim()),
        }
    }

    scheduler.stop();
    Ok(())
}
