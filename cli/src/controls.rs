//! Keyboard controls for interactive draws

use team_draw_core::{Control, DrawScheduler};

pub const HELP: &str = "controls: [enter]/s step, p pause/resume, r reset, t table, q quit";

/// One line typed on stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Step,
    Toggle,
    Reset,
    Table,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "step" => Some(Command::Step),
            "p" | "pause" | "resume" => Some(Command::Toggle),
            "r" | "reset" => Some(Command::Reset),
            "t" | "table" => Some(Command::Table),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Apply a scheduler command. `Table` and `Quit` are handled by the caller.
pub fn apply(scheduler: &mut DrawScheduler, command: Command) -> Option<Control> {
    match command {
        Command::Step => Some(scheduler.step_once()),
        Command::Toggle if scheduler.is_running() => Some(scheduler.stop()),
        Command::Toggle => Some(scheduler.start()),
        Command::Reset => Some(scheduler.reset()),
        Command::Table | Command::Quit => None,
    }
}
