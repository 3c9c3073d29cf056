//! Terminal rendering of a draw

use std::fmt::Write as _;
use std::io::{self, Write};
use team_draw_core::{Assignment, Coordinate, DrawEngine, DrawObserver};

const EMPTY_CELL: &str = "—";

/// Prints the spin on one rewritten line and each reveal on its own line.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl DrawObserver for TerminalPresenter {
    fn on_spin_tick(&self, candidate: &str) {
        let mut out = io::stdout().lock();
        // Terminal write failures only lose animation frames.
        let _ = write!(out, "\r\x1b[2K  … {candidate}");
        let _ = out.flush();
    }

    fn on_assignment(&self, assignment: &Assignment) {
        println!("\r\x1b[2K{}", reveal_line(assignment));
    }

    fn on_complete(&self) {
        println!("Draw complete");
    }
}

/// One-line announcement of a reveal
pub fn reveal_line(assignment: &Assignment) -> String {
    let participant = assignment.participant();
    format!(
        "#{:02}  {} ({}) → group {}, round {}",
        assignment.index() + 1,
        participant.display_name(),
        participant.group_label(),
        assignment.group() + 1,
        assignment.round() + 1,
    )
}

/// Group tables, one block per group, empty slots shown as a dash.
pub fn render_groups(engine: &DrawEngine) -> String {
    let slots = engine.sequencer();
    let mut out = String::new();

    for group in 0..slots.groups_per_round() {
        let filled = engine.group(group).len();
        let _ = writeln!(
            out,
            "Group {}  (round {}/{})",
            group + 1,
            filled.clamp(1, slots.total_rounds()),
            slots.total_rounds()
        );
        for round in 0..slots.total_rounds() {
            match engine.assignment_at(Coordinate::new(round, group)) {
                Some(assignment) => {
                    let participant = assignment.participant();
                    let _ = writeln!(
                        out,
                        "  {:<20} {}",
                        participant.display_name(),
                        participant.group_label()
                    );
                }
                None => {
                    let _ = writeln!(out, "  {:<20} {}", EMPTY_CELL, EMPTY_CELL);
                }
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use team_draw_core::DrawConfig;

    #[test]
    fn test_render_empty_draw() {
        let engine = DrawEngine::new(DrawConfig::with_seed(1)).unwrap();
        let text = render_groups(&engine);

        assert_eq!(text.matches("Group ").count(), 6);
        assert_eq!(text.matches(EMPTY_CELL).count(), 48);
        assert!(text.contains("Group 1  (round 1/4)"));
    }

    #[test]
    fn test_render_complete_draw() {
        let mut engine = DrawEngine::new(DrawConfig::with_seed(1)).unwrap();
        while !engine.step().is_done() {}
        let text = render_groups(&engine);

        assert!(!text.contains(EMPTY_CELL));
        assert!(text.contains("(round 4/4)"));
        for participant in engine.roster().participants() {
            assert!(text.contains(participant.display_name()));
        }
    }

    #[test]
    fn test_reveal_line() {
        let mut engine = DrawEngine::new(DrawConfig::with_seed(1)).unwrap();
        let result = engine.step();
        let line = reveal_line(result.assignment().unwrap());

        assert!(line.starts_with("#01  "));
        assert!(line.ends_with("→ group 1, round 1"));
    }
}
