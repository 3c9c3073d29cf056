//! Draw Engine
//!
//! Owns the state of one draw and advances it one reveal at a time.
//!
//! # Architecture
//!
//! ```text
//! reset():  new reveal order (Fisher–Yates) → empty slots → Reset event
//!
//! step():   done?  → StepResult::Complete (no mutation)
//!           slot      = SlotSequencer(cursor)
//!           participant = permutation[cursor]
//!           record slot → participant, flag drawn, cursor += 1
//!           cursor == capacity → Completed event
//! ```
//!
//! The engine is synchronous and owns no timers; pacing is the
//! [`DrawScheduler`](crate::scheduler::DrawScheduler)'s job.
//!
//! # Example
//!
//! ```rust
//! use team_draw_core::draw::{DrawConfig, DrawEngine, StepResult};
//!
//! let mut engine = DrawEngine::new(DrawConfig::with_seed(12345)).unwrap();
//!
//! while let StepResult::Assigned { assignment, .. } = engine.step() {
//!     println!(
//!         "{} → group {} (round {})",
//!         assignment.participant().display_name(),
//!         assignment.group() + 1,
//!         assignment.round() + 1,
//!     );
//! }
//! assert!(engine.is_done());
//! ```

use crate::draw::slots::{Coordinate, SlotSequencer};
use crate::models::event::{DrawEvent, EventLog};
use crate::models::participant::{Participant, Roster};
use crate::rng::{generate_permutation, Permutation, RngManager};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Groups filled per round
pub const GROUPS_PER_ROUND: usize = 6;

/// Rounds per draw
pub const TOTAL_ROUNDS: usize = 4;

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete draw configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// Participants to place; must fill every slot exactly
    pub roster: Roster,

    /// Number of groups (one slot per group per round)
    pub groups_per_round: usize,

    /// Number of rounds
    pub total_rounds: usize,

    /// Seed for the reveal-order generator
    pub rng_seed: u64,
}

impl DrawConfig {
    /// Default roster and dimensions with an explicit seed
    pub fn with_seed(rng_seed: u64) -> Self {
        Self {
            rng_seed,
            ..Self::default()
        }
    }

    /// Number of slots the dimensions describe
    pub fn capacity(&self) -> usize {
        self.groups_per_round * self.total_rounds
    }

    /// Fail fast on rosters that would leave slots empty or participants unplaced.
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.groups_per_round == 0 {
            return Err(DrawError::InvalidConfig(
                "groups_per_round must be positive".to_string(),
            ));
        }
        if self.total_rounds == 0 {
            return Err(DrawError::InvalidConfig(
                "total_rounds must be positive".to_string(),
            ));
        }
        if self.roster.len() != self.capacity() {
            return Err(DrawError::RosterSize {
                expected: self.capacity(),
                actual: self.roster.len(),
            });
        }
        self.roster.validate_ids().map_err(DrawError::InvalidConfig)
    }
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            roster: Roster::default_roster(),
            groups_per_round: GROUPS_PER_ROUND,
            total_rounds: TOTAL_ROUNDS,
            rng_seed: 0x5EED_D2A7,
        }
    }
}

/// Draw error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrawError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Roster has {actual} participants but the draw has {expected} slots")]
    RosterSize { expected: usize, actual: usize },

    #[error("Snapshot rejected: {0}")]
    Snapshot(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// ============================================================================
// Step Results
// ============================================================================

/// One participant placed into one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    index: usize,
    coordinate: Coordinate,
    participant: Participant,
}

impl Assignment {
    /// Draw position this assignment was produced at
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn round(&self) -> usize {
        self.coordinate.round
    }

    pub fn group(&self) -> usize {
        self.coordinate.group
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }
}

/// Outcome of [`DrawEngine::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// A participant was placed; `done` is true if that filled the last slot
    Assigned { assignment: Assignment, done: bool },

    /// The draw was already complete; nothing changed
    Complete,
}

impl StepResult {
    /// True if no further step will place anyone
    pub fn is_done(&self) -> bool {
        match self {
            StepResult::Assigned { done, .. } => *done,
            StepResult::Complete => true,
        }
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            StepResult::Assigned { assignment, .. } => Some(assignment),
            StepResult::Complete => None,
        }
    }
}

/// Coarse position in the draw lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawPhase {
    /// Fresh order, nothing revealed
    Idle,
    /// Some slots filled
    InProgress,
    /// Every slot filled
    Complete,
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone)]
struct DrawState {
    permutation: Permutation,
    /// Assignments in draw order; its length is the cursor
    assignments: Vec<Assignment>,
    /// Indexed by participant id
    drawn: Vec<bool>,
}

impl DrawState {
    fn fresh(permutation: Permutation) -> Self {
        let size = permutation.len();
        Self {
            permutation,
            assignments: Vec::with_capacity(size),
            drawn: vec![false; size],
        }
    }
}

/// Single source of truth for one draw.
#[derive(Debug, Clone)]
pub struct DrawEngine {
    config: DrawConfig,
    sequencer: SlotSequencer,
    rng: RngManager,
    draw_id: Uuid,
    state: DrawState,
    events: EventLog,
}

impl DrawEngine {
    /// Create an engine and generate the first reveal order.
    ///
    /// # Errors
    ///
    /// `DrawError::RosterSize` if the roster does not fill the slot grid exactly,
    /// `DrawError::InvalidConfig` for zero dimensions or malformed participants.
    pub fn new(config: DrawConfig) -> Result<Self, DrawError> {
        config.validate()?;
        let rng = RngManager::new(config.rng_seed);
        let capacity = config.capacity();
        let mut engine = Self::from_parts(config, rng, Uuid::nil(), Permutation::identity(capacity));
        engine.reset();
        Ok(engine)
    }

    /// Assemble an engine around an existing reveal order, with every slot empty.
    ///
    /// Callers must have validated `config` and checked that `permutation` covers it.
    pub(crate) fn from_parts(
        config: DrawConfig,
        rng: RngManager,
        draw_id: Uuid,
        permutation: Permutation,
    ) -> Self {
        let sequencer = SlotSequencer::new(config.groups_per_round, config.total_rounds);
        Self {
            config,
            sequencer,
            rng,
            draw_id,
            state: DrawState::fresh(permutation),
            events: EventLog::new(),
        }
    }

    /// Discard all progress and generate a new reveal order.
    pub fn reset(&mut self) {
        let permutation = generate_permutation(self.config.roster.len(), &mut self.rng);
        self.draw_id = self.next_draw_id();
        self.state = DrawState::fresh(permutation);
        self.events.log(DrawEvent::Reset {
            draw_id: self.draw_id,
        });
        tracing::info!(draw_id = %self.draw_id, slots = self.capacity(), "Draw reset");
    }

    /// Random-version UUID built from the draw generator, so seeded runs
    /// reproduce their ids too.
    fn next_draw_id(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.rng.next().to_le_bytes());
        bytes[8..].copy_from_slice(&self.rng.next().to_le_bytes());
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Reveal the next participant.
    ///
    /// Once every slot is filled this keeps returning [`StepResult::Complete`]
    /// and changes nothing.
    pub fn step(&mut self) -> StepResult {
        let Some(assignment) = self.peek_next() else {
            return StepResult::Complete;
        };

        let participant_id = assignment.participant().id();
        debug_assert!(!self.state.drawn[participant_id], "participant drawn twice");
        self.state.drawn[participant_id] = true;
        self.events.log(DrawEvent::Assigned {
            draw_id: self.draw_id,
            index: assignment.index(),
            participant_id,
            round: assignment.round(),
            group: assignment.group(),
        });
        tracing::debug!(
            draw_id = %self.draw_id,
            index = assignment.index(),
            participant = assignment.participant().display_name(),
            round = assignment.round(),
            group = assignment.group(),
            "Participant assigned"
        );
        self.state.assignments.push(assignment.clone());

        let done = self.is_done();
        if done {
            self.events.log(DrawEvent::Completed {
                draw_id: self.draw_id,
            });
            tracing::info!(draw_id = %self.draw_id, "Draw complete");
        }

        StepResult::Assigned { assignment, done }
    }

    /// What the next [`DrawEngine::step`] would produce, without changing anything.
    pub fn peek_next(&self) -> Option<Assignment> {
        let index = self.cursor();
        let coordinate = self.sequencer.coordinate_for(index)?;
        let participant_id = self.state.permutation.get(index)?;
        let participant = self.config.roster.get(participant_id)?.clone();
        Some(Assignment {
            index,
            coordinate,
            participant,
        })
    }

    /// Number of participants already placed; also the next draw index
    pub fn cursor(&self) -> usize {
        self.state.assignments.len()
    }

    pub fn capacity(&self) -> usize {
        self.sequencer.capacity()
    }

    pub fn remaining(&self) -> usize {
        self.capacity() - self.cursor()
    }

    pub fn is_done(&self) -> bool {
        self.cursor() == self.capacity()
    }

    pub fn phase(&self) -> DrawPhase {
        match self.cursor() {
            0 => DrawPhase::Idle,
            n if n == self.capacity() => DrawPhase::Complete,
            _ => DrawPhase::InProgress,
        }
    }

    /// All assignments so far, in draw order
    pub fn assignments(&self) -> &[Assignment] {
        &self.state.assignments
    }

    /// Assignment occupying `coordinate`, if that slot is filled
    pub fn assignment_at(&self, coordinate: Coordinate) -> Option<&Assignment> {
        let index = self.sequencer.index_of(coordinate)?;
        self.state.assignments.get(index)
    }

    /// Members of one group so far, in round order
    pub fn group(&self, group: usize) -> Vec<&Assignment> {
        self.state
            .assignments
            .iter()
            .filter(|a| a.group() == group)
            .collect()
    }

    /// True if the participant has already been placed in this draw
    pub fn is_drawn(&self, participant_id: usize) -> bool {
        self.state
            .drawn
            .get(participant_id)
            .copied()
            .unwrap_or(false)
    }

    pub fn permutation(&self) -> &Permutation {
        &self.state.permutation
    }

    pub fn draw_id(&self) -> Uuid {
        self.draw_id
    }

    pub fn roster(&self) -> &Roster {
        &self.config.roster
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn sequencer(&self) -> SlotSequencer {
        self.sequencer
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub(crate) fn rng_state(&self) -> u64 {
        self.rng.get_state()
    }

    pub(crate) fn log_event(&mut self, event: DrawEvent) {
        self.events.log(event);
    }
}
