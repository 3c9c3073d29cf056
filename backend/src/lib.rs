//! Team Draw Core
//!
//! Animated random draw placing participants into groups, one reveal at a
//! time, round by round.
//!
//! # Architecture
//!
//! - **rng**: Deterministic random number generation and reveal orders
//! - **models**: Domain types (Participant, Roster, DrawEvent)
//! - **draw**: Slot sequencing, the stepwise engine, checkpoints
//! - **scheduler**: Timed draw cycles (spin, step, notify) and the observer boundary
//!
//! # Critical Invariants
//!
//! 1. No participant is drawn twice; every slot is written exactly once
//! 2. Each group receives one participant per round before the next round
//! 3. All randomness is deterministic (seeded RNG), draw ids included
//! 4. The engine is synchronous; only the scheduler knows about time

pub mod draw;
pub mod models;
pub mod rng;
pub mod scheduler;

pub use draw::{
    Assignment, Coordinate, DrawConfig, DrawEngine, DrawError, DrawPhase, DrawSnapshot,
    SlotSequencer, StepResult,
};
pub use models::{DrawEvent, EventLog, Participant, Roster};
pub use rng::{Permutation, RngManager};
pub use scheduler::{Control, DrawCallbacks, DrawObserver, DrawScheduler, SchedulerConfig};
