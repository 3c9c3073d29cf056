//! Draw - reveal order, slot sequencing and the stepwise engine
//!
//! See `engine.rs` for the state machine.

pub mod checkpoint;
pub mod engine;
pub mod slots;

pub use checkpoint::{compute_config_hash, validate_snapshot, DrawSnapshot};
pub use engine::{
    Assignment, DrawConfig, DrawEngine, DrawError, DrawPhase, StepResult, GROUPS_PER_ROUND,
    TOTAL_ROUNDS,
};
pub use slots::{coordinate_for, Coordinate, SlotSequencer};
