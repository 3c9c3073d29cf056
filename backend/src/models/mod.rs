//! Domain types: participants, the static roster, and the draw event log.

pub mod event;
pub mod participant;

pub use event::{DrawEvent, EventLog};
pub use participant::{Participant, Roster};
