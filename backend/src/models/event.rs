//! Event logging for draw replay and auditing.
//!
//! Every state change of a [`DrawEngine`](crate::draw::DrawEngine) is
//! recorded as a [`DrawEvent`]:
//! - **Reset**: a fresh reveal order was generated
//! - **Assigned**: one participant was placed into a slot
//! - **Completed**: the last slot was filled
//!
//! # Example
//!
//! ```rust
//! use team_draw_core::models::{DrawEvent, EventLog};
//! use uuid::Uuid;
//!
//! let draw_id = Uuid::new_v4();
//! let mut log = EventLog::new();
//! log.log(DrawEvent::Reset { draw_id });
//! log.log(DrawEvent::Assigned {
//!     draw_id,
//!     index: 0,
//!     participant_id: 17,
//!     round: 0,
//!     group: 0,
//! });
//!
//! assert_eq!(log.events_for_group(0).len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Draw event capturing a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawEvent {
    /// New reveal order generated; all slots empty
    Reset { draw_id: Uuid },

    /// Participant placed into slot (round, group) at draw position `index`
    Assigned {
        draw_id: Uuid,
        index: usize,
        participant_id: usize,
        round: usize,
        group: usize,
    },

    /// Every slot filled
    Completed { draw_id: Uuid },
}

impl DrawEvent {
    /// Identifier of the draw run this event belongs to
    pub fn draw_id(&self) -> Uuid {
        match self {
            DrawEvent::Reset { draw_id }
            | DrawEvent::Assigned { draw_id, .. }
            | DrawEvent::Completed { draw_id } => *draw_id,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            DrawEvent::Reset { .. } => "Reset",
            DrawEvent::Assigned { .. } => "Assigned",
            DrawEvent::Completed { .. } => "Completed",
        }
    }

    /// Group index if the event places a participant
    pub fn group(&self) -> Option<usize> {
        match self {
            DrawEvent::Assigned { group, .. } => Some(*group),
            _ => None,
        }
    }

    /// Participant id if the event places a participant
    pub fn participant_id(&self) -> Option<usize> {
        match self {
            DrawEvent::Assigned { participant_id, .. } => Some(*participant_id),
            _ => None,
        }
    }
}

/// Event log for storing and querying draw events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<DrawEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: DrawEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events in the order they were logged
    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&DrawEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get placements into one group, in draw order
    pub fn events_for_group(&self, group: usize) -> Vec<&DrawEvent> {
        self.events
            .iter()
            .filter(|e| e.group() == Some(group))
            .collect()
    }

    /// Get events belonging to one draw run
    pub fn events_for_draw(&self, draw_id: Uuid) -> Vec<&DrawEvent> {
        self.events
            .iter()
            .filter(|e| e.draw_id() == draw_id)
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
