//! Presentation boundary
//!
//! Rendering code subscribes to a draw through [`DrawObserver`]. Either
//! implement the trait directly or register closures on [`DrawCallbacks`].

use crate::draw::Assignment;
use std::fmt;

/// Receives the state transitions of a scheduled draw.
///
/// Callbacks run on the scheduler task while it holds the engine lock, so a
/// stopped draw never reports late. They should return quickly and must not
/// call back into the [`DrawScheduler`](crate::scheduler::DrawScheduler).
pub trait DrawObserver: Send + Sync {
    /// A name to flash during the spin phase. Decoys come first; the final
    /// tick of each spin carries the participant about to be revealed.
    fn on_spin_tick(&self, _candidate: &str) {}

    /// A participant was placed. Fired once per step, after the engine
    /// changed and before the next cycle is scheduled.
    fn on_assignment(&self, _assignment: &Assignment) {}

    /// The last slot was filled. Fired once per draw.
    fn on_complete(&self) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DrawObserver for NoopObserver {}

type AssignmentCallback = Box<dyn Fn(&Assignment) + Send + Sync>;
type SpinTickCallback = Box<dyn Fn(&str) + Send + Sync>;
type CompleteCallback = Box<dyn Fn() + Send + Sync>;

/// Closure-based observer.
///
/// # Example
/// ```
/// use team_draw_core::scheduler::DrawCallbacks;
///
/// let callbacks = DrawCallbacks::new()
///     .on_assignment(|a| println!("{} → group {}", a.participant().display_name(), a.group() + 1))
///     .on_complete(|| println!("draw finished"));
/// ```
#[derive(Default)]
pub struct DrawCallbacks {
    assignment: Vec<AssignmentCallback>,
    spin_tick: Vec<SpinTickCallback>,
    complete: Vec<CompleteCallback>,
}

impl DrawCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_assignment<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Assignment) + Send + Sync + 'static,
    {
        self.assignment.push(Box::new(callback));
        self
    }

    pub fn on_spin_tick<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.spin_tick.push(Box::new(callback));
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.complete.push(Box::new(callback));
        self
    }
}

impl DrawObserver for DrawCallbacks {
    fn on_spin_tick(&self, candidate: &str) {
        for callback in &self.spin_tick {
            callback(candidate);
        }
    }

    fn on_assignment(&self, assignment: &Assignment) {
        for callback in &self.assignment {
            callback(assignment);
        }
    }

    fn on_complete(&self) {
        for callback in &self.complete {
            callback();
        }
    }
}

impl fmt::Debug for DrawCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawCallbacks")
            .field("assignment", &self.assignment.len())
            .field("spin_tick", &self.spin_tick.len())
            .field("complete", &self.complete.len())
            .finish()
    }
}
