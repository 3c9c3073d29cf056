//! Draw Scheduler
//!
//! Paces a [`DrawEngine`] for presentation. Every reveal is one *draw cycle*:
//!
//! ```text
//! peek next participant
//!   → spin phase (decoy names every `spin_tick`, for spin_min..=spin_max)
//!   → engine.step()
//!   → observer.on_assignment (+ on_complete on the last slot)
//! ```
//!
//! Automatic mode runs one cycle immediately and then one per
//! `cycle_period`; manual mode runs a single cycle. At most one cycle is in
//! flight: both modes share a single task slot, and manual stepping is
//! refused while automatic mode is running.
//!
//! The engine is stepped and observers are notified between two await
//! points, so aborting the task (on `stop`) never leaves a half-applied
//! step. Aborting alone does not halt a task already running on another
//! worker, so every control command also bumps an epoch under the engine
//! lock. A cycle checks its epoch under that same lock before each spin
//! tick and before stepping, and notifies observers while still holding it,
//! so no callback fires after `stop` returns, whatever runtime flavour
//! drives the task. Observers must therefore not call back into the
//! scheduler.
//!
//! All methods that spawn work must be called from within a tokio runtime.

mod observer;
mod spin;

pub use observer::{DrawCallbacks, DrawObserver, NoopObserver};
pub use spin::{spin_candidates, SpinPlan};

use crate::draw::{Assignment, DrawEngine, DrawError, StepResult};
use crate::rng::RngManager;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

// ============================================================================
// Configuration
// ============================================================================

/// Timing of draw cycles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time between the starts of two automatic cycles
    pub cycle_period: Duration,

    /// Interval between decoy names during a spin
    pub spin_tick: Duration,

    /// Shortest spin
    pub spin_min: Duration,

    /// Longest spin; must end before the next cycle starts
    pub spin_max: Duration,

    /// Run the spin phase at all; when false the reveal is applied immediately
    pub animate: bool,

    /// Seed for decoy selection and spin length
    pub spin_seed: u64,
}

impl SchedulerConfig {
    /// Same timings with the spin phase disabled
    pub fn instant() -> Self {
        Self {
            animate: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DrawError> {
        if self.cycle_period.is_zero() {
            return Err(DrawError::InvalidConfig(
                "cycle_period must be positive".to_string(),
            ));
        }
        if self.spin_tick.is_zero() {
            return Err(DrawError::InvalidConfig(
                "spin_tick must be positive".to_string(),
            ));
        }
        if self.spin_min > self.spin_max {
            return Err(DrawError::InvalidConfig(format!(
                "spin_min ({:?}) exceeds spin_max ({:?})",
                self.spin_min, self.spin_max
            )));
        }
        if self.animate && self.spin_max >= self.cycle_period {
            return Err(DrawError::InvalidConfig(format!(
                "spin_max ({:?}) must be shorter than cycle_period ({:?})",
                self.spin_max, self.cycle_period
            )));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycle_period: Duration::from_millis(1800),
            spin_tick: Duration::from_millis(60),
            spin_min: Duration::from_millis(1200),
            spin_max: Duration::from_millis(1600),
            animate: true,
            spin_seed: 0xD1CE,
        }
    }
}

/// What a control command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Automatic mode armed
    Started,
    /// `start` while automatic mode was already running
    AlreadyRunning,
    /// Running task or in-flight cycle cancelled
    Stopped,
    /// `stop` with nothing to cancel
    NotRunning,
    /// One manual cycle scheduled
    Stepped,
    /// `step_once` while automatic mode is running
    IgnoredWhileRunning,
    /// `step_once` while a manual cycle is still spinning
    CycleInFlight,
    /// Every slot is already filled
    AlreadyComplete,
    /// Engine returned to a fresh order
    Reset,
}

impl Control {
    /// True if the command changed anything
    pub fn is_applied(&self) -> bool {
        matches!(
            self,
            Control::Started | Control::Stopped | Control::Stepped | Control::Reset
        )
    }
}

// ============================================================================
// Scheduler
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleOutcome {
    Assigned,
    Completed,
    AlreadyComplete,
    Cancelled,
}

struct Shared {
    engine: Mutex<DrawEngine>,
    spin_rng: Mutex<RngManager>,
    observer: Arc<dyn DrawObserver>,
    running: AtomicBool,
    epoch: AtomicU64,
    config: SchedulerConfig,
}

impl Shared {
    fn engine(&self) -> MutexGuard<'_, DrawEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn spin_rng(&self) -> MutexGuard<'_, RngManager> {
        self.spin_rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invalidate every spawned cycle and return the new epoch.
    fn next_epoch(&self) -> u64 {
        let _engine = self.engine();
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Engine guard, or `None` once `epoch` has been superseded.
    fn engine_if_current(&self, epoch: u64) -> Option<MutexGuard<'_, DrawEngine>> {
        let engine = self.engine();
        (self.epoch.load(Ordering::SeqCst) == epoch).then_some(engine)
    }
}

/// Drives a [`DrawEngine`] automatically or one step at a time.
pub struct DrawScheduler {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl DrawScheduler {
    /// Wrap `engine`; nothing runs until `start` or `step_once`.
    pub fn new(
        engine: DrawEngine,
        observer: Arc<dyn DrawObserver>,
        config: SchedulerConfig,
    ) -> Result<Self, DrawError> {
        config.validate()?;
        let spin_rng = RngManager::new(config.spin_seed);
        Ok(Self {
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                spin_rng: Mutex::new(spin_rng),
                observer,
                running: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
                config,
            }),
            task: None,
        })
    }

    /// Arm automatic mode: one cycle now, then one per period until the draw completes.
    pub fn start(&mut self) -> Control {
        if self.is_running() {
            return Control::AlreadyRunning;
        }
        if self.shared.engine().is_done() {
            tracing::debug!("Start ignored: draw already complete");
            return Control::AlreadyComplete;
        }

        // A manual cycle still spinning has not stepped yet; automatic mode replays that reveal.
        self.abort_task();
        let epoch = self.shared.next_epoch();
        self.shared.running.store(true, Ordering::SeqCst);
        self.task = Some(tokio::spawn(run_automatic(Arc::clone(&self.shared), epoch)));
        tracing::info!(
            period_ms = self.shared.config.cycle_period.as_millis() as u64,
            "Automatic draw started"
        );
        Control::Started
    }

    /// Cancel automatic mode and any in-flight spin.
    pub fn stop(&mut self) -> Control {
        self.shared.next_epoch();
        let was_running = self.shared.running.swap(false, Ordering::SeqCst);
        let aborted = self.abort_task();
        if was_running || aborted {
            tracing::info!("Draw paused");
            Control::Stopped
        } else {
            Control::NotRunning
        }
    }

    /// Run exactly one cycle without arming the repeating timer.
    pub fn step_once(&mut self) -> Control {
        if self.is_running() {
            tracing::debug!("Manual step ignored while automatic draw is running");
            return Control::IgnoredWhileRunning;
        }
        if self.cycle_in_flight() {
            return Control::CycleInFlight;
        }
        if self.shared.engine().is_done() {
            tracing::debug!("Manual step ignored: draw already complete");
            return Control::AlreadyComplete;
        }

        let epoch = self.shared.next_epoch();
        let shared = Arc::clone(&self.shared);
        self.task = Some(tokio::spawn(async move {
            run_cycle(&shared, epoch).await;
        }));
        Control::Stepped
    }

    /// Stop everything and start over with a fresh reveal order.
    pub fn reset(&mut self) -> Control {
        self.stop();
        self.shared.engine().reset();
        Control::Reset
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// True while a spawned cycle or automatic loop has not finished
    pub fn cycle_in_flight(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Wait for the current task to finish: the manual cycle, or the whole
    /// automatic draw.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(err) = task.await {
                tracing::debug!(error = %err, "Draw task ended early");
            }
        }
        self.task = None;
    }

    /// Read the engine without stepping it.
    pub fn with_engine<R>(&self, f: impl FnOnce(&DrawEngine) -> R) -> R {
        f(&*self.shared.engine())
    }

    /// Copy of all assignments so far
    pub fn assignments(&self) -> Vec<Assignment> {
        self.with_engine(|engine| engine.assignments().to_vec())
    }

    pub fn is_done(&self) -> bool {
        self.with_engine(DrawEngine::is_done)
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.shared.config
    }

    fn abort_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                let active = !task.is_finished();
                task.abort();
                active
            }
            None => false,
        }
    }
}

impl Drop for DrawScheduler {
    fn drop(&mut self) {
        self.abort_task();
    }
}

impl std::fmt::Debug for DrawScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawScheduler")
            .field("running", &self.is_running())
            .field("cycle_in_flight", &self.cycle_in_flight())
            .field("config", &self.shared.config)
            .finish()
    }
}

// ============================================================================
// Cycle Tasks
// ============================================================================

async fn run_automatic(shared: Arc<Shared>, epoch: u64) {
    let mut ticker = interval(shared.config.cycle_period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match run_cycle(&shared, epoch).await {
            CycleOutcome::Assigned => {}
            CycleOutcome::Cancelled => return,
            CycleOutcome::Completed | CycleOutcome::AlreadyComplete => break,
        }
    }

    if shared.epoch.load(Ordering::SeqCst) == epoch {
        shared.running.store(false, Ordering::SeqCst);
    }
    tracing::info!("Automatic draw finished");
}

async fn run_cycle(shared: &Shared, epoch: u64) -> CycleOutcome {
    let next = shared.engine().peek_next();
    let Some(next) = next else {
        return CycleOutcome::AlreadyComplete;
    };

    if shared.config.animate && !spin(shared, epoch, next.participant().display_name()).await {
        return CycleOutcome::Cancelled;
    }

    let Some(mut engine) = shared.engine_if_current(epoch) else {
        return CycleOutcome::Cancelled;
    };
    match engine.step() {
        StepResult::Assigned { assignment, done } => {
            shared.observer.on_assignment(&assignment);
            if done {
                shared.observer.on_complete();
                CycleOutcome::Completed
            } else {
                CycleOutcome::Assigned
            }
        }
        StepResult::Complete => CycleOutcome::AlreadyComplete,
    }
}

/// Show decoys, then land on `final_name`. Returns false if cancelled.
async fn spin(shared: &Shared, epoch: u64, final_name: &str) -> bool {
    let plan = {
        let engine = shared.engine();
        let mut rng = shared.spin_rng();
        SpinPlan::new(
            engine.roster().display_names(),
            final_name,
            shared.config.spin_min,
            shared.config.spin_max,
            &mut rng,
        )
    };

    let end = sleep_until(Instant::now() + plan.duration());
    tokio::pin!(end);

    let mut ticker = interval(shared.config.spin_tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; decoys start one tick in.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = &mut end => break,
            _ = ticker.tick() => {
                let Some(_engine) = shared.engine_if_current(epoch) else {
                    return false;
                };
                let candidate = plan.pick(&mut shared.spin_rng()).to_string();
                shared.observer.on_spin_tick(&candidate);
            }
        }
    }

    let Some(_engine) = shared.engine_if_current(epoch) else {
        return false;
    };
    shared.observer.on_spin_tick(plan.final_name());
    true
}
