//! Draw Scheduler Tests
//!
//! Run on a paused tokio clock: sleeping in the test auto-advances time to
//! the next timer, so cycle timings are exact.
//!
//! With the default timings a cycle starts every 1800ms and its spin lasts
//! 1200..=1600ms, so cycle k reveals somewhere in [1800k + 1200, 1800k + 1600].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use team_draw_core::{
    Assignment, Control, DrawCallbacks, DrawConfig, DrawEngine, DrawObserver, DrawScheduler,
    SchedulerConfig,
};

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Spin(String),
    Assigned(String),
    Complete,
}

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<Seen>>,
}

impl Recorder {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn assigned(&self) -> usize {
        self.seen()
            .iter()
            .filter(|s| matches!(s, Seen::Assigned(_)))
            .count()
    }

    fn completed(&self) -> usize {
        self.seen().iter().filter(|s| **s == Seen::Complete).count()
    }
}

impl DrawObserver for Recorder {
    fn on_spin_tick(&self, candidate: &str) {
        self.seen.lock().unwrap().push(Seen::Spin(candidate.to_string()));
    }

    fn on_assignment(&self, assignment: &Assignment) {
        self.seen
            .lock()
            .unwrap()
            .push(Seen::Assigned(assignment.participant().display_name().to_string()));
    }

    fn on_complete(&self) {
        self.seen.lock().unwrap().push(Seen::Complete);
    }
}

fn create_scheduler(config: SchedulerConfig) -> (DrawScheduler, Arc<Recorder>) {
    let engine = DrawEngine::new(DrawConfig::with_seed(42)).unwrap();
    let recorder = Arc::new(Recorder::default());
    let scheduler = DrawScheduler::new(engine, recorder.clone(), config).unwrap();
    (scheduler, recorder)
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ============================================================================
// Automatic Mode
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_automatic_draw_runs_to_completion() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());

    assert_eq!(scheduler.start(), Control::Started);
    assert!(scheduler.is_running());
    scheduler.join().await;

    assert!(scheduler.is_done());
    assert!(!scheduler.is_running(), "scheduler stops itself at completion");
    assert_eq!(recorder.assigned(), 24);
    assert_eq!(recorder.completed(), 1);
    assert_eq!(recorder.seen().last(), Some(&Seen::Complete));
}

#[tokio::test(start_paused = true)]
async fn test_first_cycle_runs_immediately() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    scheduler.start();

    advance(1700).await;
    assert_eq!(recorder.assigned(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_while_running_arms_no_second_timer() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());

    assert_eq!(scheduler.start(), Control::Started);
    assert_eq!(scheduler.start(), Control::AlreadyRunning);

    // Cycles at 0, 1800 and 3600 have revealed; the one at 5400 is spinning.
    advance(5500).await;
    assert_eq!(recorder.assigned(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_stop_prevents_further_callbacks() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    scheduler.start();

    // First reveal done, second cycle mid-spin.
    advance(2000).await;
    assert_eq!(scheduler.stop(), Control::Stopped);
    assert!(!scheduler.is_running());

    let seen_at_stop = recorder.seen().len();
    let cursor_at_stop = scheduler.with_engine(DrawEngine::cursor);
    advance(5000).await;

    assert_eq!(recorder.seen().len(), seen_at_stop, "no spin ticks or reveals after stop");
    assert_eq!(scheduler.with_engine(DrawEngine::cursor), cursor_at_stop);
    assert_eq!(cursor_at_stop, 1);
}

/// Counts every callback that arrives once `stopped` is set.
#[derive(Default)]
struct LateCounter {
    stopped: AtomicBool,
    late: AtomicUsize,
}

impl LateCounter {
    fn record(&self) {
        if self.stopped.load(Ordering::SeqCst) {
            self.late.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl DrawObserver for LateCounter {
    fn on_spin_tick(&self, _candidate: &str) {
        self.record();
    }

    fn on_assignment(&self, _assignment: &Assignment) {
        self.record();
    }

    fn on_complete(&self) {
        self.record();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stop_silences_cycle_running_on_another_worker() {
    let config = SchedulerConfig {
        cycle_period: Duration::from_millis(30),
        spin_tick: Duration::from_millis(1),
        spin_min: Duration::from_millis(10),
        spin_max: Duration::from_millis(20),
        ..SchedulerConfig::default()
    };

    for round in 0..100u64 {
        let engine = DrawEngine::new(DrawConfig::with_seed(round)).unwrap();
        let counter = Arc::new(LateCounter::default());
        let mut scheduler = DrawScheduler::new(engine, counter.clone(), config.clone()).unwrap();

        scheduler.start();
        advance(5 + round % 13).await;
        scheduler.stop();
        counter.stopped.store(true, Ordering::SeqCst);

        advance(25).await;
        assert_eq!(
            counter.late.load(Ordering::SeqCst),
            0,
            "callback after stop in round {round}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_idempotent() {
    let (mut scheduler, _recorder) = create_scheduler(SchedulerConfig::default());
    assert_eq!(scheduler.stop(), Control::NotRunning);

    scheduler.start();
    assert_eq!(scheduler.stop(), Control::Stopped);
    assert_eq!(scheduler.stop(), Control::NotRunning);
}

#[tokio::test(start_paused = true)]
async fn test_resume_continues_canonical_sequence() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    let order = scheduler.with_engine(|engine| engine.permutation().clone());

    scheduler.start();
    advance(4000).await;
    scheduler.stop();
    scheduler.start();
    scheduler.join().await;

    let ids: Vec<usize> = scheduler
        .assignments()
        .iter()
        .map(|a| a.participant().id())
        .collect();
    assert_eq!(ids, order.as_slice());
    assert_eq!(recorder.completed(), 1);
}

// ============================================================================
// Manual Mode
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_step_once_reveals_one() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());

    assert_eq!(scheduler.step_once(), Control::Stepped);
    assert!(!scheduler.is_running());
    scheduler.join().await;

    assert_eq!(recorder.assigned(), 1);
    assert_eq!(scheduler.with_engine(DrawEngine::cursor), 1);

    // No repeating timer was armed.
    advance(10_000).await;
    assert_eq!(recorder.assigned(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_step_once_while_running_is_ignored() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    scheduler.start();

    advance(100).await;
    assert_eq!(scheduler.step_once(), Control::IgnoredWhileRunning);
    assert_eq!(scheduler.with_engine(DrawEngine::cursor), 0);

    advance(1700).await;
    assert_eq!(recorder.assigned(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_step_once_while_spinning_is_ignored() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());

    assert_eq!(scheduler.step_once(), Control::Stepped);
    advance(100).await;
    assert_eq!(scheduler.step_once(), Control::CycleInFlight);

    advance(3000).await;
    assert_eq!(recorder.assigned(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_start_during_manual_spin_reveals_once() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    let first = scheduler.with_engine(|engine| engine.peek_next().unwrap());

    scheduler.step_once();
    advance(500).await;
    assert_eq!(scheduler.start(), Control::Started);

    advance(1700).await;
    assert_eq!(recorder.assigned(), 1);
    assert_eq!(scheduler.assignments()[0], first);
}

#[tokio::test(start_paused = true)]
async fn test_manual_steps_complete_the_draw() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::instant());

    for _ in 0..24 {
        assert_eq!(scheduler.step_once(), Control::Stepped);
        scheduler.join().await;
    }

    assert!(scheduler.is_done());
    assert_eq!(recorder.completed(), 1);
    assert_eq!(scheduler.step_once(), Control::AlreadyComplete);
    assert_eq!(scheduler.start(), Control::AlreadyComplete);
    assert_eq!(recorder.completed(), 1, "completion is signalled once per draw");
}

// ============================================================================
// Spin Phase
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_spin_shows_decoys_then_true_name() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    scheduler.step_once();
    scheduler.join().await;

    let seen = recorder.seen();
    let Some(Seen::Assigned(revealed)) = seen.last().cloned() else {
        panic!("last event should be the reveal: {:?}", seen);
    };

    let spins: Vec<&String> = seen
        .iter()
        .filter_map(|s| match s {
            Seen::Spin(name) => Some(name),
            _ => None,
        })
        .collect();

    // ~60ms ticks over 1200..=1600ms, plus the landing tick.
    assert!(spins.len() >= 19 && spins.len() <= 28, "{} spin ticks", spins.len());
    let (landing, decoys) = spins.split_last().unwrap();
    assert_eq!(*landing, &revealed);
    assert!(decoys.iter().all(|name| **name != revealed), "true name shown early");
}

#[tokio::test(start_paused = true)]
async fn test_instant_mode_skips_spin() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::instant());
    scheduler.step_once();
    scheduler.join().await;

    assert_eq!(recorder.seen().len(), 1);
    assert_eq!(recorder.assigned(), 1);
}

// ============================================================================
// Reset and Callbacks
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_reset_stops_and_clears() {
    let (mut scheduler, recorder) = create_scheduler(SchedulerConfig::default());
    scheduler.start();
    advance(4000).await;

    assert_eq!(scheduler.reset(), Control::Reset);
    assert!(!scheduler.is_running());
    assert!(scheduler.assignments().is_empty());

    let seen = recorder.seen().len();
    advance(5000).await;
    assert_eq!(recorder.seen().len(), seen);
}

#[tokio::test(start_paused = true)]
async fn test_callbacks_builder_receives_events() {
    let groups = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(0));
    let groups_sink = Arc::clone(&groups);
    let done_sink = Arc::clone(&done);

    let callbacks = DrawCallbacks::new()
        .on_assignment(move |a| groups_sink.lock().unwrap().push((a.round(), a.group())))
        .on_complete(move || *done_sink.lock().unwrap() += 1);

    let engine = DrawEngine::new(DrawConfig::with_seed(3)).unwrap();
    let mut scheduler =
        DrawScheduler::new(engine, Arc::new(callbacks), SchedulerConfig::instant()).unwrap();
    scheduler.start();
    scheduler.join().await;

    let groups = groups.lock().unwrap().clone();
    assert_eq!(groups.len(), 24);
    assert_eq!(groups[6], (1, 0));
    assert_eq!(*done.lock().unwrap(), 1);
}

#[test]
fn test_rejects_invalid_timings() {
    let engine = DrawEngine::new(DrawConfig::default()).unwrap();
    let config = SchedulerConfig {
        cycle_period: Duration::ZERO,
        ..SchedulerConfig::default()
    };
    let observer = Arc::new(Recorder::default());
    assert!(DrawScheduler::new(engine, observer, config).is_err());
}
