//! Spin phase
//!
//! Before each reveal the banner cycles through decoy names. Decoys are drawn
//! from every other participant so the true name is not shown early; with a
//! single-participant pool the true name is the only candidate.

use crate::rng::RngManager;
use std::time::Duration;

/// Names the spin may show before revealing `final_name`.
///
/// # Example
/// ```
/// use team_draw_core::scheduler::spin_candidates;
///
/// let pool = spin_candidates(["Ann", "Bob", "Cy"].into_iter(), "Bob");
/// assert_eq!(pool, vec!["Ann".to_string(), "Cy".to_string()]);
///
/// let lone = spin_candidates(["Bob"].into_iter(), "Bob");
/// assert_eq!(lone, vec!["Bob".to_string()]);
/// ```
pub fn spin_candidates<'a, I>(names: I, final_name: &str) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut pool: Vec<String> = names
        .filter(|name| *name != final_name)
        .map(str::to_string)
        .collect();
    if pool.is_empty() {
        pool.push(final_name.to_string());
    }
    pool
}

/// One spin: candidate pool, how long it lasts, and which name it lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinPlan {
    candidates: Vec<String>,
    final_name: String,
    duration: Duration,
}

impl SpinPlan {
    /// Draw a duration in `[min, max]` (millisecond resolution) for a spin ending on `final_name`.
    pub fn new<'a, I>(
        names: I,
        final_name: &str,
        min: Duration,
        max: Duration,
        rng: &mut RngManager,
    ) -> Self
    where
        I: Iterator<Item = &'a str>,
    {
        let min_ms = min.as_millis() as u64;
        let max_ms = (max.as_millis() as u64).max(min_ms);
        Self {
            candidates: spin_candidates(names, final_name),
            final_name: final_name.to_string(),
            duration: Duration::from_millis(rng.between(min_ms, max_ms)),
        }
    }

    /// A uniformly chosen decoy
    pub fn pick(&self, rng: &mut RngManager) -> &str {
        rng.choose(&self.candidates)
            .map(String::as_str)
            .unwrap_or(&self.final_name)
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn final_name(&self) -> &str {
        &self.final_name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
