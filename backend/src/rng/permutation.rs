//! Random reveal order
//!
//! A [`Permutation`] is a bijection from draw index to participant id.

use super::RngManager;
use serde::{Deserialize, Serialize};

/// Ordered sequence of unique participant ids, indexed by draw position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// Identity ordering `0..n`
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Wrap an existing ordering, checking it is a bijection over `0..len`.
    pub fn from_vec(order: Vec<usize>) -> Option<Self> {
        if is_permutation(&order) {
            Some(Self(order))
        } else {
            None
        }
    }

    /// Participant id revealed at `index`
    pub fn get(&self, index: usize) -> Option<usize> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Generate a uniformly random ordering of `0..n`.
///
/// # Example
/// ```
/// use team_draw_core::rng::{generate_permutation, is_permutation};
/// use team_draw_core::RngManager;
///
/// let mut rng = RngManager::new(2024);
/// let order = generate_permutation(24, &mut rng);
/// assert_eq!(order.len(), 24);
/// assert!(is_permutation(order.as_slice()));
/// ```
pub fn generate_permutation(n: usize, rng: &mut RngManager) -> Permutation {
    let mut order: Vec<usize> = (0..n).collect();
    rng.shuffle(&mut order);
    Permutation(order)
}

/// True if `order` contains every value of `0..order.len()` exactly once.
pub fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &id in order {
        match seen.get_mut(id) {
            Some(flag) if !*flag => *flag = true,
            _ => return false,
        }
    }
    true
}
