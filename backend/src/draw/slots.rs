//! Slot sequencing
//!
//! Maps a linear draw index to the (round, group) slot it fills. Every group
//! receives one participant per round before the next round starts, so the
//! index walks groups fastest:
//!
//! ```text
//! index:  0  1  2  3  4  5 | 6  7 ... | 18 ... 23
//! round:  0  0  0  0  0  0 | 1  1 ... |  3 ...  3
//! group:  0  1  2  3  4  5 | 0  1 ... |  0 ...  5
//! ```

use serde::{Deserialize, Serialize};

/// A single slot: which round of which group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub round: usize,
    pub group: usize,
}

impl Coordinate {
    pub fn new(round: usize, group: usize) -> Self {
        Self { round, group }
    }
}

/// Round-robin mapping from draw index to [`Coordinate`].
///
/// # Example
/// ```
/// use team_draw_core::draw::{Coordinate, SlotSequencer};
///
/// let slots = SlotSequencer::new(6, 4);
/// assert_eq!(slots.coordinate_for(7), Some(Coordinate::new(1, 1)));
/// assert_eq!(slots.coordinate_for(24), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSequencer {
    groups_per_round: usize,
    total_rounds: usize,
}

impl SlotSequencer {
    pub fn new(groups_per_round: usize, total_rounds: usize) -> Self {
        Self {
            groups_per_round,
            total_rounds,
        }
    }

    pub fn groups_per_round(&self) -> usize {
        self.groups_per_round
    }

    pub fn total_rounds(&self) -> usize {
        self.total_rounds
    }

    /// Number of slots in the whole draw
    pub fn capacity(&self) -> usize {
        self.groups_per_round * self.total_rounds
    }

    /// Slot filled at draw position `index`, or `None` once the draw is exhausted
    pub fn coordinate_for(&self, index: usize) -> Option<Coordinate> {
        coordinate_for(index, self.groups_per_round, self.total_rounds)
    }

    /// Inverse of [`SlotSequencer::coordinate_for`]
    pub fn index_of(&self, coordinate: Coordinate) -> Option<usize> {
        if coordinate.round >= self.total_rounds || coordinate.group >= self.groups_per_round {
            return None;
        }
        Some(coordinate.round * self.groups_per_round + coordinate.group)
    }

    /// Every slot in draw order
    pub fn slots(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.capacity()).filter_map(move |index| self.coordinate_for(index))
    }
}

/// Slot for `index` under `groups_per_round` groups and `total_rounds` rounds.
pub fn coordinate_for(index: usize, groups_per_round: usize, total_rounds: usize) -> Option<Coordinate> {
    if groups_per_round == 0 || index >= groups_per_round * total_rounds {
        return None;
    }
    Some(Coordinate {
        round: index / groups_per_round,
        group: index % groups_per_round,
    })
}
