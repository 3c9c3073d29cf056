//! Slot Sequencer Tests
//!
//! Round-robin fill: every group gets one participant per round.

use std::collections::HashMap;
use team_draw_core::draw::coordinate_for;
use team_draw_core::{Coordinate, SlotSequencer};

#[test]
fn test_reference_dimensions() {
    assert_eq!(coordinate_for(0, 6, 4), Some(Coordinate::new(0, 0)));
    assert_eq!(coordinate_for(1, 6, 4), Some(Coordinate::new(0, 1)));
    assert_eq!(coordinate_for(6, 6, 4), Some(Coordinate::new(1, 0)));
    assert_eq!(coordinate_for(23, 6, 4), Some(Coordinate::new(3, 5)));
    assert_eq!(coordinate_for(24, 6, 4), None);
}

#[test]
fn test_each_group_once_per_round() {
    let slots = SlotSequencer::new(6, 4);

    for round in 0..4 {
        let groups: Vec<usize> = (round * 6..(round + 1) * 6)
            .map(|index| slots.coordinate_for(index).unwrap())
            .inspect(|c| assert_eq!(c.round, round))
            .map(|c| c.group)
            .collect();
        assert_eq!(groups, vec![0, 1, 2, 3, 4, 5]);
    }
}

#[test]
fn test_each_group_visited_four_times() {
    let slots = SlotSequencer::new(6, 4);
    let mut visits: HashMap<usize, usize> = HashMap::new();
    for coordinate in slots.slots() {
        *visits.entry(coordinate.group).or_default() += 1;
    }

    assert_eq!(visits.len(), 6);
    assert!(visits.values().all(|&count| count == 4));
}

#[test]
fn test_no_group_repeats_before_all_seen() {
    let slots = SlotSequencer::new(6, 4);
    let sequence: Vec<Coordinate> = slots.slots().collect();

    for window in sequence.chunks(6) {
        let mut seen = [false; 6];
        for coordinate in window {
            assert!(!seen[coordinate.group], "group {} visited twice in a round", coordinate.group);
            seen[coordinate.group] = true;
        }
    }
}

#[test]
fn test_coordinates_are_unique() {
    let slots = SlotSequencer::new(6, 4);
    let unique: std::collections::HashSet<_> = slots.slots().collect();
    assert_eq!(unique.len(), slots.capacity());
}
