use std::collections::BTreeMap;

use marr_engine::{next_subset, Arrangement, Coord};

/// Five items, two of them (0 and 1) placed almost on top of each other so
/// their pair carries the least evidence.
fn clustered_arrangement() -> Arrangement {
    let placements = BTreeMap::from([
        (0, Coord::new(-0.02, 0.0)),
        (1, Coord::new(0.02, 0.0)),
        (2, Coord::new(0.5, 0.5)),
        (3, Coord::new(-0.5, 0.5)),
        (4, Coord::new(0.0, -0.5)),
    ]);
    Arrangement::from_placements(5, &placements).unwrap()
}

#[test]
fn weakest_pair_seeds_the_subset() {
    let subset = next_subset(&[clustered_arrangement()], 5).unwrap();
    assert_eq!(&subset[..2], &[0, 1]);
}

#[test]
fn subset_size_stays_within_bounds() {
    let subset = next_subset(&[clustered_arrangement()], 5).unwrap();
    assert!(subset.len() >= 2);
    assert!(subset.len() <= 4);

    // No duplicates.
    let mut seen = subset.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), subset.len());
}

#[test]
fn three_item_sessions_always_select_a_pair() {
    let placements = BTreeMap::from([
        (0, Coord::new(-0.5, 0.0)),
        (1, Coord::new(0.1, 0.0)),
        (2, Coord::new(0.5, 0.2)),
    ]);
    let arrangement = Arrangement::from_placements(3, &placements).unwrap();

    let subset = next_subset(&[arrangement], 3).unwrap();
    assert_eq!(subset.len(), 2);
}

#[test]
fn selection_is_deterministic_for_a_fixed_history() {
    let history = vec![clustered_arrangement()];
    let first = next_subset(&history, 5).unwrap();
    let second = next_subset(&history, 5).unwrap();
    assert_eq!(first, second);
}

#[test]
fn selection_requires_history_and_enough_items() {
    assert!(next_subset(&[], 5).is_err());
    assert!(next_subset(&[clustered_arrangement()], 2).is_err());
}
