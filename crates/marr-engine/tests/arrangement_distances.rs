use std::collections::BTreeMap;

use marr_engine::{Arrangement, Coord};

fn unit_square_placements() -> BTreeMap<usize, Coord> {
    BTreeMap::from([
        (0, Coord::new(-0.5, -0.5)),
        (1, Coord::new(0.5, -0.5)),
        (2, Coord::new(0.5, 0.5)),
        (3, Coord::new(-0.5, 0.5)),
    ])
}

#[test]
fn distances_are_symmetric_with_undefined_diagonal() {
    let arrangement = Arrangement::from_placements(4, &unit_square_placements()).unwrap();
    let distance = arrangement.distance();

    for i in 0..4 {
        assert_eq!(distance.get(i, i), None);
        for j in 0..4 {
            assert_eq!(distance.get(i, j), distance.get(j, i));
        }
    }
}

#[test]
fn unit_square_corners_have_expected_distances() {
    let arrangement = Arrangement::from_placements(4, &unit_square_placements()).unwrap();
    let distance = arrangement.distance();
    let squared = arrangement.distance_squared();

    for &(i, j) in &[(0, 1), (1, 2), (2, 3), (0, 3)] {
        assert!((distance.get(i, j).unwrap() - 1.0).abs() < 1e-12);
        assert!((squared.get(i, j).unwrap() - 1.0).abs() < 1e-12);
    }
    for &(i, j) in &[(0, 2), (1, 3)] {
        assert!((distance.get(i, j).unwrap() - 2.0f64.sqrt()).abs() < 1e-12);
        assert!((squared.get(i, j).unwrap() - 2.0).abs() < 1e-12);
    }
}

#[test]
fn pairs_with_an_absent_item_stay_undefined() {
    let placements = BTreeMap::from([
        (0, Coord::new(-0.4, 0.0)),
        (2, Coord::new(0.4, 0.0)),
        (4, Coord::new(0.0, 0.3)),
    ]);
    let arrangement = Arrangement::from_placements(5, &placements).unwrap();

    assert_eq!(arrangement.present_items(), vec![0, 2, 4]);
    assert_eq!(arrangement.placed_count(), 3);
    assert!(arrangement.is_present(2));
    assert!(!arrangement.is_present(1));

    assert!(arrangement.distance().get(0, 2).is_some());
    assert_eq!(arrangement.distance().get(0, 1), None);
    assert_eq!(arrangement.distance().get(1, 3), None);
}

#[test]
fn construction_rejects_malformed_input() {
    let out_of_range = BTreeMap::from([
        (0, Coord::new(0.0, 0.0)),
        (5, Coord::new(0.1, 0.1)),
    ]);
    assert!(Arrangement::from_placements(3, &out_of_range).is_err());

    let lone_item = BTreeMap::from([(0, Coord::new(0.0, 0.0))]);
    assert!(Arrangement::from_placements(3, &lone_item).is_err());

    let non_finite = BTreeMap::from([
        (0, Coord::new(0.0, 0.0)),
        (1, Coord::new(f64::NAN, 0.1)),
    ]);
    assert!(Arrangement::from_placements(3, &non_finite).is_err());
}
