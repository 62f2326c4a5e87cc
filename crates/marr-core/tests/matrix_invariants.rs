use marr_core::PairMatrix;
use proptest::prelude::*;

#[test]
fn set_is_symmetric_and_diagonal_stays_undefined() {
    let mut matrix = PairMatrix::new(4);
    matrix.set(0, 2, 1.5).unwrap();

    assert_eq!(matrix.get(0, 2), Some(1.5));
    assert_eq!(matrix.get(2, 0), Some(1.5));
    assert_eq!(matrix.get(1, 1), None);
    assert_eq!(matrix.get(0, 1), None);

    assert!(matrix.set(1, 1, 1.0).is_err());
    assert!(matrix.set(0, 4, 1.0).is_err());
    assert!(matrix.set(0, 1, f64::NAN).is_err());
}

#[test]
fn rms_ignores_undefined_cells() {
    let mut matrix = PairMatrix::new(3);
    matrix.set(0, 1, 3.0).unwrap();
    matrix.set(1, 2, 4.0).unwrap();

    let rms = matrix.rms().unwrap();
    assert!((rms - (12.5f64).sqrt()).abs() < 1e-12);

    assert_eq!(PairMatrix::new(3).rms(), None);
}

#[test]
fn normalization_yields_unit_rms() {
    let mut matrix = PairMatrix::new(4);
    matrix.set(0, 1, 0.3).unwrap();
    matrix.set(0, 2, 2.0).unwrap();
    matrix.set(2, 3, 5.5).unwrap();

    let rms = matrix.normalized().rms().unwrap();
    assert!((rms - 1.0).abs() < 1e-12);
}

#[test]
fn normalization_leaves_zero_information_matrices_alone() {
    let empty = PairMatrix::new(3);
    assert_eq!(empty.normalized(), empty);

    let mut zeros = PairMatrix::new(3);
    zeros.set(0, 1, 0.0).unwrap();
    assert_eq!(zeros.normalized(), zeros);
}

#[test]
fn subset_rms_restricts_to_given_indices() {
    let mut matrix = PairMatrix::new(4);
    matrix.set(0, 1, 1.0).unwrap();
    matrix.set(0, 2, 2.0).unwrap();
    matrix.set(1, 2, 2.0).unwrap();
    matrix.set(0, 3, 100.0).unwrap();

    let rms = matrix.rms_over(&[0, 1, 2]).unwrap();
    assert!((rms - 3.0f64.sqrt()).abs() < 1e-12);

    assert_eq!(matrix.rms_over(&[1, 3]), None);
    assert_eq!(matrix.rms_over(&[2]), None);
}

#[test]
fn max_over_reads_only_subset_pairs() {
    let mut matrix = PairMatrix::new(4);
    matrix.set(0, 1, 1.0).unwrap();
    matrix.set(2, 3, 9.0).unwrap();

    assert_eq!(matrix.max_over(&[0, 1, 2]), Some(1.0));
    assert_eq!(matrix.max_over(&[0, 2]), None);
}

#[test]
fn residual_rms_compares_shared_cells_only() {
    let mut left = PairMatrix::new(3);
    left.set(0, 1, 1.0).unwrap();
    left.set(0, 2, 5.0).unwrap();
    let mut right = PairMatrix::new(3);
    right.set(0, 1, 4.0).unwrap();

    let residual = left.residual_rms(&right).unwrap().unwrap();
    assert!((residual - 3.0).abs() < 1e-12);

    assert_eq!(left.residual_rms(&PairMatrix::new(3)).unwrap(), None);
    assert!(left.residual_rms(&PairMatrix::new(4)).is_err());
}

proptest! {
    #[test]
    fn normalized_matrices_always_have_unit_rms(
        values in proptest::collection::vec(0.1f64..10.0, 1..10)
    ) {
        let mut matrix = PairMatrix::new(5);
        let pairs: Vec<(usize, usize)> = (0..5)
            .flat_map(|i| ((i + 1)..5).map(move |j| (i, j)))
            .collect();
        for (slot, value) in values.iter().enumerate() {
            let (i, j) = pairs[slot % pairs.len()];
            matrix.set(i, j, *value).unwrap();
        }
        let rms = matrix.normalized().rms().unwrap();
        prop_assert!((rms - 1.0).abs() < 1e-9);
    }

    #[test]
    fn stored_cells_read_back_symmetrically(
        i in 0usize..6,
        j in 0usize..6,
        value in -100.0f64..100.0
    ) {
        prop_assume!(i != j);
        let mut matrix = PairMatrix::new(6);
        matrix.set(i, j, value).unwrap();
        prop_assert_eq!(matrix.get(i, j), Some(value));
        prop_assert_eq!(matrix.get(j, i), Some(value));
    }
}
