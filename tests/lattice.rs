use competitive_erosion::config::{EdgePolicy, InitialPattern};
use competitive_erosion::error::ErosionError;
use competitive_erosion::grid::{Lattice, neighbors4_wrap, wrap_xy};
use proptest::prelude::*;

fn banded(w: usize, h: usize) -> Lattice {
    let mut l = Lattice::new(w, h).unwrap();
    l.initialize(InitialPattern::RowBands, 2).unwrap();
    l
}

#[test]
fn rejects_zero_dimensions() {
    assert!(matches!(
        Lattice::new(0, 5),
        Err(ErosionError::InvalidDimensions { width: 0, height: 5 })
    ));
    assert!(matches!(
        Lattice::new(5, 0),
        Err(ErosionError::InvalidDimensions { .. })
    ));
}

#[test]
fn oversized_dimensions_are_rejected() {
    assert!(matches!(
        Lattice::new(usize::MAX, 2),
        Err(ErosionError::InvalidDimensions { height: 2, .. })
    ));
    assert!(matches!(
        Lattice::from_colors(usize::MAX / 2 + 1, 2, Vec::new()),
        Err(ErosionError::InvalidDimensions { .. })
    ));
}

#[test]
fn index_never_aliases_past_the_width() {
    let l = Lattice::from_colors(5, 5, (0..25).collect()).unwrap();
    assert_eq!(l.index(4, 0).unwrap(), 4);
    assert_eq!(l.index(0, 1).unwrap(), 5);
    assert!(matches!(
        l.index(5, 0),
        Err(ErosionError::OutOfBounds { x: 5, width: 5 })
    ));
    assert!(l.index(0, 5).is_err());
    assert!(matches!(l.color(5, 0), Err(ErosionError::OutOfBounds { .. })));
}

#[test]
fn bounded_axis_is_not_clamped() {
    let mut l = banded(5, 5);
    assert!(matches!(
        l.color(-1, 0),
        Err(ErosionError::OutOfBounds { x: -1, width: 5 })
    ));
    assert!(matches!(l.color(5, 0), Err(ErosionError::OutOfBounds { .. })));
    assert!(matches!(
        l.set_color(5, 2, 0),
        Err(ErosionError::OutOfBounds { x: 5, .. })
    ));
    assert_eq!(l, banded(5, 5));
}

#[test]
fn negative_y_wraps() {
    let mut l = banded(5, 5);
    l.set_color(3, -1, 0).unwrap();
    assert_eq!(l.color(3, 4).unwrap(), 0);
    assert_eq!(wrap_xy(2, -6, 5, 5), Some((2, 4)));
    assert_eq!(wrap_xy(2, 11, 5, 5), Some((2, 1)));
    assert_eq!(wrap_xy(-1, 0, 5, 5), None);
}

#[test]
fn row_bands_split_five_by_five() {
    let l = banded(5, 5);
    for y in 0..5 {
        for x in 0..5 {
            let expected = if y < 2 { 0 } else { 1 };
            assert_eq!(l.color(x, y).unwrap(), expected, "cell ({x}, {y})");
        }
    }
}

#[test]
fn column_bands_split_bounded_axis() {
    let mut l = Lattice::new(6, 3).unwrap();
    l.initialize(InitialPattern::ColumnBands, 3).unwrap();
    let row: Vec<u8> = (0..6).map(|x| l.color(x, 1).unwrap()).collect();
    assert_eq!(row, vec![0, 0, 1, 1, 2, 2]);
}

#[test]
fn seed_pattern_places_single_cell() {
    let mut l = Lattice::new(4, 4).unwrap();
    l.initialize(InitialPattern::Seed { x: 1, y: 2 }, 2).unwrap();
    assert_eq!(l.color_counts(2), vec![1, 15]);
    assert_eq!(l.color(1, 2).unwrap(), 0);

    let err = l.initialize(InitialPattern::Seed { x: 4, y: 0 }, 2).unwrap_err();
    assert!(matches!(err, ErosionError::InvalidParams(_)));
}

#[test]
fn initialize_is_idempotent() {
    for pattern in [
        InitialPattern::RowBands,
        InitialPattern::ColumnBands,
        InitialPattern::Seed { x: 2, y: 3 },
    ] {
        let mut l = Lattice::new(6, 9).unwrap();
        l.initialize(pattern, 2).unwrap();
        let first = l.clone();
        l.initialize(pattern, 2).unwrap();
        assert_eq!(l, first);
    }
}

#[test]
fn frontier_sees_across_the_wrap() {
    let l = banded(5, 5);
    let f0 = l.frontier_cells(0, EdgePolicy::Reflect);
    assert_eq!(f0.len(), 10);
    assert!(f0.iter().all(|&(_, y)| y == 0 || y == 1));
    let f1 = l.frontier_cells(1, EdgePolicy::Reflect);
    assert_eq!(f1.len(), 10);
    assert!(f1.iter().all(|&(_, y)| y == 2 || y == 4));
}

#[test]
fn periodic_frontier_sees_across_the_x_seam() {
    // columns: 0 0 0 1, so column 0 touches color 1 only across the seam
    let l = Lattice::from_colors(4, 2, vec![0, 0, 0, 1, 0, 0, 0, 1]).unwrap();
    assert_eq!(l.frontier_cells(0, EdgePolicy::Reflect), vec![(2, 0), (2, 1)]);
    assert_eq!(
        l.frontier_cells(0, EdgePolicy::Periodic),
        vec![(0, 0), (2, 0), (0, 1), (2, 1)]
    );
}

#[test]
fn neighbors_do_not_wrap_x() {
    let n: Vec<_> = neighbors4_wrap(0, 0, 5, 5).collect();
    assert_eq!(n.len(), 3);
    assert!(n.contains(&(1, 0)));
    assert!(n.contains(&(0, 4)));
    assert!(n.contains(&(0, 1)));
}

#[test]
fn from_colors_checks_length() {
    assert!(Lattice::from_colors(2, 2, vec![0, 1, 0]).is_err());
    let l = Lattice::from_colors(2, 2, vec![0, 1, 1, 0]).unwrap();
    assert_eq!(l.color(1, 0).unwrap(), 1);
}

proptest! {
    #[test]
    fn color_is_cyclic_in_y(
        w in 1usize..8,
        h in 1usize..8,
        x_frac in 0.0f64..1.0,
        y in -1000i64..1000,
        k in -20i64..20,
    ) {
        let l = banded(w, h);
        let x = ((x_frac * w as f64) as i64).min(w as i64 - 1);
        prop_assert_eq!(l.color(x, y).unwrap(), l.color(x, y + k * h as i64).unwrap());
    }
}
