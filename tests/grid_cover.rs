use morse_lattice::geometry::Rect;
use morse_lattice::grid::CubicalGrid;
use morse_lattice::morse_error::MorseError;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn grid_2d(nx: usize, ny: usize) -> CubicalGrid {
    CubicalGrid::new(vec![-1.0, 0.0], vec![1.0, 3.0], vec![nx, ny]).unwrap()
}

#[test]
fn unit_line_cover_straddles_two_cells() {
    let g = CubicalGrid::new(vec![0.0], vec![1.0], vec![4]).unwrap();
    let cover = g.grid_cover(&Rect::new(vec![0.2, 0.3]).unwrap(), false);
    assert_eq!(cover, BTreeSet::from([0, 1]));
}

#[test]
fn lower_edge_on_a_grid_line_picks_left_neighbour() {
    let g = CubicalGrid::new(vec![0.0, 0.0], vec![4.0, 4.0], vec![4, 4]).unwrap();
    // x in [1, 1.5] starts exactly on the line x = 1
    let r = Rect::from_bounds(&[1.0, 2.2], &[1.5, 2.8]).unwrap();
    let expected: BTreeSet<usize> = [g.index(&[0, 2]), g.index(&[1, 2])].into();
    assert_eq!(g.grid_cover(&r, false), expected);
}

#[test]
fn cover_of_whole_domain_is_every_cell() {
    let g = grid_2d(3, 5);
    let r = Rect::from_bounds(g.lower_bounds(), g.upper_bounds()).unwrap();
    assert_eq!(g.grid_cover(&r, false).len(), g.size());
}

#[test]
fn checked_access() {
    let g = grid_2d(3, 5);
    assert_eq!(
        g.try_coordinates(15),
        Err(MorseError::CellOutOfRange {
            index: 15,
            num_cells: 15
        })
    );
    assert_eq!(
        g.try_index(&[1, 5]),
        Err(MorseError::CoordinateOutOfRange {
            axis: 1,
            coord: 5,
            size: 5
        })
    );
    assert_eq!(g.try_index(&[2, 4]).unwrap(), 14);
}

proptest! {
    #[test]
    fn index_bijection(nx in 1usize..7, ny in 1usize..7, nz in 1usize..5) {
        let g = CubicalGrid::new(vec![0.0; 3], vec![1.0; 3], vec![nx, ny, nz]).unwrap();
        for i in 0..g.size() {
            let c = g.coordinates(i);
            prop_assert_eq!(g.index(&c), i);
            prop_assert!(c.iter().zip(g.grid_size()).all(|(c, n)| c < n));
        }
    }

    #[test]
    fn interior_box_covers_its_cell(nx in 1usize..9, ny in 1usize..9, seed in 0usize..1000) {
        let g = grid_2d(nx, ny);
        let cell = seed % g.size();
        let lo = g.min_vertex(cell);
        let h = g.cube_sizes();
        let r = Rect::from_bounds(
            &[lo[0] + 0.3 * h[0], lo[1] + 0.3 * h[1]],
            &[lo[0] + 0.6 * h[0], lo[1] + 0.6 * h[1]],
        ).unwrap();
        prop_assert_eq!(g.grid_cover(&r, false), BTreeSet::from([cell]));
    }

    #[test]
    fn padding_is_monotone(
        a in -1.5f64..1.5, wa in 0.0f64..1.0,
        b in -0.5f64..3.5, wb in 0.0f64..1.0,
    ) {
        let g = grid_2d(10, 10);
        let r = Rect::from_bounds(&[a, b], &[a + wa, b + wb]).unwrap();
        let plain = g.grid_cover(&r, false);
        let padded = g.grid_cover(&r, true);
        prop_assert!(plain.is_subset(&padded));
    }

    #[test]
    fn outside_box_covers_nothing(offset in 0.01f64..5.0, width in 0.0f64..2.0, pad in any::<bool>()) {
        let g = grid_2d(4, 4);
        let right = Rect::from_bounds(&[1.0 + offset, 1.0], &[1.0 + offset + width, 2.0]).unwrap();
        let below = Rect::from_bounds(&[0.0, -offset - width], &[0.5, -offset]).unwrap();
        prop_assert!(g.grid_cover(&right, pad).is_empty());
        prop_assert!(g.grid_cover(&below, pad).is_empty());
    }
}
