//! Tests for the dense 3D grid

#[cfg(test)]
mod tests {
    use tilewave::math::rotation::Rotation;
    use tilewave::spatial::grid::Grid3;
    use tilewave::spatial::neighborhood::{NEIGHBORHOOD_SIZE, Offset};

    fn labelled(dims: [usize; 3]) -> Grid3<[usize; 3]> {
        Grid3::from_fn(dims, |coord| coord)
    }

    // Tests dimensions and bounds checks
    #[test]
    fn test_dims_and_contains() {
        let grid = Grid3::filled([2, 3, 4], 0u8);
        assert_eq!(grid.dims(), [2, 3, 4]);
        assert_eq!((grid.size_x(), grid.size_y(), grid.size_z()), (2, 3, 4));
        assert_eq!(grid.len(), 24);
        assert!(grid.contains([1, 2, 3]));
        assert!(!grid.contains([2, 0, 0]));
        assert!(grid.get([0, 3, 0]).is_none());
    }

    // Tests a quarter turn sends (x, y, z) to (z, y, size_x - 1 - x)
    // Verified by permuting axes without inverting
    #[test]
    fn test_rotated_quarter_turn() {
        let grid = labelled([2, 1, 3]);
        let rotated = grid.rotated(Rotation::R90);
        assert_eq!(rotated.dims(), [3, 1, 2]);
        for (coord, &source) in grid.indexed_iter() {
            let [x, y, z] = coord;
            let target = [z, y, grid.size_x() - 1 - x];
            assert_eq!(rotated.get(target), Some(&source));
        }
    }

    // Tests four quarter turns restore the grid and two equal a half turn
    #[test]
    fn test_rotation_composes() {
        let grid = labelled([3, 2, 2]);
        let full = grid
            .rotated(Rotation::R90)
            .rotated(Rotation::R90)
            .rotated(Rotation::R90)
            .rotated(Rotation::R90);
        assert_eq!(full, grid);
        assert_eq!(
            grid.rotated(Rotation::R90).rotated(Rotation::R90),
            grid.rotated(Rotation::R180)
        );
        assert_eq!(grid.rotated(Rotation::R0), grid);
    }

    // Tests grid rotation and offset rotation agree for neighbouring cells
    // Verified by rotating offsets the opposite way
    #[test]
    fn test_rotation_moves_offsets() {
        let dims = [3, 3, 3];
        let grid = labelled(dims);
        let rotated = grid.rotated(Rotation::R90);
        let to_rotated = |[x, y, z]: [usize; 3]| [z, y, dims[0] - 1 - x];

        let from = [0, 1, 1];
        for (offset, to) in grid.neighbors(from) {
            assert_eq!(
                Offset::between(to_rotated(from), to_rotated(to)),
                offset.rotated(Rotation::R90)
            );
            assert_eq!(rotated.get(to_rotated(to)), Some(&to));
        }
    }

    // Tests neighbours are filtered to the grid
    // Verified by letting neighbor wrap around at zero
    #[test]
    fn test_neighbors_in_bounds() {
        let grid = Grid3::filled([3, 3, 3], ());
        assert_eq!(grid.neighbors([1, 1, 1]).count(), NEIGHBORHOOD_SIZE);
        assert_eq!(grid.neighbors([0, 0, 0]).count(), 6);
        assert_eq!(grid.neighbor([0, 0, 0], Offset::LEFT), None);
        assert_eq!(grid.neighbor([0, 0, 0], Offset::UP), Some([0, 1, 0]));
    }

    #[test]
    fn test_map_and_mutation() {
        let mut grid = Grid3::filled([2, 2, 1], 1u32);
        grid.for_each_mut(|[x, y, _], value| *value += (x + y) as u32);
        if let Some(cell) = grid.get_mut([0, 0, 0]) {
            *cell = 10;
        }
        let doubled = grid.map(|_, &value| value * 2);
        assert_eq!(doubled.get([0, 0, 0]), Some(&20));
        assert_eq!(doubled.get([1, 1, 0]), Some(&6));
        assert_eq!(grid.coords().count(), 4);
        assert_eq!(grid.coords().last(), Some([1, 1, 0]));
    }
}
