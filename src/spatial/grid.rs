//! Dense 3D grid indexed by integer coordinates
//!
//! Wraps an `ndarray::Array3` so templates, wave state and generated output
//! share one coordinate convention: `[x, y, z]` with `y` vertical. Iteration
//! helpers are generic over the cell type.

use ndarray::{Array3, Axis, Zip};

use crate::math::rotation::Rotation;
use crate::spatial::neighborhood::{NEIGHBORHOOD, Offset};

/// Grid coordinate `[x, y, z]`
pub type Coord = [usize; 3];

/// Dense 3D array of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid3<T> {
    cells: Array3<T>,
}

impl<T: Clone> Grid3<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(dims: [usize; 3], value: T) -> Self {
        Self {
            cells: Array3::from_elem((dims[0], dims[1], dims[2]), value),
        }
    }

    /// Rotate the grid a number of quarter turns about the vertical axis
    ///
    /// Each quarter turn sends the cell at `(x, y, z)` to
    /// `(z, y, size_x - 1 - x)`, swapping the horizontal dimensions.
    #[must_use]
    pub fn rotated(&self, rotation: Rotation) -> Self {
        let mut current = self.cells.clone();
        for _ in 0..rotation.quarter_turns() {
            let mut view = current.view();
            view.invert_axis(Axis(0));
            current = view.permuted_axes([2, 1, 0]).to_owned();
        }
        Self { cells: current }
    }
}

impl<T> Grid3<T> {
    /// Create a grid from a function of each coordinate
    pub fn from_fn(dims: [usize; 3], mut f: impl FnMut(Coord) -> T) -> Self {
        Self {
            cells: Array3::from_shape_fn((dims[0], dims[1], dims[2]), |(x, y, z)| f([x, y, z])),
        }
    }

    /// Grid dimensions `[x, y, z]`
    pub fn dims(&self) -> [usize; 3] {
        let (x, y, z) = self.cells.dim();
        [x, y, z]
    }

    /// Extent along x
    pub fn size_x(&self) -> usize {
        self.cells.dim().0
    }

    /// Extent along y (height)
    pub fn size_y(&self) -> usize {
        self.cells.dim().1
    }

    /// Extent along z
    pub fn size_z(&self) -> usize {
        self.cells.dim().2
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Borrow a cell
    pub fn get(&self, coord: Coord) -> Option<&T> {
        self.cells.get(coord)
    }

    /// Mutably borrow a cell
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut T> {
        self.cells.get_mut(coord)
    }

    /// Check whether a coordinate lies inside the grid
    pub fn contains(&self, coord: Coord) -> bool {
        let [x, y, z] = self.dims();
        coord[0] < x && coord[1] < y && coord[2] < z
    }

    /// The cell at `coord + offset`, if it is inside the grid
    pub fn neighbor(&self, coord: Coord, offset: Offset) -> Option<Coord> {
        let shift = |value: usize, delta: i32| value.checked_add_signed(delta as isize);
        let target = [
            shift(coord[0], offset.dx)?,
            shift(coord[1], offset.dy)?,
            shift(coord[2], offset.dz)?,
        ];
        self.contains(target).then_some(target)
    }

    /// In-bounds neighbours of `coord` over the sampled neighbourhood
    ///
    /// Yields `(offset, neighbour)` pairs in [`NEIGHBORHOOD`] order.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Offset, Coord)> + '_ {
        NEIGHBORHOOD
            .iter()
            .filter_map(move |&offset| self.neighbor(coord, offset).map(|n| (offset, n)))
    }

    /// Every coordinate in x-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<T> {
        let [sx, sy, sz] = self.dims();
        (0..sx).flat_map(move |x| (0..sy).flat_map(move |y| (0..sz).map(move |z| [x, y, z])))
    }

    /// Iterate over `(coord, cell)` pairs
    pub fn indexed_iter(&self) -> impl Iterator<Item = (Coord, &T)> {
        self.cells
            .indexed_iter()
            .map(|((x, y, z), cell)| ([x, y, z], cell))
    }

    /// Visit every cell mutably along with its coordinate
    pub fn for_each_mut(&mut self, mut f: impl FnMut(Coord, &mut T)) {
        self.cells
            .indexed_iter_mut()
            .for_each(|((x, y, z), cell)| f([x, y, z], cell));
    }

    /// Apply `f` to every cell, producing a new grid of the same shape
    pub fn map<U>(&self, mut f: impl FnMut(Coord, &T) -> U) -> Grid3<U> {
        Grid3 {
            cells: Zip::indexed(&self.cells).map_collect(|(x, y, z), cell| f([x, y, z], cell)),
        }
    }
}
