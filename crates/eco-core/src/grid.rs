use std::collections::HashMap;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::position::Position;

/// Integer coordinates of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    /// Column index, `floor(x / cell_size)`.
    pub x: i64,
    /// Row index, `floor(y / cell_size)`.
    pub y: i64,
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Uniform-cell spatial hash used as the collision broad phase.
///
/// The grid is rebuilt from scratch every tick and is never the authority
/// for whether an item exists. Queries only look at the querying position's
/// own cell; neighbouring cells are not consulted, so bodies straddling a
/// cell boundary (or larger than half a cell) can miss contacts.
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<T>>,
    len: usize,
}

impl<T: Copy> SpatialGrid<T> {
    /// Create an empty grid with the given cell edge length.
    pub fn new(cell_size: f64) -> CoreResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(CoreError::InvalidGridSize(cell_size));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        })
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// The cell containing `pos`.
    pub fn cell_of(&self, pos: Position) -> CellKey {
        CellKey {
            x: (pos.x / self.cell_size).floor() as i64,
            y: (pos.y / self.cell_size).floor() as i64,
        }
    }

    /// Drop every entry while keeping the allocated buckets.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Append `item` to the bucket of the cell containing `pos`.
    pub fn insert(&mut self, pos: Position, item: T) {
        let key = self.cell_of(pos);
        self.cells.entry(key).or_default().push(item);
        self.len += 1;
    }

    /// Clear the grid and reinsert every `(position, item)` pair.
    pub fn rebuild(&mut self, items: impl IntoIterator<Item = (Position, T)>) {
        self.clear();
        for (pos, item) in items {
            self.insert(pos, item);
        }
    }

    /// Items stored under the cell containing `pos`, in insertion order.
    pub fn query(&self, pos: Position) -> &[T] {
        self.cells
            .get(&self.cell_of(pos))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Items stored under a specific cell.
    pub fn cell(&self, key: CellKey) -> &[T] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|b| !b.is_empty()).count()
    }

    /// Total number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
