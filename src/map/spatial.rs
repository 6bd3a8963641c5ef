use std::collections::HashMap;

use crate::coords::ScreenPoint;

/// Integer grid cell coordinates
pub type CellKey = (i64, i64);

/// Screen-space hash grid used for clustering.
/// A point belongs to the cell whose center is nearest, i.e. `round(p / cell_size)`.
pub struct ScreenGrid {
    /// Item indices per cell, in insertion order
    cells: HashMap<CellKey, Vec<usize>>,
    /// Cell size in pixels
    cell_size: f64,
}

impl ScreenGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    /// Quantize a point to its cell
    #[inline(always)]
    pub fn key_for(&self, p: ScreenPoint) -> CellKey {
        let x = (p.x / self.cell_size).round() as i64;
        let y = (p.y / self.cell_size).round() as i64;
        (x, y)
    }

    /// Center of a cell in pixels
    #[inline(always)]
    pub fn anchor(&self, key: CellKey) -> ScreenPoint {
        ScreenPoint::new(key.0 as f64 * self.cell_size, key.1 as f64 * self.cell_size)
    }

    pub fn insert(&mut self, p: ScreenPoint, idx: usize) {
        let key = self.key_for(p);
        self.cells.entry(key).or_default().push(idx);
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Consume the grid into cells sorted by key
    pub fn into_sorted_cells(self) -> Vec<(CellKey, Vec<usize>)> {
        let mut cells: Vec<_> = self.cells.into_iter().collect();
        cells.sort_unstable_by_key(|(key, _)| *key);
        cells
    }
}

/// Spatial index for polygon features using conservative approximation.
/// Each feature's bounding box is indexed into every cell it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the exact containment test in the region layer).
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
        }
    }

    #[inline(always)]
    fn to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        let cx = (x / self.cell_size).floor() as i32;
        let cy = (y / self.cell_size).floor() as i32;
        (cx, cy)
    }

    /// Build from feature bounding boxes `(min_x, min_y, max_x, max_y)`
    pub fn build(bboxes: impl Iterator<Item = (f64, f64, f64, f64)>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, (min_x, min_y, max_x, max_y)) in bboxes.enumerate() {
            let min_cell = grid.to_cell(min_x, min_y);
            let max_cell = grid.to_cell(max_x, max_y);
            for y in min_cell.1..=max_cell.1 {
                for x in min_cell.0..=max_cell.0 {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Feature indices whose bounding box may contain the point
    pub fn query_point(&self, p: ScreenPoint) -> &[usize] {
        self.cells
            .get(&self.to_cell(p.x, p.y))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
